//! Severity bucketing
//!
//! Counts categories into the fixed Low/Medium/High triple through the configured
//! vocabulary. Unrecognized or absent categories fall into no bucket.

use crate::config::SeverityVocabulary;
use crate::types::{Record, SeverityCounts};
use log::debug;

/// Bucketer for severity counts
pub struct SeverityBucketer;

impl SeverityBucketer {
    /// Bucket the categories of `records`
    pub fn bucket<'a>(
        records: impl IntoIterator<Item = &'a Record>,
        vocabulary: &SeverityVocabulary,
    ) -> SeverityCounts {
        let mut unrecognized = 0usize;

        let counts = records
            .into_iter()
            .filter_map(|record| record.stress_category.as_deref())
            .fold([0usize; 3], |mut counts, category| {
                match vocabulary.resolve(category) {
                    Some(severity) => counts[severity.index()] += 1,
                    None => unrecognized += 1,
                }
                counts
            });

        if unrecognized > 0 {
            debug!(
                "{} categories outside vocabulary {:?} were not bucketed",
                unrecognized,
                vocabulary.labels()
            );
        }

        SeverityCounts(counts)
    }
}
