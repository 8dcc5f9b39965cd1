//! Record filtering and classification
//!
//! Splits a record batch into stressed and not-stressed counts and selects the
//! subset that feeds severity bucketing and reason counting:
//! - `StressedOnly` scope: the stressed subset
//! - `AllRecords` scope: every record
//!
//! No record is excluded for missing optional fields.

use crate::config::ReasonScope;
use crate::types::Record;

/// Classification of one record batch
#[derive(Debug, Clone)]
pub struct Classification<'a> {
    pub total_count: usize,
    pub stressed_count: usize,
    pub not_stressed_count: usize,
    /// Records that contribute to severity and reason counts, in input order
    pub counted: Vec<&'a Record>,
}

/// Classifier for splitting records by stress label
pub struct Classifier;

impl Classifier {
    /// Classify records under the given counting scope
    pub fn classify(records: &[Record], scope: ReasonScope) -> Classification<'_> {
        let stressed_count = records
            .iter()
            .filter(|r| r.stress_label.is_stressed())
            .count();

        let counted = records
            .iter()
            .filter(|r| scope.includes(r.stress_label))
            .collect();

        Classification {
            total_count: records.len(),
            stressed_count,
            not_stressed_count: records.len() - stressed_count,
            counted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<Record> {
        vec![
            Record::stressed(Some("Low"), Some("workload")),
            Record::not_stressed(),
            Record::stressed(None, None),
            Record {
                stress_reason: Some("sleep".to_string()),
                ..Record::not_stressed()
            },
        ]
    }

    #[test]
    fn test_stressed_only_scope() {
        let records = sample_records();
        let classification = Classifier::classify(&records, ReasonScope::StressedOnly);

        assert_eq!(classification.total_count, 4);
        assert_eq!(classification.stressed_count, 2);
        assert_eq!(classification.not_stressed_count, 2);
        assert_eq!(classification.counted.len(), 2);
        assert!(classification
            .counted
            .iter()
            .all(|r| r.stress_label.is_stressed()));
    }

    #[test]
    fn test_all_records_scope() {
        let records = sample_records();
        let classification = Classifier::classify(&records, ReasonScope::AllRecords);

        assert_eq!(classification.stressed_count, 2);
        assert_eq!(classification.counted.len(), 4);
    }

    #[test]
    fn test_empty_batch() {
        let classification = Classifier::classify(&[], ReasonScope::StressedOnly);
        assert_eq!(classification.total_count, 0);
        assert_eq!(classification.stressed_count, 0);
        assert_eq!(classification.not_stressed_count, 0);
        assert!(classification.counted.is_empty());
    }
}
