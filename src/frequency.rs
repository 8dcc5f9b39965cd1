//! Reason frequency counting
//!
//! Folds records into a [`FrequencyTable`] ordered by the first appearance of each
//! reason tag, so the same input always yields the same table order.

use crate::types::{FrequencyTable, Record};

/// Counter for reason tag frequencies
pub struct ReasonCounter;

impl ReasonCounter {
    /// Count non-empty reason tags of `records` in first-seen order
    pub fn count<'a>(records: impl IntoIterator<Item = &'a Record>) -> FrequencyTable {
        records
            .into_iter()
            .filter_map(Record::reason)
            .fold(FrequencyTable::default(), |mut table, reason| {
                table.add(reason, 1);
                table
            })
    }
}
