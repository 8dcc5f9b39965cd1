//! Adapter for converting stress.log.v1 entries into records
//!
//! Parses JSON arrays and NDJSON streams of logs, validates labels and partitions a
//! batch into accepted records and schema violations.

use crate::error::ComputeError;
use crate::schema::raw_log::*;
use crate::types::Record;
use log::{debug, warn};

/// Adapter for converting raw logs to records
pub struct LogAdapter;

impl LogAdapter {
    /// Parse a JSON string containing an array of logs
    pub fn parse_array(json: &str) -> Result<Vec<RawStressLog>, ComputeError> {
        let logs: Vec<RawStressLog> = serde_json::from_str(json)?;
        Ok(logs)
    }

    /// Parse NDJSON (newline-delimited JSON) containing one log per line
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<RawStressLog>, ComputeError> {
        let mut logs = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RawStressLog>(trimmed) {
                Ok(log) => logs.push(log),
                Err(e) => {
                    return Err(ComputeError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(logs)
    }

    /// Convert logs to records.
    ///
    /// Logs with an unrecognized label are logged, dropped and reported in
    /// [`Ingested::violations`]; the remaining logs are converted in input order.
    pub fn to_records(logs: &[RawStressLog]) -> Ingested {
        let mut records = Vec::with_capacity(logs.len());
        let mut violations = Vec::new();

        for (index, log) in logs.iter().enumerate() {
            match log.to_record(index) {
                Ok(record) => records.push(record),
                Err(violation) => {
                    warn!("Dropping log: {}", violation);
                    violations.push(violation);
                }
            }
        }

        debug!(
            "Ingested {} records ({} dropped)",
            records.len(),
            violations.len()
        );

        Ingested {
            records,
            violations,
        }
    }

    /// Validate a batch of logs without converting them
    pub fn validate_logs(logs: &[RawStressLog]) -> Vec<SchemaViolation> {
        logs.iter()
            .enumerate()
            .filter_map(|(index, log)| log.to_record(index).err())
            .collect()
    }
}

/// Result of converting a batch of logs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingested {
    pub records: Vec<Record>,
    pub violations: Vec<SchemaViolation>,
}
