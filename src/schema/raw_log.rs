//! stress.log.v1 schema definition
//!
//! One JSON object per analyzed message:
//!
//! ```json
//! { "_id": "65a1...", "Stress_label": "Stressed", "Stress_category": "High", "Stress_Reason": "workload" }
//! ```
//!
//! Only the label is required. Unknown fields are ignored. A label of any JSON type
//! is accepted at parse time and rejected per log by [`RawStressLog::to_record`];
//! a category or reason that is not a string is treated as absent.

use crate::types::{Record, StressLabel};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Current schema version
pub const SCHEMA_VERSION: &str = "stress.log.v1";

/// One upstream log entry, exactly as received
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStressLog {
    /// Upstream identifier (string or document-store object id)
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    /// "Stressed" or "Not Stressed", kept untyped so a bad value is a violation
    /// for this log only
    #[serde(rename = "Stress_label", default, skip_serializing_if = "Option::is_none")]
    pub stress_label: Option<serde_json::Value>,
    /// Severity category in the producer's vocabulary
    #[serde(
        rename = "Stress_category",
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub stress_category: Option<String>,
    /// Free-text stress cause tag
    #[serde(
        rename = "Stress_Reason",
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub stress_reason: Option<String>,
}

/// Keep string values, discard any other JSON type
fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl RawStressLog {
    /// Create a log with the given label and no optional fields
    pub fn labelled(label: &str) -> Self {
        RawStressLog {
            stress_label: Some(serde_json::Value::String(label.to_string())),
            ..Default::default()
        }
    }

    /// Upstream identifier rendered as a string.
    ///
    /// Object ids of the form `{"$oid": "..."}` are unwrapped.
    pub fn identifier(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(map) => match map.get("$oid") {
                Some(serde_json::Value::String(oid)) => Some(oid.clone()),
                _ => Some(serde_json::Value::Object(map.clone()).to_string()),
            },
            other => Some(other.to_string()),
        }
    }

    /// The label as text: strings verbatim, other non-null values as JSON
    pub fn label_text(&self) -> Option<String> {
        match self.stress_label.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Validate the label and convert to a [`Record`].
    ///
    /// `index` is the position of this log in its batch and identifies it in the
    /// violation when it carries no upstream id. Optional fields are never validated.
    pub fn to_record(&self, index: usize) -> Result<Record, SchemaViolation> {
        let label = self
            .stress_label
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(StressLabel::parse)
            .ok_or_else(|| SchemaViolation {
                index,
                record_id: self.identifier(),
                label: self.label_text(),
            })?;

        Ok(Record {
            id: self.identifier(),
            stress_label: label,
            stress_category: self.stress_category.clone(),
            stress_reason: self.stress_reason.clone(),
        })
    }
}

/// A log whose `Stress_label` is neither "Stressed" nor "Not Stressed".
///
/// Reported and dropped; never fatal to an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// Position of the log in its input batch
    pub index: usize,
    /// Upstream identifier if the log carried one
    pub record_id: Option<String>,
    /// The offending label as text (`None` when absent or null)
    pub label: Option<String>,
}

impl SchemaViolation {
    /// Upstream id if known, otherwise `#<index>`
    pub fn identifier(&self) -> String {
        match &self.record_id {
            Some(id) => id.clone(),
            None => format!("#{}", self.index),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(
                f,
                "Record {} has unrecognized Stress_label {:?}",
                self.identifier(),
                label
            ),
            None => write!(f, "Record {} is missing Stress_label", self.identifier()),
        }
    }
}

impl std::error::Error for SchemaViolation {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_full_log() {
        let log: RawStressLog = serde_json::from_str(
            r#"{
                "_id": "abc123",
                "text": "deadline tomorrow",
                "Stress_label": "Stressed",
                "Stress_category": "High",
                "Stress_Reason": "workload"
            }"#,
        )
        .unwrap();

        let record = log.to_record(0).unwrap();
        assert_eq!(record.id.as_deref(), Some("abc123"));
        assert_eq!(record.stress_label, StressLabel::Stressed);
        assert_eq!(record.stress_category.as_deref(), Some("High"));
        assert_eq!(record.stress_reason.as_deref(), Some("workload"));
    }

    #[test]
    fn test_missing_optional_fields_are_retained() {
        let log: RawStressLog =
            serde_json::from_str(r#"{"Stress_label": "Stressed", "Stress_category": null}"#)
                .unwrap();
        let record = log.to_record(3).unwrap();
        assert_eq!(record.stress_category, None);
        assert_eq!(record.stress_reason, None);
    }

    #[test]
    fn test_object_id_is_unwrapped() {
        let log: RawStressLog = serde_json::from_str(
            r#"{"_id": {"$oid": "65a1f0"}, "Stress_label": "Not Stressed"}"#,
        )
        .unwrap();
        assert_eq!(log.identifier().as_deref(), Some("65a1f0"));
    }

    #[test]
    fn test_unknown_label_is_violation() {
        let log = RawStressLog {
            id: Some(serde_json::json!("x9")),
            ..RawStressLog::labelled("Anxious")
        };

        let violation = log.to_record(7).unwrap_err();
        assert_eq!(violation.index, 7);
        assert_eq!(violation.identifier(), "x9");
        assert_eq!(
            violation.to_string(),
            r#"Record x9 has unrecognized Stress_label "Anxious""#
        );
    }

    #[test]
    fn test_non_string_label_is_violation() {
        let log: RawStressLog =
            serde_json::from_str(r#"{"_id": "n1", "Stress_label": {"value": 1}}"#).unwrap();

        let violation = log.to_record(0).unwrap_err();
        assert_eq!(violation.label.as_deref(), Some(r#"{"value":1}"#));
        assert_eq!(
            violation.to_string(),
            r#"Record n1 has unrecognized Stress_label "{\"value\":1}""#
        );
    }

    #[test]
    fn test_non_string_optional_fields_are_absent() {
        let log: RawStressLog = serde_json::from_str(
            r#"{"Stress_label": "Stressed", "Stress_category": 3, "Stress_Reason": ["exams"]}"#,
        )
        .unwrap();

        let record = log.to_record(0).unwrap();
        assert_eq!(record.stress_category, None);
        assert_eq!(record.stress_reason, None);
    }

    #[test]
    fn test_missing_label_uses_index() {
        let violation = RawStressLog::default().to_record(2).unwrap_err();
        assert_eq!(violation.to_string(), "Record #2 is missing Stress_label");
    }
}
