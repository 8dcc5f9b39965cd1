//! Aggregation orchestration
//!
//! This module provides the public API for Stress Flux. It runs one full pass from
//! records (or raw log JSON) to an immutable [`MetricsSnapshot`].

use crate::bubble::BubbleEncoder;
use crate::classify::Classifier;
use crate::config::AggregatorConfig;
use crate::encoder::ChartEncoder;
use crate::error::ComputeError;
use crate::frequency::ReasonCounter;
use crate::schema::{LogAdapter, RawStressLog, SchemaViolation};
use crate::severity::SeverityBucketer;
use crate::types::{MetricsSnapshot, Record};
use log::debug;

/// Aggregate a raw JSON array of logs with the default configuration.
///
/// # Arguments
/// * `raw_json` - JSON array of stress.log.v1 objects
///
/// # Returns
/// The snapshot for the batch. Logs with an unrecognized label are dropped.
///
/// # Example
/// ```ignore
/// let snapshot = logs_to_snapshot(r#"[{"Stress_label": "Stressed"}]"#)?;
/// assert_eq!(snapshot.stressed_count, 1);
/// ```
pub fn logs_to_snapshot(raw_json: &str) -> Result<MetricsSnapshot, ComputeError> {
    let logs = LogAdapter::parse_array(raw_json)?;
    Ok(Aggregator::default().aggregate_logs(&logs).snapshot)
}

/// Aggregate a raw JSON array of logs into a chart-ready dashboard JSON payload.
///
/// # Arguments
/// * `raw_json` - JSON array of stress.log.v1 objects
/// * `config` - Aggregator configuration
pub fn logs_to_dashboard_json(
    raw_json: &str,
    config: AggregatorConfig,
) -> Result<String, ComputeError> {
    let logs = LogAdapter::parse_array(raw_json)?;
    let aggregator = Aggregator::new(config)?;
    let snapshot = aggregator.aggregate_logs(&logs).snapshot;
    ChartEncoder::new().encode_to_json(&snapshot, aggregator.config())
}

/// Snapshot plus the logs dropped on the way in
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub snapshot: MetricsSnapshot,
    pub violations: Vec<SchemaViolation>,
}

/// Stateless aggregator.
///
/// Every call recomputes from scratch; nothing is carried between calls.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    /// Create an aggregator with a validated configuration
    pub fn new(config: AggregatorConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Aggregate records into a snapshot.
    ///
    /// Stages:
    /// 1. Classifier - stressed/not-stressed split and counted subset
    /// 2. SeverityBucketer - Low/Medium/High triple
    /// 3. ReasonCounter - first-seen frequency table
    /// 4. BubbleEncoder - radius, position and color per reason
    pub fn aggregate(&self, records: &[Record]) -> MetricsSnapshot {
        let classification = Classifier::classify(records, self.config.reason_scope);

        let severity_counts = SeverityBucketer::bucket(
            classification.counted.iter().copied(),
            &self.config.severity_vocabulary,
        );

        let reason_frequency = ReasonCounter::count(classification.counted.iter().copied());

        let bubbles = BubbleEncoder::project(
            &reason_frequency,
            &self.config.bubble_scale,
            &self.config.palette,
        );

        debug!(
            "Aggregated {} records: {} stressed, {} reasons",
            classification.total_count,
            classification.stressed_count,
            reason_frequency.len()
        );

        MetricsSnapshot {
            total_count: classification.total_count,
            stressed_count: classification.stressed_count,
            not_stressed_count: classification.not_stressed_count,
            severity_counts,
            reason_frequency,
            bubbles,
        }
    }

    /// Validate and aggregate raw logs, dropping schema violations
    pub fn aggregate_logs(&self, logs: &[RawStressLog]) -> Aggregation {
        let ingested = LogAdapter::to_records(logs);
        Aggregation {
            snapshot: self.aggregate(&ingested.records),
            violations: ingested.violations,
        }
    }
}
