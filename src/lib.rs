//! Stress Flux - Deterministic aggregation engine for classified stress logs
//!
//! Flux turns a batch of classified messages into chart-ready metrics through a
//! single pure pass: schema validation → classification → severity bucketing →
//! reason frequency → bubble geometry → dashboard encoding.
//!
//! ## Modules
//!
//! - **Aggregation**: `Aggregator` and the stages it runs
//! - **Encoding**: donut, severity bar and bubble datasets for a renderer
//! - **Sources**: the retrieval boundary (file, and HTTP with the `http` feature)

pub mod aggregator;
pub mod bubble;
pub mod classify;
pub mod config;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod schema;
pub mod severity;
pub mod source;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use aggregator::{logs_to_dashboard_json, logs_to_snapshot, Aggregation, Aggregator};
pub use config::{AggregatorConfig, BubblePalette, BubbleScale, ReasonScope, SeverityVocabulary};
pub use encoder::{BubbleLayout, ChartEncoder};
pub use error::ComputeError;
pub use source::{run_cycle, CycleOutcome, FetchError, FileSource, InputFormat, RecordSource};
pub use types::{BubbleDatum, FrequencyTable, MetricsSnapshot, Record, Severity, StressLabel};

// Schema exports
pub use schema::{LogAdapter, RawStressLog, SchemaViolation, SCHEMA_VERSION};

#[cfg(feature = "http")]
pub use source::HttpSource;

/// Flux version embedded in all dashboard payloads
pub const FLUX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for dashboard payloads
pub const PRODUCER_NAME: &str = "stress-flux";
