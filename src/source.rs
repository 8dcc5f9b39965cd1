//! Log retrieval boundary
//!
//! Sources hand the aggregator an already-fetched batch of logs. A failed fetch
//! means no snapshot for that cycle, which callers must be able to tell apart from a
//! snapshot computed over zero records.

use crate::aggregator::{Aggregation, Aggregator};
use crate::error::ComputeError;
use crate::schema::{LogAdapter, RawStressLog};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[cfg(feature = "http")]
use std::time::Duration;

/// Default HTTP fetch timeout
#[cfg(feature = "http")]
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while fetching logs
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fetched logs: {0}")]
    Parse(#[from] ComputeError),

    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "http")]
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Serialized layout of a log batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// JSON array of logs
    #[default]
    Json,
    /// Newline-delimited JSON (one log per line)
    Ndjson,
}

impl InputFormat {
    /// Parse a batch in this format
    pub fn parse(&self, data: &str) -> Result<Vec<RawStressLog>, ComputeError> {
        match self {
            InputFormat::Json => LogAdapter::parse_array(data),
            InputFormat::Ndjson => LogAdapter::parse_ndjson(data),
        }
    }
}

/// Anything that can produce one batch of logs
pub trait RecordSource {
    /// Fetch the current batch. Never retried by the caller.
    fn fetch(&self) -> Result<Vec<RawStressLog>, FetchError>;
}

/// Logs read from a local file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: InputFormat,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, format: InputFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

impl RecordSource for FileSource {
    fn fetch(&self) -> Result<Vec<RawStressLog>, FetchError> {
        info!("Reading logs from: {}", self.path.display());
        let data = fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.format.parse(&data)?)
    }
}

/// Logs fetched with an HTTP GET returning a JSON array
#[cfg(feature = "http")]
pub struct HttpSource {
    client: reqwest::blocking::Client,
    url: String,
}

#[cfg(feature = "http")]
impl HttpSource {
    /// Create a source with the default timeout
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(url, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[cfg(feature = "http")]
impl RecordSource for HttpSource {
    fn fetch(&self) -> Result<Vec<RawStressLog>, FetchError> {
        info!("Fetching logs from: {}", self.url);

        let response = self.client.get(&self.url).send()?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let body = response.text()?;
        Ok(LogAdapter::parse_array(&body)?)
    }
}

/// Outcome of one fetch-and-aggregate cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Logs were fetched (possibly zero) and aggregated
    Snapshot(Aggregation),
    /// The fetch failed; no snapshot is available this cycle
    Unavailable(FetchError),
}

impl CycleOutcome {
    pub fn snapshot(&self) -> Option<&Aggregation> {
        match self {
            CycleOutcome::Snapshot(aggregation) => Some(aggregation),
            CycleOutcome::Unavailable(_) => None,
        }
    }
}

/// Fetch one batch from `source` and aggregate it
pub fn run_cycle(source: &dyn RecordSource, aggregator: &Aggregator) -> CycleOutcome {
    match source.fetch() {
        Ok(logs) => CycleOutcome::Snapshot(aggregator.aggregate_logs(&logs)),
        Err(e) => {
            warn!("No snapshot this cycle: {}", e);
            CycleOutcome::Unavailable(e)
        }
    }
}
