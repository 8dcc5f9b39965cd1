//! Core types for the Stress Flux pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: ingested records, the aggregated snapshot with its frequency table and
//! bubble encodings, and the chart-ready dashboard payload.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Binary stress classification carried by every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressLabel {
    #[serde(rename = "Stressed")]
    Stressed,
    #[serde(rename = "Not Stressed")]
    NotStressed,
}

impl StressLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StressLabel::Stressed => "Stressed",
            StressLabel::NotStressed => "Not Stressed",
        }
    }

    /// Parse the upstream label spelling. Matching is exact.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Stressed" => Some(StressLabel::Stressed),
            "Not Stressed" => Some(StressLabel::NotStressed),
            _ => None,
        }
    }

    pub fn is_stressed(&self) -> bool {
        matches!(self, StressLabel::Stressed)
    }
}

/// Severity slot. Slot order is fixed: Low, Medium, High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// All slots in rendering order
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn index(&self) -> usize {
        match self {
            Severity::Low => 0,
            Severity::Medium => 1,
            Severity::High => 2,
        }
    }
}

/// One analyzed message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Upstream identifier, used only for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Stress classification
    pub stress_label: StressLabel,
    /// Severity category exactly as produced upstream; resolved through the
    /// configured vocabulary at bucketing time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_category: Option<String>,
    /// Stress cause tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_reason: Option<String>,
}

impl Record {
    /// Create a stressed record
    pub fn stressed(category: Option<&str>, reason: Option<&str>) -> Self {
        Record {
            id: None,
            stress_label: StressLabel::Stressed,
            stress_category: category.map(str::to_string),
            stress_reason: reason.map(str::to_string),
        }
    }

    /// Create a not-stressed record with no category or reason
    pub fn not_stressed() -> Self {
        Record {
            id: None,
            stress_label: StressLabel::NotStressed,
            stress_category: None,
            stress_reason: None,
        }
    }

    /// Attach an upstream identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The reason tag if present and non-empty
    pub fn reason(&self) -> Option<&str> {
        self.stress_reason.as_deref().filter(|r| !r.is_empty())
    }
}

/// Per-slot severity counts, serialized as `[low, medium, high]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts(pub [usize; 3]);

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        self.0[severity.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn as_array(&self) -> [usize; 3] {
        self.0
    }
}

/// One entry of a [`FrequencyTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonCount {
    pub reason: String,
    pub count: usize,
}

/// Reason tag to occurrence count, iterated in first-seen order.
///
/// Keys are unique, case-sensitive, and every count is at least 1. Serializes as a
/// JSON object whose key order is the first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<ReasonCount>,
    positions: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Build from entries already in first-seen order.
    ///
    /// Zero counts are discarded and repeated reasons are merged into the first entry.
    pub fn from_entries(entries: impl IntoIterator<Item = ReasonCount>) -> Self {
        let mut table = FrequencyTable::default();
        for entry in entries {
            table.add(&entry.reason, entry.count);
        }
        table
    }

    /// Add `count` occurrences of `reason`, appending it if unseen
    pub(crate) fn add(&mut self, reason: &str, count: usize) {
        if count == 0 {
            return;
        }
        match self.positions.get(reason) {
            Some(&position) => self.entries[position].count += count,
            None => {
                self.positions.insert(reason.to_string(), self.entries.len());
                self.entries.push(ReasonCount {
                    reason: reason.to_string(),
                    count,
                });
            }
        }
    }

    pub fn get(&self, reason: &str) -> Option<usize> {
        self.positions
            .get(reason)
            .map(|&position| self.entries[position].count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReasonCount> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ReasonCount] {
        &self.entries
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.reason, &entry.count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FrequencyTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = FrequencyTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of reason tags to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = FrequencyTable::default();
                while let Some((reason, count)) = access.next_entry::<String, usize>()? {
                    table.add(&reason, count);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Bubble placement on a 2-D bubble plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

/// HSL color with saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HslColor {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl HslColor {
    /// CSS functional notation, e.g. `hsl(60, 70%, 50%)`
    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// One visual unit derived from a reason tag's frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleDatum {
    /// Reason tag
    pub label: String,
    /// Occurrence count
    pub count: usize,
    /// Clamped radius
    pub radius: f64,
    /// Index-derived plot position
    pub position: Position,
    /// Index-derived color
    pub color: HslColor,
}

/// One complete, immutable aggregation result for one input batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_count: usize,
    pub stressed_count: usize,
    pub not_stressed_count: usize,
    /// Low, Medium, High
    pub severity_counts: SeverityCounts,
    pub reason_frequency: FrequencyTable,
    pub bubbles: Vec<BubbleDatum>,
}

impl MetricsSnapshot {
    /// Share of stressed records, `None` when the snapshot is empty
    pub fn stressed_ratio(&self) -> Option<f64> {
        if self.total_count == 0 {
            None
        } else {
            Some(self.stressed_count as f64 / self.total_count as f64)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// Dashboard producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Headline numbers shown above the charts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_count: usize,
    pub stressed_count: usize,
    pub not_stressed_count: usize,
    pub stressed_ratio: Option<f64>,
}

/// Labels, values and colors for a categorical chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub title: String,
    pub labels: Vec<String>,
    pub data: Vec<usize>,
    pub colors: Vec<String>,
}

/// Bubble as handed to a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedBubble {
    pub label: String,
    pub count: usize,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<usize>,
    pub color: String,
}

/// Chart-ready payload for one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub dashboard_version: String,
    pub producer: DashboardProducer,
    pub computed_at_utc: String,
    pub summary: DashboardSummary,
    pub donut: ChartDataset,
    pub severity: ChartDataset,
    pub bubbles: Vec<EncodedBubble>,
}
