//! Dashboard encoding
//!
//! This module encodes a metrics snapshot into the chart-ready payload consumed by a
//! renderer: donut split, severity bar, and bubble set, wrapped in producer metadata.

use crate::config::AggregatorConfig;
use crate::error::ComputeError;
use crate::types::{
    ChartDataset, DashboardPayload, DashboardProducer, DashboardSummary, EncodedBubble,
    MetricsSnapshot,
};
use crate::{FLUX_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current dashboard payload version
pub const DASHBOARD_VERSION: &str = "1.0.0";

/// Donut slice colors: stressed, not stressed
pub const DONUT_COLORS: [&str; 2] = ["#FF6384", "#36A2EB"];

/// Severity bar colors: low, medium, high
pub const SEVERITY_COLORS: [&str; 3] = ["#36A2EB", "#FFCE56", "#FF6384"];

/// How bubbles are laid out by the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleLayout {
    /// 2-D bubble plot; `x`/`y` are emitted
    #[default]
    Plot,
    /// Free-flow grid; placement is left to the renderer
    Grid,
}

/// Encoder for dashboard payloads
pub struct ChartEncoder {
    instance_id: String,
    layout: BubbleLayout,
}

impl Default for ChartEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
            layout: BubbleLayout::default(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self {
            instance_id,
            layout: BubbleLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: BubbleLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Encode a snapshot into a dashboard payload
    pub fn encode(&self, snapshot: &MetricsSnapshot, config: &AggregatorConfig) -> DashboardPayload {
        let producer = DashboardProducer {
            name: PRODUCER_NAME.to_string(),
            version: FLUX_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let summary = DashboardSummary {
            total_count: snapshot.total_count,
            stressed_count: snapshot.stressed_count,
            not_stressed_count: snapshot.not_stressed_count,
            stressed_ratio: snapshot.stressed_ratio(),
        };

        DashboardPayload {
            dashboard_version: DASHBOARD_VERSION.to_string(),
            producer,
            computed_at_utc: Utc::now().to_rfc3339(),
            summary,
            donut: self.build_donut(snapshot),
            severity: self.build_severity(snapshot, config),
            bubbles: self.build_bubbles(snapshot),
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        snapshot: &MetricsSnapshot,
        config: &AggregatorConfig,
    ) -> Result<String, ComputeError> {
        let payload = self.encode(snapshot, config);
        serde_json::to_string_pretty(&payload).map_err(ComputeError::JsonError)
    }

    fn build_donut(&self, snapshot: &MetricsSnapshot) -> ChartDataset {
        ChartDataset {
            title: "Stressed vs Non-Stressed".to_string(),
            labels: vec!["Stressed".to_string(), "Not Stressed".to_string()],
            data: vec![snapshot.stressed_count, snapshot.not_stressed_count],
            colors: DONUT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn build_severity(&self, snapshot: &MetricsSnapshot, config: &AggregatorConfig) -> ChartDataset {
        ChartDataset {
            title: "Stress Severity Distribution".to_string(),
            labels: config.severity_vocabulary.labels().to_vec(),
            data: snapshot.severity_counts.as_array().to_vec(),
            colors: SEVERITY_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn build_bubbles(&self, snapshot: &MetricsSnapshot) -> Vec<EncodedBubble> {
        let plotted = self.layout == BubbleLayout::Plot;

        snapshot
            .bubbles
            .iter()
            .map(|bubble| EncodedBubble {
                label: bubble.label.clone(),
                count: bubble.count,
                radius: bubble.radius,
                x: plotted.then_some(bubble.position.x),
                y: plotted.then_some(bubble.position.y),
                color: bubble.color.css(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Aggregator;
    use crate::config::SeverityVocabulary;
    use crate::types::Record;
    use pretty_assertions::assert_eq;

    fn sample_snapshot(config: &AggregatorConfig) -> MetricsSnapshot {
        let records = vec![
            Record::stressed(Some("Low"), Some("workload")),
            Record::stressed(Some("High"), Some("exams")),
            Record::stressed(Some("High"), Some("workload")),
            Record::not_stressed(),
        ];
        Aggregator::new(config.clone()).unwrap().aggregate(&records)
    }

    #[test]
    fn test_encode_datasets() {
        let config = AggregatorConfig::default();
        let encoder = ChartEncoder::with_instance_id("test-instance".to_string());
        let payload = encoder.encode(&sample_snapshot(&config), &config);

        assert_eq!(payload.producer.instance_id, "test-instance");
        assert_eq!(payload.producer.name, PRODUCER_NAME);
        assert_eq!(payload.summary.total_count, 4);
        assert_eq!(payload.summary.stressed_ratio, Some(0.75));

        assert_eq!(payload.donut.labels, vec!["Stressed", "Not Stressed"]);
        assert_eq!(payload.donut.data, vec![3, 1]);
        assert_eq!(payload.donut.colors, vec!["#FF6384", "#36A2EB"]);

        assert_eq!(payload.severity.labels, vec!["Low", "Medium", "High"]);
        assert_eq!(payload.severity.data, vec![1, 0, 2]);

        assert_eq!(payload.bubbles.len(), 2);
        assert_eq!(payload.bubbles[0].label, "workload");
        assert_eq!(payload.bubbles[0].x, Some(1));
        assert_eq!(payload.bubbles[0].y, Some(2));
        assert_eq!(payload.bubbles[1].color, "hsl(60, 70%, 50%)");
    }

    #[test]
    fn test_severity_labels_follow_vocabulary() {
        let config = AggregatorConfig::default().with_vocabulary(SeverityVocabulary::moderate());
        let payload = ChartEncoder::new().encode(&sample_snapshot(&config), &config);
        assert_eq!(payload.severity.labels, vec!["Low", "Moderate", "High"]);
    }

    #[test]
    fn test_grid_layout_omits_position() {
        let config = AggregatorConfig::default();
        let encoder = ChartEncoder::new().with_layout(BubbleLayout::Grid);
        let json = encoder.encode_to_json(&sample_snapshot(&config), &config).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

        let bubble = &payload["bubbles"][0];
        assert!(bubble.get("x").is_none());
        assert!(bubble.get("y").is_none());
        assert_eq!(bubble["radius"], 80.0);
    }

    #[test]
    fn test_empty_snapshot() {
        let config = AggregatorConfig::default();
        let payload = ChartEncoder::new().encode(&MetricsSnapshot::default(), &config);

        assert_eq!(payload.summary.stressed_ratio, None);
        assert_eq!(payload.donut.data, vec![0, 0]);
        assert_eq!(payload.severity.data, vec![0, 0, 0]);
        assert!(payload.bubbles.is_empty());
    }
}
