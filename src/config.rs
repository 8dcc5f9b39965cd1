//! Aggregator configuration
//!
//! The two choices the upstream producers disagree on (severity vocabulary and the
//! scope of severity/reason counting) are explicit configuration here, together
//! with the bubble geometry and palette constants.

use crate::error::ComputeError;
use crate::types::{Severity, StressLabel};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Default base radius of a bubble
pub const DEFAULT_BASE_RADIUS: f64 = 50.0;
/// Default radius added per occurrence
pub const DEFAULT_SCALE_FACTOR: f64 = 15.0;
/// Default radius ceiling
pub const DEFAULT_MAX_RADIUS: f64 = 180.0;
/// Default hue distance between consecutive bubbles (degrees)
pub const DEFAULT_HUE_STEP: u16 = 60;

/// Category strings mapped onto the Low, Medium and High slots, in that order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeverityVocabulary([String; 3]);

impl Default for SeverityVocabulary {
    fn default() -> Self {
        Self::new("Low", "Medium", "High")
    }
}

impl SeverityVocabulary {
    pub fn new(low: impl Into<String>, medium: impl Into<String>, high: impl Into<String>) -> Self {
        SeverityVocabulary([low.into(), medium.into(), high.into()])
    }

    /// The `Low / Moderate / High` vocabulary used by some producers
    pub fn moderate() -> Self {
        Self::new("Low", "Moderate", "High")
    }

    pub fn labels(&self) -> &[String; 3] {
        &self.0
    }

    pub fn label(&self, severity: Severity) -> &str {
        &self.0[severity.index()]
    }

    /// Resolve an upstream category string to its slot. Case-sensitive.
    pub fn resolve(&self, category: &str) -> Option<Severity> {
        Severity::ALL
            .into_iter()
            .find(|severity| self.label(*severity) == category)
    }

    fn validate(&self) -> Result<(), ComputeError> {
        if self.0.iter().any(|label| label.is_empty()) {
            return Err(ComputeError::InvalidConfig(
                "severity vocabulary entries must be non-empty".to_string(),
            ));
        }
        let distinct: HashSet<&str> = self.0.iter().map(String::as_str).collect();
        if distinct.len() != self.0.len() {
            return Err(ComputeError::InvalidConfig(format!(
                "severity vocabulary entries must be distinct: {:?}",
                self.0
            )));
        }
        Ok(())
    }
}

impl FromStr for SeverityVocabulary {
    type Err = ComputeError;

    /// Parse a comma-separated triple such as `Low,Moderate,High`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [low, medium, high] => {
                let vocabulary = Self::new(*low, *medium, *high);
                vocabulary.validate()?;
                Ok(vocabulary)
            }
            _ => Err(ComputeError::InvalidConfig(format!(
                "severity vocabulary needs exactly three comma-separated labels, got {:?}",
                s
            ))),
        }
    }
}

/// Which records contribute to severity buckets and reason frequency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonScope {
    /// Only records labelled `Stressed`
    #[default]
    StressedOnly,
    /// Every record regardless of label
    AllRecords,
}

impl ReasonScope {
    pub fn includes(&self, label: StressLabel) -> bool {
        match self {
            ReasonScope::StressedOnly => label.is_stressed(),
            ReasonScope::AllRecords => true,
        }
    }
}

/// Linear, saturating bubble radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleScale {
    pub base_radius: f64,
    pub scale_factor: f64,
    pub min_radius: f64,
    pub max_radius: f64,
}

impl Default for BubbleScale {
    fn default() -> Self {
        Self {
            base_radius: DEFAULT_BASE_RADIUS,
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_radius: DEFAULT_BASE_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
        }
    }
}

impl BubbleScale {
    fn validate(&self) -> Result<(), ComputeError> {
        let constants = [
            ("base_radius", self.base_radius),
            ("scale_factor", self.scale_factor),
            ("min_radius", self.min_radius),
            ("max_radius", self.max_radius),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value < 0.0 {
                return Err(ComputeError::InvalidConfig(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }
        if self.min_radius > self.max_radius {
            return Err(ComputeError::InvalidConfig(format!(
                "min_radius ({}) exceeds max_radius ({})",
                self.min_radius, self.max_radius
            )));
        }
        Ok(())
    }
}

/// Index-driven hue palette with fixed saturation and lightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubblePalette {
    /// Degrees between consecutive bubbles
    pub hue_step: u16,
    /// Percent, 0-100
    pub saturation: u8,
    /// Percent, 0-100
    pub lightness: u8,
}

impl Default for BubblePalette {
    fn default() -> Self {
        Self {
            hue_step: DEFAULT_HUE_STEP,
            saturation: 70,
            lightness: 50,
        }
    }
}

impl BubblePalette {
    fn validate(&self) -> Result<(), ComputeError> {
        if self.saturation > 100 || self.lightness > 100 {
            return Err(ComputeError::InvalidConfig(format!(
                "saturation and lightness are percentages (got {}%, {}%)",
                self.saturation, self.lightness
            )));
        }
        Ok(())
    }
}

/// Full aggregator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub severity_vocabulary: SeverityVocabulary,
    pub reason_scope: ReasonScope,
    pub bubble_scale: BubbleScale,
    pub palette: BubblePalette,
}

impl AggregatorConfig {
    /// Load and validate configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: AggregatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn with_vocabulary(mut self, vocabulary: SeverityVocabulary) -> Self {
        self.severity_vocabulary = vocabulary;
        self
    }

    pub fn with_scope(mut self, scope: ReasonScope) -> Self {
        self.reason_scope = scope;
        self
    }

    pub fn validate(&self) -> Result<(), ComputeError> {
        self.severity_vocabulary.validate()?;
        self.bubble_scale.validate()?;
        self.palette.validate()
    }
}
