//! # Analysis Configuration
//!
//! All tunable parameters of the analysis pipeline in one serializable
//! struct. Missing fields fall back to their defaults when deserializing, so
//! a partial JSON document is a valid configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::grouping::DEFAULT_GROUPING_THRESHOLD_HZ;
use crate::segmentation::SegmenterConfig;
use crate::stability::{DEFAULT_MIN_FRAGMENT_LEN, DEFAULT_STABLE_THRESHOLD};
use crate::tuning::{GAMELAN_TUNINGS, ReferenceTuning};

/// How a stable segment is reduced to one representative frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Representative {
    /// Mean Hz of every frame in the segment.
    SegmentMean,
    /// Mean Hz of the recursively selected stable part of the segment.
    /// Split-off fragments shorter than `min_fragment_len` are discarded.
    StablePart {
        threshold: f64,
        #[serde(default = "default_min_fragment_len")]
        min_fragment_len: usize,
    },
}

fn default_min_fragment_len() -> usize {
    DEFAULT_MIN_FRAGMENT_LEN
}

impl Default for Representative {
    fn default() -> Self {
        Representative::StablePart {
            threshold: DEFAULT_STABLE_THRESHOLD,
            min_fragment_len: DEFAULT_MIN_FRAGMENT_LEN,
        }
    }
}

/// Parameters for [`crate::pipeline::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub segmenter: SegmenterConfig,
    pub representative: Representative,
    /// Max gap in Hz between neighbouring frequencies of one pitch class.
    pub grouping_threshold_hz: f64,
    /// Reference tunings to score against.
    pub tunings: Vec<ReferenceTuning>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            segmenter: SegmenterConfig::default(),
            representative: Representative::default(),
            grouping_threshold_hz: DEFAULT_GROUPING_THRESHOLD_HZ,
            tunings: GAMELAN_TUNINGS.clone(),
        }
    }
}

impl AnalysisConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AnalysisConfig =
            serde_json::from_str(json).context("Failed to parse analysis config")?;
        config.validate().context("Invalid analysis config")?;
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize analysis config")
    }

    /// Checks every parameter for a usable value.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.segmenter.validate()?;
        if !(self.grouping_threshold_hz >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "grouping_threshold_hz must be non-negative, got {}",
                self.grouping_threshold_hz
            )));
        }
        if let Representative::StablePart { threshold, .. } = self.representative {
            if !(threshold > 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "stable part threshold must be positive, got {threshold}"
                )));
            }
        }
        if self.tunings.is_empty() {
            return Err(Error::InvalidParameter(
                "at least one reference tuning is required".into(),
            ));
        }
        Ok(())
    }
}
