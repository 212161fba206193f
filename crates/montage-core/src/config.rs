//! Editing session configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the samples of merged sources are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStrategy {
    /// Sum aligned frames, padding shorter sources with silence.
    #[default]
    Mix,
    /// Join sources back to back.
    Concat,
}

/// Gain applied after mixing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeNormalization {
    /// Scale the sum by `1/N`.
    #[default]
    Average,
    /// Keep the raw sum (may exceed full scale).
    Sum,
}

/// Where delay-line effects (echo, reverb) are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectRendering {
    #[default]
    Local,
    /// Hand the audio to the external transcoder.
    Transcoder,
}

/// Configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MontageConfig {
    /// Upper bound of a single capture.
    pub record_budget: Duration,
    pub max_tracks: usize,
    pub max_imported_tracks: usize,
    pub merge_strategy: MergeStrategy,
    pub merge_normalization: MergeNormalization,
    pub effect_rendering: EffectRendering,
    /// Fade length used when an Effect node does not set one.
    pub default_fade_seconds: f64,
}

impl Default for MontageConfig {
    fn default() -> Self {
        Self {
            record_budget: Duration::from_secs(5),
            max_tracks: 3,
            max_imported_tracks: 2,
            merge_strategy: MergeStrategy::Mix,
            merge_normalization: MergeNormalization::Average,
            effect_rendering: EffectRendering::Local,
            default_fade_seconds: 1.0,
        }
    }
}

impl MontageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.record_budget.is_zero() {
            return Err(Error::InvalidConfig("record_budget must be non-zero".into()));
        }
        if self.max_tracks == 0 {
            return Err(Error::InvalidConfig("max_tracks must be at least 1".into()));
        }
        if self.max_imported_tracks > self.max_tracks {
            return Err(Error::InvalidConfig(format!(
                "max_imported_tracks {} exceeds max_tracks {}",
                self.max_imported_tracks, self.max_tracks
            )));
        }
        if !self.default_fade_seconds.is_finite() || self.default_fade_seconds < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "default_fade_seconds {} must be a non-negative number",
                self.default_fade_seconds
            )));
        }
        Ok(())
    }
}
