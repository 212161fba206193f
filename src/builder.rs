//! Builder for configuring and constructing a `MontageEngine`.

use crate::context::EditContext;
use crate::{MontageEngine, Result};
use montage_codec::Transcoder;
use montage_core::{EffectRendering, MergeNormalization, MergeStrategy, MontageConfig};
use std::sync::Arc;
use std::time::Duration;

/// Starts from [`MontageConfig::default`]; individual setters override single
/// fields. The configuration is validated by [`build`](Self::build).
///
/// # Example
///
/// ```ignore
/// use montage::prelude::*;
///
/// let engine = MontageEngine::builder()
///     .record_budget(Duration::from_secs(10))
///     .merge_strategy(MergeStrategy::Concat)
///     .transcoder(Arc::new(MyFfmpeg::new()))
///     .build()?;
/// ```
#[derive(Default)]
pub struct MontageEngineBuilder {
    config: MontageConfig,
    transcoder: Option<Arc<dyn Transcoder>>,
}

impl MontageEngineBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: MontageConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 5 s
    pub fn record_budget(mut self, budget: Duration) -> Self {
        self.config.record_budget = budget;
        self
    }

    /// Default: 3
    pub fn max_tracks(mut self, count: usize) -> Self {
        self.config.max_tracks = count;
        self
    }

    /// Default: 2
    pub fn max_imported_tracks(mut self, count: usize) -> Self {
        self.config.max_imported_tracks = count;
        self
    }

    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.config.merge_strategy = strategy;
        self
    }

    pub fn merge_normalization(mut self, normalization: MergeNormalization) -> Self {
        self.config.merge_normalization = normalization;
        self
    }

    pub fn effect_rendering(mut self, rendering: EffectRendering) -> Self {
        self.config.effect_rendering = rendering;
        self
    }

    /// Default: 1 s
    pub fn default_fade_seconds(mut self, seconds: f64) -> Self {
        self.config.default_fade_seconds = seconds;
        self
    }

    /// External transcoder for non-WAV export and transcoder-rendered effects.
    pub fn transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = Some(transcoder);
        self
    }

    pub fn build(self) -> Result<MontageEngine> {
        let mut context = EditContext::new(self.config)?;
        if let Some(transcoder) = self.transcoder {
            context = context.with_transcoder(transcoder);
        }
        Ok(MontageEngine::from_context(context))
    }
}
