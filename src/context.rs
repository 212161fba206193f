//! Explicit editing context handed to every pipeline run.

use crate::Result;
use montage_codec::Transcoder;
use montage_core::MontageConfig;
use std::fmt;
use std::sync::Arc;

/// Configuration plus the optional external transcoder.
///
/// Cheap to clone; there is no process-wide audio context.
#[derive(Clone)]
pub struct EditContext {
    config: Arc<MontageConfig>,
    transcoder: Option<Arc<dyn Transcoder>>,
}

impl EditContext {
    /// Fails with `InvalidConfig` when `config` does not validate.
    pub fn new(config: MontageConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transcoder: None,
        })
    }

    pub fn with_transcoder(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.transcoder = Some(transcoder);
        self
    }

    pub fn config(&self) -> &MontageConfig {
        &self.config
    }

    pub fn transcoder(&self) -> Option<&dyn Transcoder> {
        self.transcoder.as_deref()
    }
}

impl Default for EditContext {
    fn default() -> Self {
        Self {
            config: Arc::new(MontageConfig::default()),
            transcoder: None,
        }
    }
}

impl fmt::Debug for EditContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditContext")
            .field("config", &self.config)
            .field("transcoder", &self.transcoder.is_some())
            .finish()
    }
}
