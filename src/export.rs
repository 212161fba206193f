//! Export boundary (upload or download of finished audio).

use async_trait::async_trait;
use montage_core::EncodedAudio;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Export rejected: {0}")]
    Rejected(String),
}

/// Receives encoded audio leaving the editor.
///
/// Returns where the audio can be retrieved from (an upload URL, a file path).
#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn deliver(&self, name: &str, audio: EncodedAudio) -> Result<String, ExportError>;
}
