//! Opaque encoded audio as handed over by capture/import collaborators.

use std::fmt;
use std::sync::Arc;

/// Encoded audio bytes tagged with a MIME-like type string.
///
/// Cloning shares the underlying bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    bytes: Arc<[u8]>,
    mime: String,
}

impl EncodedAudio {
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }

    /// WAV bytes (`audio/wav`).
    pub fn wav(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(bytes, "audio/wav")
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for EncodedAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedAudio")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}
