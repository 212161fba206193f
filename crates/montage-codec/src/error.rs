//! Error types for montage-codec

use thiserror::Error;

/// Codec error type
#[derive(Error, Debug)]
pub enum CodecError {
    /// Truncated, corrupt or empty input
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Container not supported (or its feature not enabled)
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Work needs the external transcoder but none is configured
    #[error("No transcoder available for {0}")]
    TranscodeUnavailable(String),

    /// The external transcoder reported a failure
    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    /// Decoded data did not form a valid buffer
    #[error("Invalid audio data: {0}")]
    Buffer(#[from] montage_core::Error),
}

/// Failure reported by a [`Transcoder`](crate::Transcoder).
///
/// An empty result is not an error at this level; callers decide what an empty
/// output means.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscodeError {
    #[error("Transcoder failed: {0}")]
    Failed(String),

    #[error("Transcoder does not support filter '{0}'")]
    UnsupportedFilter(String),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

impl From<hound::Error> for CodecError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::Unsupported => {
                CodecError::UnsupportedFormat("unsupported WAV sample format".into())
            }
            other => CodecError::DecodeError(other.to_string()),
        }
    }
}

#[cfg(feature = "compressed")]
impl From<symphonia::core::errors::Error> for CodecError {
    fn from(e: symphonia::core::errors::Error) -> Self {
        use symphonia::core::errors::Error as SymphoniaError;
        match e {
            SymphoniaError::Unsupported(what) => CodecError::UnsupportedFormat(what.to_string()),
            other => CodecError::DecodeError(other.to_string()),
        }
    }
}
