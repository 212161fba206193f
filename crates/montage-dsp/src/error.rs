//! Error types for montage-dsp

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    InvalidRegion {
        start_frame: i64,
        end_frame: i64,
        frame_count: usize,
    },
    InsufficientSources(usize),
    SampleRateMismatch {
        expected: u32,
        found: u32,
    },
    InvalidParameter(String),
    Buffer(montage_core::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRegion {
                start_frame,
                end_frame,
                frame_count,
            } => write!(
                f,
                "Invalid region: frames {}..{} of {}",
                start_frame, end_frame, frame_count
            ),
            Error::InsufficientSources(found) => {
                write!(f, "Merging requires at least two sources, got {}", found)
            }
            Error::SampleRateMismatch { expected, found } => write!(
                f,
                "Sample rate mismatch: expected {} Hz, found {} Hz",
                expected, found
            ),
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::Buffer(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<montage_core::Error> for Error {
    fn from(err: montage_core::Error) -> Self {
        Error::Buffer(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
