//! Error types.

use crate::track::TrackId;
use thiserror::Error;

/// Error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The session already holds the maximum number of tracks.
    #[error("Maximum track limit reached ({0} tracks)")]
    TrackLimitReached(usize),

    /// The session already holds the maximum number of imported tracks.
    #[error("Maximum import tracks reached ({0} imports)")]
    ImportLimitReached(usize),

    /// A single-track operation ran without a selection.
    #[error("No track selected")]
    NoTrackSelected,

    /// Trim requested without a region.
    #[error("No trim region set")]
    NoRegionSet,

    /// Track id not in the session.
    #[error("Unknown track: {0}")]
    UnknownTrack(TrackId),

    /// Region bounds are not a forward range of non-negative seconds.
    #[error("Invalid trim region {start}..{end}")]
    InvalidRegion { start: f64, end: f64 },

    /// The capture source could not be opened.
    #[error("Capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// DSP error.
    #[error("DSP error: {0}")]
    Dsp(#[from] montage_dsp::Error),
}

/// Result type.
pub type Result<T> = std::result::Result<T, SessionError>;
