//! Linear multi-track editing for Montage.
//!
//! - [`TrackSession`]: up to three tracks (one recorded, two imported), one
//!   selected at a time, edited in place with the DSP operators
//! - [`capture`]: bounded asynchronous recording from a [`CaptureSource`]

mod error;
pub use error::{Result, SessionError};

mod track;
pub use track::{Track, TrackId, TrackOrigin};

mod session;
pub use session::TrackSession;

pub mod capture;
pub use capture::{
    capture, stop_signal, CaptureEnd, CaptureSource, CaptureStream, CapturedAudio, StopHandle,
    StopSignal,
};
