//! Offline DSP operators over [`SampleBuffer`](montage_core::SampleBuffer)s.
//!
//! Every operator borrows its input and returns a new buffer; inputs are never
//! modified.

mod error;
pub use error::{Error, Result};

mod echo;
pub use echo::{echo, EchoParams};

mod fade;
pub use fade::{fade_in, fade_out};

mod merge;
pub use merge::{concat, merge, MergeOptions};

mod trim;
pub use trim::{trim, TrimRegion};
