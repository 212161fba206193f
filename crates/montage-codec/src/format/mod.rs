//! Container codecs
//!
//! - `wav`: canonical WAV encode (byteorder) and decode (hound), always built
//! - `compressed`: MP3/Ogg/WebM/FLAC/MP4 decode via symphonia (feature `compressed`)

pub mod wav;

#[cfg(feature = "compressed")]
pub mod compressed;
