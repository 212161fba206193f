//! Container identification.

/// Container of an encoded blob, as far as it can be told from its MIME type,
/// file extension or leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerHint {
    Wav,
    Mpeg,
    Webm,
    Ogg,
    Flac,
    Mp4,
    Unknown,
}

impl ContainerHint {
    /// Parse a MIME-like type (`audio/webm;codecs=opus` reads as `Webm`).
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "audio/wav" | "audio/wave" | "audio/x-wav" | "audio/vnd.wave" => Self::Wav,
            "audio/mpeg" | "audio/mp3" | "audio/mpeg3" => Self::Mpeg,
            "audio/webm" | "video/webm" | "audio/x-matroska" => Self::Webm,
            "audio/ogg" | "application/ogg" | "audio/opus" => Self::Ogg,
            "audio/flac" | "audio/x-flac" => Self::Flac,
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "audio/aac" | "video/mp4" => Self::Mp4,
            _ => Self::Unknown,
        }
    }

    /// Parse a file extension, with or without the leading dot.
    pub fn from_extension(extension: &str) -> Self {
        match extension
            .trim_start_matches('.')
            .to_ascii_lowercase()
            .as_str()
        {
            "wav" | "wave" => Self::Wav,
            "mp3" => Self::Mpeg,
            "webm" | "mkv" => Self::Webm,
            "ogg" | "oga" | "opus" => Self::Ogg,
            "flac" => Self::Flac,
            "m4a" | "mp4" | "aac" => Self::Mp4,
            _ => Self::Unknown,
        }
    }

    /// Identify a container from its magic bytes.
    pub fn sniff(bytes: &[u8]) -> Self {
        match bytes {
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Self::Wav,
            [b'I', b'D', b'3', ..] => Self::Mpeg,
            [0xFF, second, ..] if second & 0xE0 == 0xE0 => Self::Mpeg,
            [0x1A, 0x45, 0xDF, 0xA3, ..] => Self::Webm,
            [b'O', b'g', b'g', b'S', ..] => Self::Ogg,
            [b'f', b'L', b'a', b'C', ..] => Self::Flac,
            [_, _, _, _, b'f', b't', b'y', b'p', ..] => Self::Mp4,
            _ => Self::Unknown,
        }
    }

    /// Keep a known hint; sniff the bytes otherwise.
    pub fn resolve(self, bytes: &[u8]) -> Self {
        match self {
            Self::Unknown => Self::sniff(bytes),
            known => known,
        }
    }

    /// Extension handed to the compressed decoder's probe.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Self::Wav => Some("wav"),
            Self::Mpeg => Some("mp3"),
            Self::Webm => Some("webm"),
            Self::Ogg => Some("ogg"),
            Self::Flac => Some("flac"),
            Self::Mp4 => Some("m4a"),
            Self::Unknown => None,
        }
    }
}

/// Output container for exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerFormat {
    #[default]
    Wav,
    Mp3,
    Webm,
    Ogg,
}

impl ContainerFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
        }
    }
}
