//! Character encodings for file-backed output.

use crate::error::GitMetaError;
use std::fmt;
use std::str::FromStr;

/// Replacement byte for characters the target encoding cannot represent.
const REPLACEMENT: u8 = b'?';

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
    Utf16Be,
    Utf16Le,
}

impl Encoding {
    /// Canonical name of the encoding.
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Ascii => "US-ASCII",
            Encoding::Latin1 => "ISO-8859-1",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf16Le => "UTF-16LE",
        }
    }

    /// Encode `text`, replacing unmappable characters with `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { REPLACEMENT })
                .collect(),
            Encoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(REPLACEMENT))
                .collect(),
            Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Encoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
        }
    }
}

impl FromStr for Encoding {
    type Err = GitMetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('_', "-");
        match normalized.as_str() {
            "UTF-8" | "UTF8" => Ok(Encoding::Utf8),
            "US-ASCII" | "ASCII" => Ok(Encoding::Ascii),
            "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1" => Ok(Encoding::Latin1),
            "UTF-16BE" | "UTF16BE" => Ok(Encoding::Utf16Be),
            "UTF-16LE" | "UTF16LE" => Ok(Encoding::Utf16Le),
            _ => Err(GitMetaError::Config(format!(
                "unsupported output encoding '{}' (supported: UTF-8, US-ASCII, ISO-8859-1, UTF-16BE, UTF-16LE)",
                s
            ))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
