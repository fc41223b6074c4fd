//! Text charset used for names and addresses on the wire.

use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// Charset for every text field sent to or read from a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// One byte per character. Characters above U+00FF become `?`.
    #[default]
    Latin1,

    /// UTF-8. Invalid sequences are replaced when decoding.
    Utf8,
}

impl Charset {
    /// Encode text to wire bytes
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Charset::Latin1 => text
                .chars()
                .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
                .collect(),
            Charset::Utf8 => text.as_bytes().to_vec(),
        }
    }

    /// Decode wire bytes to text
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Charset::Latin1 => f.write_str("ISO8859-1"),
            Charset::Utf8 => f.write_str("UTF-8"),
        }
    }
}

impl FromStr for Charset {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "ISO8859-1" | "ISO-8859-1" | "LATIN1" | "LATIN-1" | "ASCII" | "US-ASCII" => {
                Ok(Charset::Latin1)
            }
            "UTF-8" | "UTF8" => Ok(Charset::Utf8),
            other => Err(TrackerError::Config(format!("unsupported charset: {}", other))),
        }
    }
}
