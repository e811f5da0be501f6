//! Strict text decoders tried in order by the extractor

use crate::error::{EtlError, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Bytes left undefined by Windows-1252
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// A text encoding the extractor can try
///
/// Every decoder is strict: a byte sequence the encoding does not define is a
/// decode error rather than a replacement character, so the extractor can
/// fall through to the next candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Iso8859_1,
    Windows1252,
}

impl TextEncoding {
    /// Default order: UTF-8, Latin-1, ISO-8859-1, Windows-1252
    pub const DEFAULT_ORDER: [Self; 4] = [
        Self::Utf8,
        Self::Latin1,
        Self::Iso8859_1,
        Self::Windows1252,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Iso8859_1 => "iso-8859-1",
            Self::Windows1252 => "cp1252",
        }
    }

    /// Decode the whole input or report the first offending byte
    pub fn decode(self, bytes: &[u8]) -> Result<Cow<'_, str>> {
        match self {
            Self::Utf8 => {
                let body = match Encoding::for_bom(bytes) {
                    Some((enc, bom_len)) if enc == UTF_8 => &bytes[bom_len..],
                    _ => bytes,
                };
                let valid = Encoding::utf8_valid_up_to(body);
                if valid < body.len() {
                    return Err(self.error_at(valid));
                }
                UTF_8
                    .decode_without_bom_handling_and_without_replacement(body)
                    .ok_or_else(|| self.error_at(valid))
            }
            // ISO/IEC 8859-1 leaves 0x80..=0x9F without graphic characters.
            Self::Latin1 | Self::Iso8859_1 => {
                if let Some(pos) = bytes.iter().position(|b| (0x80..=0x9F).contains(b)) {
                    return Err(self.error_at(pos));
                }
                Ok(encoding_rs::mem::decode_latin1(bytes))
            }
            Self::Windows1252 => {
                if let Some(pos) = bytes.iter().position(|b| CP1252_UNDEFINED.contains(b)) {
                    return Err(self.error_at(pos));
                }
                WINDOWS_1252
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .ok_or_else(|| self.error_at(0))
            }
        }
    }

    fn error_at(self, position: usize) -> EtlError {
        EtlError::Decode {
            encoding: self.name(),
            position,
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
