//! Text codec for device lines.
//!
//! Arduino sketches print raw bytes, so lines are decoded with a legacy
//! single-byte code page rather than UTF-8. The encoding is looked up by its
//! WHATWG label so it can be changed from the config file or command line.
//! Operator input goes out as UTF-8 regardless.

use crate::error::BridgeError;
use encoding_rs::{Encoding, WINDOWS_1252};
use std::borrow::Cow;

/// Default label, matching what the Jtagger sketch emits.
pub const DEFAULT_ENCODING: &str = "windows-1252";

#[derive(Debug, Clone, Copy)]
pub struct LineCodec {
    encoding: &'static Encoding,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self {
            encoding: WINDOWS_1252,
        }
    }
}

impl LineCodec {
    /// Resolve a codec from a label such as `cp1252`, `latin1` or `utf-8`.
    pub fn for_label(label: &str) -> Result<Self, BridgeError> {
        Encoding::for_label(label.trim().as_bytes())
            .map(|encoding| Self { encoding })
            .ok_or_else(|| BridgeError::UnknownEncoding(label.to_string()))
    }

    /// Canonical name of the underlying encoding.
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        let (text, had_errors) = self.encoding.decode_without_bom_handling(bytes);
        if had_errors {
            log::debug!("replaced malformed {} sequence in device output", self.name());
        }
        text
    }
}
