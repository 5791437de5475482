#![forbid(unsafe_code)]

//! Byte normalization.
//!
//! A raw chunk becomes text by UTF-8 decoding, with one exception: a chunk
//! that is exactly one byte with the high bit set is the classic
//! "8th bit as meta" encoding, and becomes `ESC` followed by the low seven
//! bits. Multi-byte chunks are never reinterpreted this way.

use std::borrow::Cow;

/// The escape character.
pub const ESC: char = '\x1b';

/// Convert one raw chunk into normalized text.
///
/// Malformed UTF-8 is replaced with U+FFFD; decoding never fails.
#[must_use]
pub fn normalize(chunk: &[u8]) -> Cow<'_, str> {
    match chunk {
        [byte] if *byte > 0x7F => {
            let low = char::from(byte - 0x80);
            Cow::Owned([ESC, low].iter().collect())
        }
        _ => String::from_utf8_lossy(chunk),
    }
}
