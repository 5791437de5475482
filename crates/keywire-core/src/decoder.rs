#![forbid(unsafe_code)]

//! Chunk decoder: normalize, filter mouse reports, tokenize, classify.
//!
//! # Design
//!
//! [`decode_chunk`] is a pure function of one chunk. [`InputDecoder`] wraps it
//! with a [`DecoderConfig`]; with the default configuration it keeps no state
//! between chunks, so an escape sequence split across two reads decodes as
//! unrelated tokens. Enabling `carry_partial_escapes` holds back a trailing
//! fragment such as `ESC [ 1 ;` until the next chunk (or [`InputDecoder::flush`]).
//!
//! # Example
//!
//! ```
//! use keywire_core::decoder::decode_chunk;
//! use keywire_core::event::{InputEvent, KeyName};
//!
//! let events = decode_chunk(b"\x1b[A");
//! assert!(matches!(
//!     &events[..],
//!     [InputEvent::KeyPress(p)] if p.name() == Some(KeyName::Up)
//! ));
//! ```

use crate::classifier::classify;
use crate::config::DecoderConfig;
use crate::event::InputEvent;
use crate::mouse_filter;
use crate::normalize::normalize;
use crate::patterns::PARTIAL_ESCAPE;
use crate::tokenizer::tokenize;

/// Decode one raw chunk into events, in token order.
#[must_use]
pub fn decode_chunk(chunk: &[u8]) -> Vec<InputEvent> {
    decode_text(&normalize(chunk))
}

fn decode_text(text: &str) -> Vec<InputEvent> {
    let mouse = mouse_filter::detect(text);
    if mouse.is_some() {
        crate::trace!(protocol = ?mouse, len = text.len(), "dropping chunk with mouse report");
        return Vec::new();
    }
    tokenize(text).filter_map(classify).collect()
}

/// Per-connection decoder.
#[derive(Debug, Default)]
pub struct InputDecoder {
    config: DecoderConfig,
    /// Fragment held back from the previous chunk (carry mode only).
    pending: String,
}

impl InputDecoder {
    /// Create a decoder with the default (stateless) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a custom configuration.
    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            pending: String::new(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Text held back waiting for the rest of an escape sequence.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Decode one raw chunk.
    pub fn decode(&mut self, chunk: &[u8]) -> Vec<InputEvent> {
        let span = crate::trace_span!("decode", len = chunk.len());
        let _guard = span.enter();

        let normalized = normalize(chunk);
        if !self.config.carry_partial_escapes {
            return decode_text(&normalized);
        }

        let mut text = std::mem::take(&mut self.pending);
        text.push_str(&normalized);

        if let Some(split) = self.carry_point(&text) {
            self.pending = text.split_off(split);
            crate::trace!(pending = ?self.pending, "holding partial escape sequence");
        }

        decode_text(&text)
    }

    /// Decode and clear any held fragment.
    pub fn flush(&mut self) -> Vec<InputEvent> {
        let text = std::mem::take(&mut self.pending);
        if text.is_empty() {
            return Vec::new();
        }
        decode_text(&text)
    }

    /// Byte offset where a carriable trailing fragment starts.
    fn carry_point(&self, text: &str) -> Option<usize> {
        let fragment = PARTIAL_ESCAPE.find(text)?;
        (fragment.as_str().chars().count() <= self.config.max_carry_len).then_some(fragment.start())
    }
}
