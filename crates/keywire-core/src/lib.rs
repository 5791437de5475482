#![forbid(unsafe_code)]

//! Core: input decoding for remote terminal clients.
//!
//! Raw bytes from a client connection become [`InputEvent`]s in four steps:
//! [`normalize`](normalize::normalize) turns the chunk into text,
//! [`mouse_filter`] drops chunks carrying mouse reports,
//! [`tokenize`](tokenizer::tokenize) splits escape sequences from plain
//! characters, and [`classify`](classifier::classify) names each token.

pub mod classifier;
pub mod code_table;
pub mod config;
pub mod decoder;
pub mod emitter;
pub mod event;
pub mod logging;
pub mod mouse_filter;
pub mod normalize;
pub mod tokenizer;

mod patterns;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, trace_span};

pub use config::{ConfigError, DecoderConfig};
pub use decoder::{InputDecoder, decode_chunk};
pub use emitter::EventEmitter;
pub use event::{CursorPosition, InputEvent, KeyEvent, KeyName, KeyPress, Modifiers};
