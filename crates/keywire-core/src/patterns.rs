#![forbid(unsafe_code)]

//! Escape-sequence patterns shared by the tokenizer and the classifier.
//!
//! Compiled once on first use and shared read-only by every decoder.
//!
//! `.` is never used: the "any character" slots exclude line terminators
//! (`\n`, `\r`, U+2028, U+2029), so `ESC \r` is two tokens rather than one.

use std::sync::LazyLock;

use regex::Regex;

/// Any character except a line terminator.
const ANY: &str = r"[^\n\r\x{2028}\x{2029}]";

/// Function keys: one or more ESC, a prefix marker, then one of
/// 1. `digits [; digits] (~|^|$)` (groups 2, 3, 4),
/// 2. `M` + mouse button byte + two coordinate bytes (groups 5, 6, 7),
/// 3. `[1;] [digits] letter` (groups 8, 9).
///
/// Group 1 is the prefix (`O`, `N`, `[` or `[[`).
static FUNCTION_KEY_SRC: LazyLock<String> = LazyLock::new(|| {
    format!(
        r"\x1b+(O|N|\[|\[\[)(?:([0-9]+)(?:;([0-9]+))?([~^$])|M([@ #!a`])({ANY})({ANY})|(?:1;)?([0-9]+)?([a-zA-Z]))"
    )
});

/// ESC followed by one alphanumeric character.
const META_KEYCODE_SRC: &str = r"\x1b([a-zA-Z0-9])";

/// Device status response shape: `ESC [` digits/semicolons, then a letter.
const DEVICE_STATUS_SRC: &str = r"\x1b\[[0-9;]+[A-Za-z]";

/// Unified tokenizer pattern, alternatives in priority order.
pub(crate) static ESCAPE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    let src = format!(
        "{}|{META_KEYCODE_SRC}|{DEVICE_STATUS_SRC}|\\x1b{ANY}",
        *FUNCTION_KEY_SRC
    );
    Regex::new(&src).expect("invalid escape code pattern")
});

/// Function-key pattern anchored at the token start.
pub(crate) static FUNCTION_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^(?:{})", *FUNCTION_KEY_SRC)).expect("invalid function key pattern")
});

/// Meta-keycode pattern matching a whole token.
pub(crate) static META_KEYCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{META_KEYCODE_SRC}$")).expect("invalid meta keycode pattern")
});

/// Cursor position report: `ESC [ fields R`, searched anywhere in a token.
pub(crate) static CURSOR_REPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[([0-9;]+)R").expect("invalid cursor report pattern")
});

/// A trailing fragment that may still grow into a function key or a mouse
/// report: ESCs plus a prefix marker and parameters, or an X10 report
/// missing some of its three payload bytes.
///
/// A bare `ESC` is never a fragment; it is the Escape key.
pub(crate) static PARTIAL_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\x1b+(?:O|N|\[\[?)[<0-9;]*$|\x1b\[M{ANY}{{0,2}}$"))
        .expect("invalid partial escape pattern")
});
