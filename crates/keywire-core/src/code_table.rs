#![forbid(unsafe_code)]

//! Code identity table.
//!
//! Maps the normalized code of a function-key token (prefix marker, numeric
//! key field, terminator and final letter, with ESCs and modifier fields
//! stripped) to a canonical key name. Several terminal dialects send
//! different codes for the same physical key; some dialects encode a
//! modifier in the code itself, which the entry records as an override.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::event::KeyName;
use crate::event::KeyName::{
    Clear, Delete, Down, End, F, Home, Insert, Left, PageDown, PageUp, Right, Tab, Up,
};

/// One row of the code identity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeIdentity {
    /// Normalized code, e.g. `"[11~"` or `"OP"`.
    pub code: &'static str,
    /// Canonical key name.
    pub name: KeyName,
    /// Ctrl override implied by the code.
    pub ctrl: Option<bool>,
    /// Meta override implied by the code.
    pub meta: Option<bool>,
    /// Shift override implied by the code.
    pub shift: Option<bool>,
}

impl CodeIdentity {
    const fn new(code: &'static str, name: KeyName) -> Self {
        Self {
            code,
            name,
            ctrl: None,
            meta: None,
            shift: None,
        }
    }

    const fn shifted(mut self) -> Self {
        self.shift = Some(true);
        self
    }

    const fn ctrled(mut self) -> Self {
        self.ctrl = Some(true);
        self
    }
}

const fn id(code: &'static str, name: KeyName) -> CodeIdentity {
    CodeIdentity::new(code, name)
}

/// Every known code, grouped by dialect.
pub static ENTRIES: &[CodeIdentity] = &[
    // xterm/gnome SS3
    id("OP", F(1)),
    id("OQ", F(2)),
    id("OR", F(3)),
    id("OS", F(4)),
    id("OA", Up),
    id("OB", Down),
    id("OC", Right),
    id("OD", Left),
    id("OE", Clear),
    id("OF", End),
    id("OH", Home),
    // xterm/rxvt
    id("[11~", F(1)),
    id("[12~", F(2)),
    id("[13~", F(3)),
    id("[14~", F(4)),
    id("[1~", Home),
    id("[2~", Insert),
    id("[3~", Delete),
    id("[4~", End),
    id("[5~", PageUp),
    id("[6~", PageDown),
    // Cygwin & libuv
    id("[[A", F(1)),
    id("[[B", F(2)),
    id("[[C", F(3)),
    id("[[D", F(4)),
    id("[[E", F(5)),
    // common F5-F12
    id("[15~", F(5)),
    id("[17~", F(6)),
    id("[18~", F(7)),
    id("[19~", F(8)),
    id("[20~", F(9)),
    id("[21~", F(10)),
    id("[23~", F(11)),
    id("[24~", F(12)),
    // xterm CSI
    id("[A", Up),
    id("[B", Down),
    id("[C", Right),
    id("[D", Left),
    id("[E", Clear),
    id("[F", End),
    id("[H", Home),
    // PuTTY
    id("[[5~", PageUp),
    id("[[6~", PageDown),
    // rxvt
    id("[7~", Home),
    id("[8~", End),
    // rxvt + shift
    id("[a", Up).shifted(),
    id("[b", Down).shifted(),
    id("[c", Right).shifted(),
    id("[d", Left).shifted(),
    id("[e", Clear).shifted(),
    id("[2$", Insert).shifted(),
    id("[3$", Delete).shifted(),
    id("[5$", PageUp).shifted(),
    id("[6$", PageDown).shifted(),
    id("[7$", Home).shifted(),
    id("[8$", End).shifted(),
    // rxvt + ctrl
    id("Oa", Up).ctrled(),
    id("Ob", Down).ctrled(),
    id("Oc", Right).ctrled(),
    id("Od", Left).ctrled(),
    id("Oe", Clear).ctrled(),
    id("[2^", Insert).ctrled(),
    id("[3^", Delete).ctrled(),
    id("[5^", PageUp).ctrled(),
    id("[6^", PageDown).ctrled(),
    id("[7^", Home).ctrled(),
    id("[8^", End).ctrled(),
    // back-tab
    id("[Z", Tab).shifted(),
];

static BY_CODE: LazyLock<HashMap<&'static str, &'static CodeIdentity>> =
    LazyLock::new(|| ENTRIES.iter().map(|entry| (entry.code, entry)).collect());

/// Look up a normalized code.
#[must_use]
pub fn lookup(code: &str) -> Option<&'static CodeIdentity> {
    BY_CODE.get(code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        assert_eq!(BY_CODE.len(), ENTRIES.len());
    }

    #[test]
    fn dialects_agree_on_f1() {
        for code in ["OP", "[11~", "[[A"] {
            assert_eq!(lookup(code).map(|e| e.name), Some(F(1)), "code {code}");
        }
    }

    #[test]
    fn modifier_overrides() {
        let entry = lookup("[c").expect("rxvt shift right");
        assert_eq!(entry.name, Right);
        assert_eq!(entry.shift, Some(true));
        assert_eq!(entry.ctrl, None);

        let entry = lookup("[5^").expect("rxvt ctrl page up");
        assert_eq!(entry.name, PageUp);
        assert_eq!(entry.ctrl, Some(true));

        let entry = lookup("[Z").expect("back-tab");
        assert_eq!((entry.name, entry.shift), (Tab, Some(true)));
    }

    #[test]
    fn unknown_code() {
        assert!(lookup("[16~").is_none());
        assert!(lookup("").is_none());
    }
}
