#![forbid(unsafe_code)]

//! Mouse report detection.
//!
//! Mouse reports are not decoded. If any known report form appears anywhere
//! in a chunk, the whole chunk is discarded, including key input that
//! arrived in the same read.

use std::sync::LazyLock;

use regex::RegexSet;

/// Mouse report encodings recognized by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseProtocol {
    /// X10 / xterm normal tracking: `ESC [ M` + three raw bytes.
    X10,
    /// urxvt (1015): `ESC [ b ; x ; y M`.
    Urxvt,
    /// SGR (1006): `ESC [ < b ; x ; y M|m`.
    Sgr,
    /// DEC locator report: `ESC [ < e ; b ; r ; c & w`.
    DecLocator,
    /// Vendor bracketed coordinates: `ESC [ 24n ~ [ x , y ] CR`.
    BracketedCoordinates,
    /// Focus in/out report: `ESC [ I` / `ESC [ O`.
    Focus,
}

impl MouseProtocol {
    const ALL: [Self; 6] = [
        Self::X10,
        Self::Urxvt,
        Self::Sgr,
        Self::DecLocator,
        Self::BracketedCoordinates,
        Self::Focus,
    ];

    const fn pattern(self) -> &'static str {
        match self {
            Self::X10 => r"\x1b\[M",
            Self::Urxvt => r"\x1b\[[0-9]+;[0-9]+;[0-9]+M",
            Self::Sgr => r"\x1b\[<[0-9]+;[0-9]+;[0-9]+[mM]",
            Self::DecLocator => r"\x1b\[<[0-9]+;[0-9]+;[0-9]+;[0-9]+&w",
            Self::BracketedCoordinates => r"\x1b\[24[0135]~\[[0-9]+,[0-9]+\]\r",
            Self::Focus => r"\x1b\[[OI]",
        }
    }
}

static MOUSE_REPORTS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(MouseProtocol::ALL.iter().map(|p| p.pattern()))
        .expect("invalid mouse report pattern")
});

/// Return the first mouse report form found anywhere in `text`.
#[must_use]
pub fn detect(text: &str) -> Option<MouseProtocol> {
    MOUSE_REPORTS
        .matches(text)
        .iter()
        .next()
        .map(|index| MouseProtocol::ALL[index])
}

/// Whether `text` contains any mouse report.
#[must_use]
pub fn is_mouse_input(text: &str) -> bool {
    MOUSE_REPORTS.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_protocol() {
        let cases = [
            ("\x1b[M #!", MouseProtocol::X10),
            ("\x1b[32;10;20M", MouseProtocol::Urxvt),
            ("\x1b[<0;10;20M", MouseProtocol::Sgr),
            ("\x1b[<0;10;20m", MouseProtocol::Sgr),
            ("\x1b[<2;4;10;20&w", MouseProtocol::DecLocator),
            ("\x1b[241~[10,20]\r", MouseProtocol::BracketedCoordinates),
            ("\x1b[I", MouseProtocol::Focus),
            ("\x1b[O", MouseProtocol::Focus),
        ];
        for (text, expected) in cases {
            assert_eq!(detect(text), Some(expected), "input {text:?}");
        }
    }

    #[test]
    fn match_anywhere_in_chunk() {
        assert!(is_mouse_input("abc\x1b[<0;10;20Mxyz"));
    }

    #[test]
    fn keys_are_not_mouse() {
        for text in ["\x1b[A", "\x1bOP", "\x1b[2;5~", "\x1b[24;80R", "hello", "\x1bO"] {
            assert!(!is_mouse_input(text), "input {text:?}");
        }
    }

    #[test]
    fn ss3_is_not_focus() {
        // Focus reports are CSI-prefixed; SS3 arrows must survive.
        assert_eq!(detect("\x1bOA"), None);
    }
}
