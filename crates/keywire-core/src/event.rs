#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! Every decoded chunk of remote terminal input becomes a sequence of
//! [`InputEvent`] values. All events derive `Clone`, `PartialEq`, and `Eq`
//! for use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - [`KeyName`] renders to the canonical lowercase strings navigation
//!   layers bind against ("up arrow", "page down", "f5", "a").
//! - `Modifiers` use bitflags with the xterm bit layout (shift = 1,
//!   meta = 2, ctrl = 4).
//! - A [`KeyPress`] always carries a character, a key, or both.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
#[cfg(not(target_arch = "wasm32"))]
use crossterm::event as cte;

/// Canonical decoded input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press, with an optional printable/control character and an
    /// optional structured key.
    KeyPress(KeyPress),

    /// Response to a cursor position query (`ESC [ row ; col R`).
    CursorPositionReport(CursorPosition),
}

impl InputEvent {
    /// The key press payload, if this is a key press.
    #[must_use]
    pub fn as_key_press(&self) -> Option<&KeyPress> {
        match self {
            Self::KeyPress(press) => Some(press),
            Self::CursorPositionReport(_) => None,
        }
    }
}

/// Payload of a `key press` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// The literal character, set for single-character tokens and for space.
    pub ch: Option<char>,

    /// The structured key, set when the token resolved to a name.
    pub key: Option<KeyEvent>,
}

impl KeyPress {
    /// Name of the pressed key, if any.
    #[must_use]
    pub fn name(&self) -> Option<KeyName> {
        self.key.as_ref().map(|k| k.name)
    }
}

/// A cursor position report from the remote terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorPosition {
    /// 1-indexed row, as reported.
    pub row: u32,
    /// 1-indexed column, as reported.
    pub col: u32,
}

/// A structured key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The token this key was decoded from.
    pub sequence: String,

    /// Canonical key identity.
    pub name: KeyName,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// Normalized escape code used for table lookup (function-key tokens only).
    pub code: Option<String>,
}

impl KeyEvent {
    /// Create a key event with no modifiers and no lookup code.
    #[must_use]
    pub fn new(sequence: impl Into<String>, name: KeyName) -> Self {
        Self {
            sequence: sequence.into(),
            name,
            modifiers: Modifiers::NONE,
            code: None,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Attach the lookup code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Meta (Alt, or an ESC prefix) is held.
    #[must_use]
    pub const fn meta(&self) -> bool {
        self.modifiers.contains(Modifiers::META)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Convert into a crossterm key event.
    ///
    /// Returns `None` for keys crossterm has no code for (`clear`, `line feed`).
    #[must_use]
    #[cfg(not(target_arch = "wasm32"))]
    pub fn to_crossterm(&self) -> Option<cte::KeyEvent> {
        let code = map_key_name(self.name)?;
        Some(cte::KeyEvent::new(code, map_modifiers(self.modifiers)))
    }
}

/// Canonical key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
    /// A letter (always lowercase) or digit.
    Char(char),
    /// Carriage return.
    Return,
    /// Line feed.
    LineFeed,
    /// Tab key.
    Tab,
    /// Backspace (BS or DEL).
    Backspace,
    /// Escape key.
    Escape,
    /// Space bar.
    Space,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Keypad 5 / "begin" key.
    Clear,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Insert key.
    Insert,
    /// Delete key.
    Delete,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Function key (F1-F12).
    F(u8),
}

impl KeyName {
    const NAMED: [(Self, &'static str); 17] = [
        (Self::Return, "return"),
        (Self::LineFeed, "line feed"),
        (Self::Tab, "tab"),
        (Self::Backspace, "backspace"),
        (Self::Escape, "escape"),
        (Self::Space, "space"),
        (Self::Up, "up arrow"),
        (Self::Down, "down arrow"),
        (Self::Left, "left arrow"),
        (Self::Right, "right arrow"),
        (Self::Clear, "clear"),
        (Self::Home, "home"),
        (Self::End, "end"),
        (Self::Insert, "insert"),
        (Self::Delete, "delete"),
        (Self::PageUp, "page up"),
        (Self::PageDown, "page down"),
    ];
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::F(n) => write!(f, "f{n}"),
            named => {
                let (_, text) = Self::NAMED
                    .iter()
                    .find(|(name, _)| name == named)
                    .ok_or(fmt::Error)?;
                f.write_str(text)
            }
        }
    }
}

/// Error returned when a string is not a canonical key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyNameError {
    input: String,
}

impl fmt::Display for ParseKeyNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key name: {:?}", self.input)
    }
}

impl std::error::Error for ParseKeyNameError {}

impl FromStr for KeyName {
    type Err = ParseKeyNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((name, _)) = Self::NAMED.iter().find(|(_, text)| *text == s) {
            return Ok(*name);
        }

        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                return Ok(Self::Char(c));
            }
        }

        if let Some(n) = s.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            if (1..=12).contains(&n) {
                return Ok(Self::F(n));
            }
        }

        Err(ParseKeyNameError {
            input: s.to_owned(),
        })
    }
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Meta/Alt key.
        const META  = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn map_key_name(name: KeyName) -> Option<cte::KeyCode> {
    match name {
        KeyName::Char(c) => Some(cte::KeyCode::Char(c)),
        KeyName::Return => Some(cte::KeyCode::Enter),
        KeyName::Tab => Some(cte::KeyCode::Tab),
        KeyName::Backspace => Some(cte::KeyCode::Backspace),
        KeyName::Escape => Some(cte::KeyCode::Esc),
        KeyName::Space => Some(cte::KeyCode::Char(' ')),
        KeyName::Up => Some(cte::KeyCode::Up),
        KeyName::Down => Some(cte::KeyCode::Down),
        KeyName::Left => Some(cte::KeyCode::Left),
        KeyName::Right => Some(cte::KeyCode::Right),
        KeyName::Home => Some(cte::KeyCode::Home),
        KeyName::End => Some(cte::KeyCode::End),
        KeyName::Insert => Some(cte::KeyCode::Insert),
        KeyName::Delete => Some(cte::KeyCode::Delete),
        KeyName::PageUp => Some(cte::KeyCode::PageUp),
        KeyName::PageDown => Some(cte::KeyCode::PageDown),
        KeyName::F(n) => Some(cte::KeyCode::F(n)),
        KeyName::Clear | KeyName::LineFeed => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn map_modifiers(modifiers: Modifiers) -> cte::KeyModifiers {
    let mut mapped = cte::KeyModifiers::NONE;
    if modifiers.contains(Modifiers::SHIFT) {
        mapped |= cte::KeyModifiers::SHIFT;
    }
    if modifiers.contains(Modifiers::META) {
        mapped |= cte::KeyModifiers::ALT;
    }
    if modifiers.contains(Modifiers::CTRL) {
        mapped |= cte::KeyModifiers::CONTROL;
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_name_display_is_canonical() {
        assert_eq!(KeyName::Up.to_string(), "up arrow");
        assert_eq!(KeyName::PageDown.to_string(), "page down");
        assert_eq!(KeyName::LineFeed.to_string(), "line feed");
        assert_eq!(KeyName::F(11).to_string(), "f11");
        assert_eq!(KeyName::Char('q').to_string(), "q");
    }

    #[test]
    fn key_name_parses_canonical_strings() {
        assert_eq!("return".parse::<KeyName>(), Ok(KeyName::Return));
        assert_eq!("left arrow".parse::<KeyName>(), Ok(KeyName::Left));
        assert_eq!("f1".parse::<KeyName>(), Ok(KeyName::F(1)));
        assert_eq!("7".parse::<KeyName>(), Ok(KeyName::Char('7')));
        assert!("f13".parse::<KeyName>().is_err());
        assert!("Up Arrow".parse::<KeyName>().is_err());
        assert!("".parse::<KeyName>().is_err());
    }

    #[test]
    fn modifier_accessors() {
        let key = KeyEvent::new("\x1b[2;5~", KeyName::Insert)
            .with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        assert!(key.ctrl());
        assert!(key.shift());
        assert!(!key.meta());
    }

    #[test]
    fn builder_matches_decoded_key() {
        let built = KeyEvent::new("\x1b[5^", KeyName::PageUp)
            .with_modifiers(Modifiers::CTRL)
            .with_code("[5^");
        assert_eq!(built.code.as_deref(), Some("[5^"));
        assert_eq!(
            crate::decoder::decode_chunk(b"\x1b[5^"),
            vec![InputEvent::KeyPress(KeyPress { ch: None, key: Some(built) })]
        );
    }

    #[test]
    fn key_press_name() {
        let press = KeyPress {
            ch: Some('a'),
            key: Some(KeyEvent::new("a", KeyName::Char('a'))),
        };
        assert_eq!(press.name(), Some(KeyName::Char('a')));
        assert_eq!(KeyPress { ch: Some('1'), key: None }.name(), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn crossterm_mapping() {
        let key = KeyEvent::new("\x1b[1;3A", KeyName::Up).with_modifiers(Modifiers::META);
        let mapped = key.to_crossterm().expect("up arrow maps");
        assert_eq!(mapped.code, cte::KeyCode::Up);
        assert!(mapped.modifiers.contains(cte::KeyModifiers::ALT));

        assert!(KeyEvent::new("\x1bOE", KeyName::Clear).to_crossterm().is_none());
    }
}
