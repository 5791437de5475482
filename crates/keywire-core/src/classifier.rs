#![forbid(unsafe_code)]

//! Key classification.
//!
//! Each token is run through [`RULES`] in order; the first rule that applies
//! decides the outcome. A token no rule claims still yields a character if it
//! is a single character, and nothing otherwise.
//!
//! # Rule order
//!
//! | # | Rule | Tokens |
//! |---|------|--------|
//! | 1 | [`Rule::CursorReport`] | `ESC [ row ; col R` |
//! | 2 | [`Rule::Return`] | `\r` |
//! | 3 | [`Rule::LineFeed`] | `\n` |
//! | 4 | [`Rule::Tab`] | `\t` |
//! | 5 | [`Rule::Backspace`] | BS, DEL, ESC+BS, ESC+DEL |
//! | 6 | [`Rule::Escape`] | ESC, ESC ESC |
//! | 7 | [`Rule::Space`] | space, ESC space |
//! | 8 | [`Rule::CtrlLetter`] | 0x01..=0x1A |
//! | 9 | [`Rule::Lowercase`] | `a`..=`z` |
//! | 10 | [`Rule::Uppercase`] | `A`..=`Z` |
//! | 11 | [`Rule::MetaKeycode`] | ESC + alphanumeric |
//! | 12 | [`Rule::FunctionKey`] | SS3 / CSI key sequences |

use crate::code_table;
use crate::event::{CursorPosition, InputEvent, KeyEvent, KeyName, KeyPress, Modifiers};
use crate::normalize::ESC;
use crate::patterns::{CURSOR_REPORT, FUNCTION_KEY, META_KEYCODE};

/// xterm modifier field bit for Shift (field value = 1 + bits).
const SHIFT_BITS: u32 = 1;
/// Alt and Meta bits; both surface as meta.
const META_BITS: u32 = 2 | 8;
/// Ctrl bit.
const CTRL_BITS: u32 = 4;

/// A classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Cursor position report (`ESC [ row ; col R`).
    CursorReport,
    /// Carriage return.
    Return,
    /// Line feed.
    LineFeed,
    /// Horizontal tab.
    Tab,
    /// BS or DEL, optionally ESC-prefixed (meta).
    Backspace,
    /// ESC, or ESC ESC (meta).
    Escape,
    /// Space, or ESC space (meta).
    Space,
    /// A single control byte 0x01..=0x1A.
    CtrlLetter,
    /// A single lowercase ASCII letter.
    Lowercase,
    /// A single uppercase ASCII letter.
    Uppercase,
    /// ESC + one alphanumeric character.
    MetaKeycode,
    /// SS3/CSI function, cursor, and editing keys.
    FunctionKey,
}

/// All rules in priority order.
pub const RULES: [Rule; 12] = [
    Rule::CursorReport,
    Rule::Return,
    Rule::LineFeed,
    Rule::Tab,
    Rule::Backspace,
    Rule::Escape,
    Rule::Space,
    Rule::CtrlLetter,
    Rule::Lowercase,
    Rule::Uppercase,
    Rule::MetaKeycode,
    Rule::FunctionKey,
];

/// What a matching rule decided.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Verdict {
    Cursor(CursorPosition),
    Key(KeyDraft),
    /// Claimed by a rule but malformed; emit nothing.
    Discard,
}

/// Key identity under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct KeyDraft {
    name: Option<KeyName>,
    modifiers: Modifiers,
    code: Option<String>,
}

impl KeyDraft {
    fn named(name: KeyName) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    fn with(mut self, modifier: Modifiers, on: bool) -> Self {
        self.modifiers.set(modifier, on);
        self
    }
}

impl Rule {
    /// Whether this rule claims `token`.
    #[must_use]
    pub fn applies(self, token: &str) -> bool {
        self.evaluate(token).is_some()
    }

    fn evaluate(self, token: &str) -> Option<Verdict> {
        let key = |draft: KeyDraft| Some(Verdict::Key(draft));
        match self {
            Self::CursorReport => cursor_report(token),
            Self::Return => (token == "\r").then(|| Verdict::Key(KeyDraft::named(KeyName::Return))),
            Self::LineFeed => {
                (token == "\n").then(|| Verdict::Key(KeyDraft::named(KeyName::LineFeed)))
            }
            Self::Tab => (token == "\t").then(|| Verdict::Key(KeyDraft::named(KeyName::Tab))),
            Self::Backspace => match token {
                "\x08" | "\x7f" | "\x1b\x7f" | "\x1b\x08" => key(
                    KeyDraft::named(KeyName::Backspace)
                        .with(Modifiers::META, token.starts_with(ESC)),
                ),
                _ => None,
            },
            Self::Escape => match token {
                "\x1b" | "\x1b\x1b" => {
                    key(KeyDraft::named(KeyName::Escape).with(Modifiers::META, token.len() == 2))
                }
                _ => None,
            },
            Self::Space => match token {
                " " | "\x1b " => {
                    key(KeyDraft::named(KeyName::Space).with(Modifiers::META, token.len() == 2))
                }
                _ => None,
            },
            Self::CtrlLetter => match single_char(token) {
                Some(c @ '\x01'..='\x1a') => {
                    let letter = char::from(b'a' + (c as u8 - 1));
                    key(KeyDraft::named(KeyName::Char(letter)).with(Modifiers::CTRL, true))
                }
                _ => None,
            },
            Self::Lowercase => match single_char(token) {
                Some(c) if c.is_ascii_lowercase() => key(KeyDraft::named(KeyName::Char(c))),
                _ => None,
            },
            Self::Uppercase => match single_char(token) {
                Some(c) if c.is_ascii_uppercase() => key(
                    KeyDraft::named(KeyName::Char(c.to_ascii_lowercase()))
                        .with(Modifiers::SHIFT, true),
                ),
                _ => None,
            },
            Self::MetaKeycode => {
                let c = META_KEYCODE.captures(token)?[1].chars().next()?;
                key(KeyDraft::named(KeyName::Char(c.to_ascii_lowercase()))
                    .with(Modifiers::META, true)
                    .with(Modifiers::SHIFT, c.is_ascii_uppercase()))
            }
            Self::FunctionKey => function_key(token).map(Verdict::Key),
        }
    }
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn cursor_report(token: &str) -> Option<Verdict> {
    let caps = CURSOR_REPORT.captures(token)?;
    let fields: Option<Vec<u32>> = caps[1].split(';').map(|f| f.parse().ok()).collect();
    match fields.as_deref() {
        Some(&[row, col]) => Some(Verdict::Cursor(CursorPosition { row, col })),
        _ => {
            crate::debug!(token = ?token, "ignoring malformed cursor position report");
            Some(Verdict::Discard)
        }
    }
}

fn function_key(token: &str) -> Option<KeyDraft> {
    let caps = FUNCTION_KEY.captures(token)?;
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    // prefix + key number + terminator + final letter
    let code: String = [1, 2, 4, 9].into_iter().map(group).collect();

    let field = caps.get(3).or_else(|| caps.get(8));
    let bits = modifier_bits(field.map(|m| m.as_str()));

    let mut draft = KeyDraft::default()
        .with(Modifiers::CTRL, bits & CTRL_BITS != 0)
        .with(Modifiers::META, bits & META_BITS != 0)
        .with(Modifiers::SHIFT, bits & SHIFT_BITS != 0);

    if let Some(entry) = code_table::lookup(&code) {
        draft.name = Some(entry.name);
        for (flag, value) in [
            (Modifiers::CTRL, entry.ctrl),
            (Modifiers::META, entry.meta),
            (Modifiers::SHIFT, entry.shift),
        ] {
            if let Some(on) = value {
                draft.modifiers.set(flag, on);
            }
        }
    }

    draft.code = Some(code);
    Some(draft)
}

/// Modifier bits from an xterm modifier field (`1 + bits`, absent means 1).
///
/// Arithmetic wraps: a field of `0` sets every bit.
fn modifier_bits(field: Option<&str>) -> u32 {
    let value = field
        .and_then(|f| f.parse::<u64>().ok())
        .map_or(1, |v| v as u32);
    value.wrapping_sub(1)
}

/// The rule that decides `token`, if any.
#[must_use]
pub fn matching_rule(token: &str) -> Option<Rule> {
    RULES.into_iter().find(|rule| rule.applies(token))
}

/// Classify one token.
///
/// Returns `None` when the token produces no event.
#[must_use]
pub fn classify(token: &str) -> Option<InputEvent> {
    let verdict = RULES
        .into_iter()
        .find_map(|rule| rule.evaluate(token))
        .unwrap_or(Verdict::Key(KeyDraft::default()));

    let draft = match verdict {
        Verdict::Cursor(pos) => return Some(InputEvent::CursorPositionReport(pos)),
        Verdict::Discard => return None,
        Verdict::Key(draft) => draft,
    };

    let ch = single_char(token).or((draft.name == Some(KeyName::Space)).then_some(' '));
    let key = draft.name.map(|name| KeyEvent {
        sequence: token.to_owned(),
        name,
        modifiers: draft.modifiers,
        code: draft.code,
    });

    if ch.is_none() && key.is_none() {
        crate::trace!(token = ?token, "dropping unrecognized token");
        return None;
    }

    Some(InputEvent::KeyPress(KeyPress { ch, key }))
}
