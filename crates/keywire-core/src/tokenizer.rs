#![forbid(unsafe_code)]

//! Escape tokenizer.
//!
//! Splits normalized text into tokens: each escape sequence matched by the
//! unified pattern is one token, and every other character is a token of its
//! own. Order is preserved and the tokens concatenate back to the input.
//!
//! # Example
//!
//! ```
//! use keywire_core::tokenizer::tokenize;
//!
//! let tokens: Vec<&str> = tokenize("a\x1b[Ab").collect();
//! assert_eq!(tokens, ["a", "\x1b[A", "b"]);
//! ```

use crate::patterns::ESCAPE_CODE;

/// Iterator over the tokens of one chunk of normalized text.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    /// Text not yet scanned.
    rest: &'a str,
    /// Start and end (relative to `rest`) of the next escape match, if found.
    next_match: Option<(usize, usize)>,
    /// Set once the pattern has been searched for in `rest`.
    searched: bool,
}

/// Tokenize one chunk of normalized text.
#[must_use]
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        rest: text,
        next_match: None,
        searched: false,
    }
}

impl<'a> Tokens<'a> {
    fn take(&mut self, len: usize) -> &'a str {
        let (token, rest) = self.rest.split_at(len);
        self.rest = rest;
        token
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        if !self.searched {
            self.next_match = ESCAPE_CODE.find(self.rest).map(|m| (m.start(), m.end()));
            self.searched = true;
        }

        match self.next_match {
            // Escape sequence at the front: emit it whole and search again.
            Some((0, end)) => {
                self.searched = false;
                self.next_match = None;
                Some(self.take(end))
            }
            // Literal text before the next match (or to the end): one char.
            Some((start, end)) => {
                let len = self.rest.chars().next().map_or(0, char::len_utf8);
                self.next_match = Some((start - len, end - len));
                Some(self.take(len))
            }
            None => {
                let len = self.rest.chars().next().map_or(0, char::len_utf8);
                Some(self.take(len))
            }
        }
    }
}
