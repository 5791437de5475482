#![forbid(unsafe_code)]

//! Decoder configuration.
//!
//! The defaults reproduce the classic per-chunk behavior: every chunk is
//! decoded on its own and nothing is carried between reads.
//!
//! # Environment
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `KEYWIRE_CARRY_PARTIAL_ESCAPES` | `1/0`, `true/false`, `yes/no`, `on/off` | off |
//! | `KEYWIRE_MAX_CARRY_LEN` | positive integer (characters) | 16 |

use std::fmt;

/// Environment key enabling partial-escape carry.
pub const ENV_CARRY_PARTIAL_ESCAPES: &str = "KEYWIRE_CARRY_PARTIAL_ESCAPES";

/// Environment key bounding the carried fragment.
pub const ENV_MAX_CARRY_LEN: &str = "KEYWIRE_MAX_CARRY_LEN";

const DEFAULT_MAX_CARRY_LEN: usize = 16;

/// Configuration for [`crate::decoder::InputDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Hold back a trailing, still-growable escape fragment and prepend it to
    /// the next chunk (default: false).
    pub carry_partial_escapes: bool,

    /// Longest fragment, in characters, that will be carried (default: 16).
    pub max_carry_len: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            carry_partial_escapes: false,
            max_carry_len: DEFAULT_MAX_CARRY_LEN,
        }
    }
}

impl DecoderConfig {
    /// Enable or disable partial-escape carry.
    #[must_use]
    pub fn with_carry_partial_escapes(mut self, enabled: bool) -> Self {
        self.carry_partial_escapes = enabled;
        self
    }

    /// Set the carry bound.
    #[must_use]
    pub fn with_max_carry_len(mut self, len: usize) -> Self {
        self.max_carry_len = len;
        self
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read overrides through a custom lookup (for tests).
    pub fn from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = get_env(ENV_CARRY_PARTIAL_ESCAPES) {
            config.carry_partial_escapes = parse_bool(&value)
                .ok_or_else(|| ConfigError::invalid(ENV_CARRY_PARTIAL_ESCAPES, &value))?;
        }

        if let Some(value) = get_env(ENV_MAX_CARRY_LEN) {
            config.max_carry_len = value
                .trim()
                .parse()
                .ok()
                .filter(|len| *len > 0)
                .ok_or_else(|| ConfigError::invalid(ENV_MAX_CARRY_LEN, &value))?;
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_owned(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}
