//! Log severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoggingError;

/// Log severity levels, ordered from least to most verbose.
///
/// A threshold `T` admits a message of level `L` iff `L <= T`. [`LogLevel::Nothing`]
/// as a threshold disables logging, [`LogLevel::Trace`] admits everything.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum LogLevel {
    /// Logging disabled
    Nothing = 0,
    /// The process cannot continue
    Fatal = 1,
    /// Recoverable failures
    Error = 2,
    /// Warning conditions
    Warn = 3,
    /// General information
    #[default]
    Info = 4,
    /// Debugging information
    Debug = 5,
    /// Most verbose, detailed tracing
    Trace = 6,
}

impl LogLevel {
    /// All levels in ascending verbosity.
    pub const ALL: [Self; 7] = [
        Self::Nothing,
        Self::Fatal,
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Debug,
        Self::Trace,
    ];

    /// Returns true if a threshold of `self` lets a message of `level` through.
    #[must_use]
    pub fn admits(self, level: Self) -> bool {
        level != Self::Nothing && level <= self
    }

    /// Numeric code of the level (0 = Nothing .. 6 = Trace).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Looks up a level by numeric code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Nothing),
            1 => Some(Self::Fatal),
            2 => Some(Self::Error),
            3 => Some(Self::Warn),
            4 => Some(Self::Info),
            5 => Some(Self::Debug),
            6 => Some(Self::Trace),
            _ => None,
        }
    }

    /// Returns the symbolic name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nothing => "Nothing",
            Self::Fatal => "Fatal",
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info",
            Self::Debug => "Debug",
            Self::Trace => "Trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    /// Parses a level name (case-insensitive, with common aliases) or a numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code)
                .ok_or_else(|| LoggingError::Validation(format!("unknown log level code: {code}")));
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "nothing" | "none" | "off" => Ok(Self::Nothing),
            "fatal" => Ok(Self::Fatal),
            "error" | "err" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(LoggingError::Validation(format!("unknown log level: {s}"))),
        }
    }
}

/// Deserializes a level from configuration.
///
/// Accepts any name [`FromStr`] understands (case-insensitive) as well as the
/// numeric codes `0..=6`. Use with `#[serde(deserialize_with = ...)]`; the
/// wire format keeps the strict symbolic names.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct LevelVisitor;

    impl serde::de::Visitor<'_> for LevelVisitor {
        type Value = LogLevel;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a log level name or a code from 0 to 6")
        }

        fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<LogLevel, E> {
            value.parse().map_err(E::custom)
        }

        fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<LogLevel, E> {
            u8::try_from(value)
                .ok()
                .and_then(LogLevel::from_code)
                .ok_or_else(|| E::custom(format!("unknown log level code: {value}")))
        }

        fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<LogLevel, E> {
            u64::try_from(value)
                .map_err(|_| E::custom(format!("unknown log level code: {value}")))
                .and_then(|code| self.visit_u64(code))
        }
    }

    deserializer.deserialize_any(LevelVisitor)
}
