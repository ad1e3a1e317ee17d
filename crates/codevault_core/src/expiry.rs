//! Expiry calculation and the shared expiration predicate.
//!
//! A paste's expiry is fixed at creation from a caller-supplied relative
//! duration. Malformed, zero or negative durations mean "never expires"; they
//! are not rejected.

use crate::text::parse_leading_int;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::de::{self, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const NEVER: &str = "never";

/// Absolute expiry of a paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The paste stays readable indefinitely.
    Never,
    /// The paste becomes inaccessible once this instant has passed.
    At(DateTime<Utc>),
}

impl Expiry {
    /// Instant of expiry, if any.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Never => None,
            Self::At(at) => Some(*at),
        }
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str(NEVER),
            Self::At(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl Serialize for Expiry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Expiry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == NEVER {
            return Ok(Self::Never);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| Self::At(at.with_timezone(&Utc)))
            .map_err(|err| de::Error::custom(format!("invalid expiry '{}': {}", raw, err)))
    }
}

/// Relative time-to-live as supplied by a client.
///
/// Accepts whatever JSON shape a form might send; interpretation happens in
/// [`ExpiresIn::seconds`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpiresIn {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl ExpiresIn {
    /// Positive number of whole seconds, or `None` for "never".
    pub fn seconds(&self) -> Option<i64> {
        let seconds = match self {
            Self::Integer(value) => *value,
            Self::Float(value) if value.is_finite() => value.trunc() as i64,
            Self::Float(_) | Self::Other(_) => return None,
            Self::Text(raw) => parse_leading_int(raw)?,
        };
        (seconds > 0).then_some(seconds)
    }
}

impl From<i64> for ExpiresIn {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for ExpiresIn {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Convert an optional relative duration into an absolute expiry.
///
/// # Returns
/// `Expiry::At(now + seconds)` for a positive duration, otherwise
/// `Expiry::Never`. Durations past the representable calendar range are
/// treated as never expiring.
pub fn compute_expiry(raw: Option<&ExpiresIn>, now: DateTime<Utc>) -> Expiry {
    raw.and_then(ExpiresIn::seconds)
        .and_then(TimeDelta::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .map(Expiry::At)
        .unwrap_or(Expiry::Never)
}

/// The one expiration test applied by every read and listing path.
///
/// An expiry instant equal to `now` is still readable.
pub fn is_expired(expiry: &Expiry, now: DateTime<Utc>) -> bool {
    match expiry {
        Expiry::Never => false,
        Expiry::At(at) => *at < now,
    }
}
