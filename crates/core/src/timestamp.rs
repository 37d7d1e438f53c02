//! Microsecond-precision timestamps and the clock that produces them
//!
//! ## Representation
//!
//! Timestamps are stored as microseconds since Unix epoch (1970-01-01 00:00:00 UTC)
//! and rendered on the wire as ISO-8601 / RFC 3339 UTC strings with exactly six
//! fractional digits, e.g. `2024-03-01T12:00:00.000042Z`. Because the width is
//! fixed, string order and numeric order agree.
//!
//! ## Clocks
//!
//! Stores never read the system time directly. They ask a [`Clock`], which lets
//! tests pin time. [`SystemClock`] is strictly monotonic: two consecutive
//! readings always differ, so `updatedAt` advances on every mutation even when
//! the OS clock does not.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Microsecond-precision timestamp
///
/// Defaults to [`Timestamp::EPOCH`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Read the system time
    ///
    /// Returns epoch if the system clock is before Unix epoch.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(duration.as_micros() as u64)
    }

    /// Create a timestamp from microseconds since epoch
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// Create a timestamp from milliseconds since epoch
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Timestamp(millis.saturating_mul(1_000))
    }

    /// Microseconds since Unix epoch
    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Milliseconds since Unix epoch (truncates)
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000
    }

    /// The timestamp one microsecond later
    #[inline]
    pub const fn next(&self) -> Self {
        Timestamp(self.0.saturating_add(1))
    }

    fn to_datetime(self) -> DateTime<Utc> {
        let micros = i64::try_from(self.0).unwrap_or(i64::MAX);
        Utc.timestamp_micros(micros)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Render as an RFC 3339 string with microsecond precision
    pub fn to_rfc3339(&self) -> String {
        self.to_datetime()
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

/// Error returned when a string is not a valid RFC 3339 timestamp
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp '{input}': {reason}")]
pub struct TimestampParseError {
    input: String,
    reason: String,
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampParseError {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let micros = parsed.timestamp_micros();
        if micros < 0 {
            return Err(TimestampParseError {
                input: s.to_string(),
                reason: "timestamp is before Unix epoch".to_string(),
            });
        }
        Ok(Timestamp(micros as u64))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.timestamp_micros().max(0) as u64)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Clock
// =============================================================================

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current timestamp
    fn now(&self) -> Timestamp;
}

/// System clock that never returns the same reading twice
///
/// A reading that would not advance past the previous one is bumped by one
/// microsecond.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: Mutex<Timestamp>,
}

impl SystemClock {
    /// Create a new system clock
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let mut last = self.last.lock();
        let mut ts = Timestamp::now();
        if ts <= *last {
            ts = last.next();
        }
        *last = ts;
        ts
    }
}

/// Clock pinned to a fixed instant, advanced manually
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    /// Create a clock that reads `start` until advanced
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Move the clock forward by `micros` microseconds
    pub fn advance(&self, micros: u64) {
        let mut current = self.current.lock();
        *current = Timestamp::from_micros(current.as_micros().saturating_add(micros));
    }

    /// Pin the clock to `ts`
    pub fn set(&self, ts: Timestamp) {
        *self.current.lock() = ts;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock()
    }
}
