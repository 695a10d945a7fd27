//! # Temporal Types: UTC-Only Timestamps and the Clock Seam
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds, and the
//! `Clock` trait the exit game reads "now" from.
//!
//! ## Security Invariant
//!
//! Maturity and challenge deadlines are compared in whole seconds. A
//! `Timestamp` never carries sub-seconds, so a deadline computed as
//! `created_at + period` compares exactly against a later `now()`.
//!
//! Tests drive time through [`ManualClock`]; production uses [`SystemClock`].

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Seconds since the Unix epoch, UTC.
///
/// Serializes as an RFC 3339 string; displays as `YYYY-MM-DDTHH:MM:SSZ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wall-clock time, sub-seconds dropped.
    pub fn now() -> Self {
        let now = Utc::now();
        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    /// # Errors
    ///
    /// `CoreError::InvalidTimestamp` when `secs` is outside chrono's range.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CoreError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidTimestamp(format!("{secs} is out of range")))
    }

    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Deadline arithmetic: `None` once the sum leaves the representable range.
    pub fn plus_secs(&self, secs: u64) -> Option<Self> {
        let delta = i64::try_from(secs).ok()?;
        Self::from_epoch_secs(self.epoch_secs().checked_add(delta)?).ok()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current time for deadline arithmetic.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test can hand one clone
/// to the exit game and keep another to advance time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    epoch_secs: Arc<AtomicI64>,
}

impl ManualClock {
    /// A clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            epoch_secs: Arc::new(AtomicI64::new(start.epoch_secs())),
        }
    }

    /// Move the clock to `at`.
    pub fn set(&self, at: Timestamp) {
        self.epoch_secs.store(at.epoch_secs(), Ordering::SeqCst);
    }

    /// Move the clock forward by `secs` seconds.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTimestamp` if the result is out of range;
    /// the clock is left unchanged.
    pub fn advance(&self, secs: u64) -> Result<Timestamp, CoreError> {
        let next = self.now().plus_secs(secs).ok_or_else(|| {
            CoreError::InvalidTimestamp(format!("advancing by {secs}s overflows"))
        })?;
        self.set(next);
        Ok(next)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp(DateTime::<Utc>::UNIX_EPOCH))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let secs = self.epoch_secs.load(Ordering::SeqCst);
        // Only in-range values are ever stored.
        Timestamp::from_epoch_secs(secs)
            .unwrap_or(Timestamp(DateTime::<Utc>::UNIX_EPOCH))
    }
}
