// Path: crates/types/src/time.rs

//! Binary timestamps.
//!
//! Time is kept in 1/4096-second ticks since the Unix epoch. This is the
//! resolution carried by version components, so a `Timestamp` round-trips
//! through a version marker without loss.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Number of ticks in one second.
pub const TICKS_PER_SECOND: u64 = 4096;

/// A point in time measured in 1/4096-second ticks since the Unix epoch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Creates a timestamp from a raw tick count.
    pub const fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: u64) -> Self {
        let ticks = (millis as u128 * TICKS_PER_SECOND as u128) / 1000;
        Self(u64::try_from(ticks).unwrap_or(u64::MAX))
    }

    /// The current wall-clock time. A clock set before the epoch reads as the epoch.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    /// The raw tick count.
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Milliseconds since the Unix epoch, rounded down.
    pub fn as_millis(self) -> u64 {
        ((self.0 as u128 * 1000) / TICKS_PER_SECOND as u128) as u64
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.0 / TICKS_PER_SECOND;
        let frac = self.0 % TICKS_PER_SECOND;
        write!(f, "{secs}+{frac}/4096")
    }
}
