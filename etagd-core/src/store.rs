//! Resource store for the single integer value.
//!
//! The stored value falls back to a time-derived default (the minute of the
//! hour) once the freshness window has elapsed. The refresh happens on read;
//! writes never move the freshness timestamp.

use chrono::{Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

use crate::Timestamp;

/// Default freshness window (120 seconds).
pub const DEFAULT_REFRESH_WINDOW: Duration = Duration::from_secs(120);

/// Current value of the resource and when its default was last derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceValue {
    pub value: i64,
    pub created_at: Timestamp,
}

impl ResourceValue {
    /// Time-derived default for the given instant.
    pub fn derived_at(now: Timestamp) -> Self {
        Self {
            value: minute_of(now),
            created_at: now,
        }
    }
}

/// Minute-of-hour component of a timestamp (0..=59).
pub fn minute_of(ts: Timestamp) -> i64 {
    i64::from(ts.minute())
}

/// Owner of the resource value.
///
/// Operations never fail. A poisoned lock is recovered since the guarded
/// data is a plain `Copy` value that cannot be left half-written.
#[derive(Debug)]
pub struct ResourceStore {
    current: Mutex<ResourceValue>,
    refresh_window: Duration,
}

impl ResourceStore {
    /// Create a store seeded with the default derived from the current time.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Create a store seeded with the default derived from `now`.
    pub fn starting_at(now: Timestamp) -> Self {
        Self {
            current: Mutex::new(ResourceValue::derived_at(now)),
            refresh_window: DEFAULT_REFRESH_WINDOW,
        }
    }

    /// Override the freshness window.
    pub fn with_refresh_window(mut self, window: Duration) -> Self {
        self.refresh_window = window;
        self
    }

    pub fn refresh_window(&self) -> Duration {
        self.refresh_window
    }

    /// Read the current value, refreshing the default if it is stale.
    pub fn read(&self) -> ResourceValue {
        self.read_at(Utc::now())
    }

    /// Read as of `now`.
    ///
    /// Staleness is measured in whole elapsed seconds and must strictly exceed
    /// the window before the default is re-derived.
    pub fn read_at(&self, now: Timestamp) -> ResourceValue {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let elapsed = (now - current.created_at).num_seconds();
        let window = i64::try_from(self.refresh_window.as_secs()).unwrap_or(i64::MAX);
        if elapsed > window {
            *current = ResourceValue::derived_at(now);
        }
        *current
    }

    /// Replace the stored value. The freshness timestamp is left untouched.
    pub fn write(&self, value: i64) -> ResourceValue {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.value = value;
        *current
    }

    /// Current value without staleness handling.
    pub fn snapshot(&self) -> ResourceValue {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}
