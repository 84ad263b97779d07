//! Remote resource cache and screen-bound schedules
//!
//! Local view state is a best-effort mirror of the last successful
//! fetch. Everything here is driven by caller-supplied `Instant`s so
//! timing behavior is testable without a live clock.

use std::time::{Duration, Instant};

use crate::api::ApiError;

/// A server-owned value mirrored locally: the last successful data, an
/// in-flight flag, the last error message, and when data last arrived.
///
/// A failed refresh records an error but never clears previously
/// displayed data.
#[derive(Debug, Clone)]
pub struct Remote<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    last_fetched_at: Option<Instant>,
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Remote<T> {
    pub fn new() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            last_fetched_at: None,
        }
    }

    /// Mark a refresh as started
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Apply the outcome of a refresh. `fallback` is the generic message
    /// for this action when the backend did not send one of its own.
    pub fn resolve(&mut self, now: Instant, result: Result<T, ApiError>, fallback: &str) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.last_fetched_at = Some(now);
            }
            Err(err) => {
                self.error = Some(err.message_or(fallback));
            }
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_fetched_at(&self) -> Option<Instant> {
        self.last_fetched_at
    }
}

/// A cancellable repeating schedule bound to a screen's lifetime.
///
/// The first tick is due immediately after `start`; each tick that
/// fires reschedules one interval later. Not a timer thread: the owner
/// asks `due(now)` from its own loop, and dropping or cancelling the
/// task stops all ticks.
#[derive(Debug, Clone)]
pub struct PollTask {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTask {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Begin the schedule; the first tick fires at `now`
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    /// Stop the schedule; no further ticks fire
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// True when a tick is due; rescheduling happens on fire
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(at) if now >= at => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

/// A flag that stays set until a deadline, for transient confirmations
/// like "Copied!".
#[derive(Debug, Clone, Default)]
pub struct Transient {
    until: Option<Instant>,
}

impl Transient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag for the given duration
    pub fn set(&mut self, now: Instant, duration: Duration) {
        self.until = Some(now + duration);
    }

    /// True until the deadline passes
    pub fn is_active(&self, now: Instant) -> bool {
        matches!(self.until, Some(until) if now < until)
    }
}
