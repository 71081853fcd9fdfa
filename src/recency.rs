//! # Recency window
//! Pure time-window check used by the aggregator: keep what a human would
//! still call "news". Inclusive at the boundary, so an article exactly
//! `hours` old is kept. Undated items are dropped unless the window was
//! explicitly told to keep them.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy)]
pub struct RecencyWindow {
    hours: i64,
    include_undated: bool,
}

impl RecencyWindow {
    pub const DEFAULT_HOURS: i64 = 72;

    pub fn new(hours: i64) -> Self {
        Self {
            hours,
            include_undated: false,
        }
    }

    pub fn include_undated(mut self, yes: bool) -> Self {
        self.include_undated = yes;
        self
    }

    pub fn hours(&self) -> i64 {
        self.hours
    }

    /// `true` when the item should stay in the pool. Future-dated items are
    /// kept: publisher clock skew is common and not the item's fault.
    pub fn contains(&self, published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match published {
            None => self.include_undated,
            Some(ts) => now.signed_duration_since(ts) <= Duration::hours(self.hours),
        }
    }
}

impl Default for RecencyWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HOURS)
    }
}
