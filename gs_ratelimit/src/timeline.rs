use std::collections::VecDeque;
use std::time::Duration;

use crate::error::RateLimitError;
use crate::error::Result;
use crate::time::ceil_secs;
use crate::time::floor_secs;

/// Default number of operations allowed per window
pub const DEFAULT_QUOTA: u32 = 100;

/// Default trailing window length in seconds
pub const DEFAULT_WINDOW_SECS: u64 = 100;

/// Cumulative per-second history of executed operations
///
/// `history[k]` holds the total number of operations recorded by elapsed
/// second `k`. Keys form a contiguous run starting at `base`; seconds without
/// activity carry the previous total forward. Entries older than the trailing
/// window are evicted on every record, so the table holds at most about
/// `window + 2` entries.
///
/// Rounding is biased toward admitting less: records land on the ceiling of
/// their elapsed time and lookups read the floor. The exact time of the latest
/// record is kept as well, so once the window start passes it every record is
/// known to be outside and no wait exceeds one window.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Maximum operations per trailing window
    quota: u32,

    /// Trailing window length in whole seconds
    window_secs: u64,

    /// Total operations recorded since the origin
    executed: u64,

    /// Key of `history[0]`
    base: u64,

    /// Exact elapsed time of the latest record
    last_record: Duration,

    history: VecDeque<u64>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new(quota: u32, window_secs: u64) -> Result<Self> {
        if quota == 0 {
            return Err(RateLimitError::InvalidConfig("quota must be greater than 0"));
        }
        if window_secs == 0 {
            return Err(RateLimitError::InvalidConfig("window must be at least one second"));
        }

        Ok(Self::new_unchecked(quota, window_secs))
    }

    pub(crate) fn new_unchecked(quota: u32, window_secs: u64) -> Self {
        Self { quota, window_secs, executed: 0, base: 0, last_record: Duration::ZERO, history: VecDeque::with_capacity(window_secs as usize + 2) }
    }

    pub fn quota(&self) -> u32 {
        self.quota
    }

    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    /// Total operations recorded so far
    pub fn executed(&self) -> u64 {
        self.executed
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Oldest key still retained
    pub fn first_key(&self) -> Option<u64> {
        (!self.history.is_empty()).then_some(self.base)
    }

    /// Most recently recorded key
    pub fn last_key(&self) -> Option<u64> {
        self.history.len().checked_sub(1).map(|idx| self.base + idx as u64)
    }

    /// Retained `(second, cumulative count)` pairs in ascending key order
    pub fn history(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.history.iter().enumerate().map(|(idx, &count)| (self.base + idx as u64, count))
    }

    /// Cumulative count as of `floor(elapsed)`
    ///
    /// Returns 0 before any record, and for seconds older than the retained
    /// run (only reachable if time moved backwards).
    pub fn cumulative_at(&self, elapsed: Duration) -> u64 {
        self.count_at_key(floor_secs(elapsed))
    }

    /// Operations counted inside the trailing window ending at `elapsed`
    pub fn in_window(&self, elapsed: Duration) -> u64 {
        self.executed.saturating_sub(self.window_start_count(elapsed))
    }

    /// Register one executed operation completed at `elapsed`
    ///
    /// A record for a second at or before the latest key folds into the
    /// latest key, so the table never moves backwards.
    pub fn record(&mut self, elapsed: Duration) {
        self.executed += 1;
        self.last_record = self.last_record.max(elapsed);
        let key = ceil_secs(elapsed);

        match self.last_key() {
            Some(last) if key <= last => {
                if let Some(latest) = self.history.back_mut() {
                    *latest = self.executed;
                }
            }
            _ => {
                let carried = self.history.back().copied().unwrap_or(0);

                // After a long idle gap everything retained is already outside
                // the window; restart the run just below the new horizon.
                let horizon = key.saturating_sub(self.window_secs + 1);
                if self.next_key() < horizon {
                    self.history.clear();
                    self.base = horizon;
                }

                while self.next_key() < key {
                    self.history.push_back(carried);
                }
                self.history.push_back(self.executed);
            }
        }

        self.prune(elapsed);
    }

    /// Delay until one more operation (beyond `pending` unrecorded ones) fits
    ///
    /// Returns `Duration::ZERO` when it fits now. Otherwise the delay lands on
    /// the first second boundary at which enough recorded operations have left
    /// the trailing window, or on the moment the latest record leaves it,
    /// whichever comes first; either way no longer than one window. Returns
    /// `None` when the recorded history alone can never make room, which only
    /// happens while `pending` operations hold the quota.
    pub fn admission_delay(&self, elapsed: Duration, pending: u64) -> Option<Duration> {
        let quota = u64::from(self.quota);
        let projected = self.executed + pending + 1;

        if projected.saturating_sub(self.window_start_count(elapsed)) <= quota {
            return Some(Duration::ZERO);
        }

        // First key that the window start can still move onto
        let first = match elapsed.checked_sub(self.window()) {
            Some(start) => floor_secs(start) + 1,
            None => 0,
        };
        let last = self.last_key()?;

        // Every record has left the window once its start reaches the latest one
        let all_out = (self.last_record + self.window()).saturating_sub(elapsed).min(self.window());

        (first..=last)
            .find(|&key| projected - self.count_at_key(key) <= quota)
            .map(|key| Duration::from_secs(self.window_secs + key).saturating_sub(elapsed).min(all_out))
    }

    /// Forget every record
    pub fn clear(&mut self) {
        self.executed = 0;
        self.base = 0;
        self.last_record = Duration::ZERO;
        self.history.clear();
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    fn next_key(&self) -> u64 {
        self.base + self.history.len() as u64
    }

    fn count_at_key(&self, key: u64) -> u64 {
        if key < self.base {
            return 0;
        }

        match self.history.get((key - self.base) as usize) {
            Some(&count) => count,
            None => self.history.back().copied().unwrap_or(0),
        }
    }

    /// Cumulative count at the start of the trailing window ending at `elapsed`
    fn window_start_count(&self, elapsed: Duration) -> u64 {
        match elapsed.checked_sub(self.window()) {
            Some(start) if start >= self.last_record => self.executed,
            Some(start) => self.cumulative_at(start),
            None => 0,
        }
    }

    /// Evict keys no later lookup can reach
    fn prune(&mut self, elapsed: Duration) {
        let Some(start) = elapsed.checked_sub(self.window()) else {
            return;
        };

        let horizon = floor_secs(start);
        while self.base < horizon && self.history.len() > 1 {
            self.history.pop_front();
            self.base += 1;
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_QUOTA, DEFAULT_WINDOW_SECS)
    }
}
