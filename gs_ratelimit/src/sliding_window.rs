use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::RateLimitError;
use crate::error::Result;
use crate::time::TimeSource;
use crate::timeline::DEFAULT_QUOTA;
use crate::timeline::DEFAULT_WINDOW_SECS;
use crate::timeline::Timeline;

/// Sliding-window limiter that delays callers instead of rejecting them
///
/// At most `quota` operations complete inside any trailing `window`. Callers
/// take a [`WritePermit`] with [`admit`](Self::admit) before running an
/// operation; the permit records the operation when it is completed or
/// dropped.
///
/// Admission is a single critical section: the gate is held across the
/// decision and the sleep, and operations that were admitted but not yet
/// recorded count against the quota, so concurrent callers never overshoot.
pub struct SlidingWindow {
    /// Serialises admission, held while sleeping
    pub(crate) gate: tokio::sync::Mutex<()>,

    state: Mutex<WindowState>,

    window: Duration,
}

struct WindowState {
    time_source: TimeSource,
    timeline: Timeline,

    /// Admitted operations not yet recorded
    in_flight: u64,
}

impl SlidingWindow {
    /// Create a limiter allowing `quota` operations per trailing `window`
    ///
    /// Sub-second windows are rounded up to whole seconds.
    pub fn new(quota: u32, window: Duration) -> Result<Self> {
        if window.is_zero() {
            return Err(RateLimitError::InvalidConfig("window must be greater than 0"));
        }

        let window_secs = window.as_secs() + u64::from(window.subsec_nanos() > 0);
        let timeline = Timeline::new(quota, window_secs)?;

        Ok(Self::from_timeline(timeline))
    }

    /// 100 operations per 100 seconds
    pub fn default_write_quota() -> Self {
        Self::with_fixed_quota(DEFAULT_QUOTA, DEFAULT_WINDOW_SECS)
    }

    /// Limiter for a known-valid compile-time quota
    pub(crate) fn with_fixed_quota(quota: u32, window_secs: u64) -> Self {
        debug_assert!(quota > 0 && window_secs > 0);
        Self::from_timeline(Timeline::new_unchecked(quota, window_secs))
    }

    /// Create a builder for configuring a sliding window limiter
    pub fn builder() -> SlidingWindowBuilder {
        SlidingWindowBuilder::new()
    }

    fn from_timeline(timeline: Timeline) -> Self {
        let window = Duration::from_secs(timeline.window_secs());
        let state = WindowState { time_source: TimeSource::new(), timeline, in_flight: 0 };

        Self { gate: tokio::sync::Mutex::new(()), state: Mutex::new(state), window }
    }

    pub fn quota(&self) -> u32 {
        self.state.lock().timeline.quota()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Time since the limiter started counting
    pub fn elapsed(&self) -> Duration {
        self.state.lock().time_source.elapsed()
    }

    /// Operations recorded since the origin
    pub fn executed(&self) -> u64 {
        self.state.lock().timeline.executed()
    }

    /// Admitted operations that have not been recorded yet
    pub fn in_flight(&self) -> u64 {
        self.state.lock().in_flight
    }

    /// Snapshot of the underlying timeline
    pub fn timeline(&self) -> Timeline {
        self.state.lock().timeline.clone()
    }

    /// Wait until one more operation fits in the window and reserve it
    ///
    /// Never fails; an exhausted quota only makes this call slower.
    pub async fn admit(&self) -> WritePermit<'_> {
        let _gate = self.gate.lock().await;

        while let Err(delay) = self.try_reserve() {
            tokio::time::sleep(delay).await;
        }

        WritePermit { limiter: self }
    }

    /// Like [`admit`](Self::admit), but gives up when `cancel` resolves first
    ///
    /// A cancelled admission reserves nothing and records nothing.
    pub async fn admit_until<C>(&self, cancel: C) -> Result<WritePermit<'_>>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            permit = self.admit() => Ok(permit),
            _ = cancel => {
                debug!("Admission cancelled");
                Err(RateLimitError::Cancelled)
            }
        }
    }

    /// Run `f` under a permit; the operation is recorded whatever it returns
    pub async fn execute<F, Fut, T>(&self, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let permit = self.admit().await;
        let output = f().await;
        permit.complete();
        output
    }

    /// Reserve a slot now, or report how long to wait
    pub(crate) fn try_reserve(&self) -> std::result::Result<(), Duration> {
        let mut state = self.state.lock();
        let elapsed = state.time_source.elapsed();

        match state.timeline.admission_delay(elapsed, state.in_flight) {
            Some(delay) if delay.is_zero() => {
                state.in_flight += 1;
                Ok(())
            }
            Some(delay) => {
                debug!(
                    elapsed_secs = elapsed.as_secs_f64(),
                    in_window = state.timeline.in_window(elapsed) + state.in_flight,
                    quota = state.timeline.quota(),
                    delay_secs = delay.as_secs_f64(),
                    "Quota reached, delaying admission"
                );
                Err(delay)
            }
            None => {
                // Only unrecorded operations hold the quota; check again after a full window
                debug!(in_flight = state.in_flight, "Quota held by in-flight operations, waiting one window");
                Err(self.window)
            }
        }
    }

    /// Record one reserved operation as executed now
    pub(crate) fn finish(&self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        let elapsed = state.time_source.elapsed();
        state.timeline.record(elapsed);
    }

    pub(crate) fn available_now(&self) -> u32 {
        let state = self.state.lock();
        let elapsed = state.time_source.elapsed();
        let used = state.timeline.in_window(elapsed) + state.in_flight;
        u64::from(state.timeline.quota()).saturating_sub(used) as u32
    }

    /// Restart counting from now, forgetting every record
    pub(crate) fn restart(&self) {
        let mut state = self.state.lock();
        state.time_source = TimeSource::new();
        state.timeline.clear();
        state.in_flight = 0;
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::default_write_quota()
    }
}

/// Reservation for one operation
///
/// Completing or dropping the permit records the operation, so failed or
/// cancelled operations still count against the quota.
#[must_use = "an unused permit is recorded immediately when dropped"]
pub struct WritePermit<'a> {
    limiter: &'a SlidingWindow,
}

impl WritePermit<'_> {
    /// Mark the operation as executed
    pub fn complete(self) {
        drop(self);
    }
}

impl Drop for WritePermit<'_> {
    fn drop(&mut self) {
        self.limiter.finish();
    }
}

/// Builder for configuring a sliding window limiter
pub struct SlidingWindowBuilder {
    quota: u32,
    window: Duration,
}

impl SlidingWindowBuilder {
    /// Create a new builder with the default 100 per 100 seconds
    pub fn new() -> Self {
        Self { quota: DEFAULT_QUOTA, window: Duration::from_secs(DEFAULT_WINDOW_SECS) }
    }

    /// Set the maximum operations per window
    pub fn quota(mut self, quota: u32) -> Self {
        self.quota = quota;
        self
    }

    /// Set the trailing window length
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set window to 1 minute
    pub fn per_minute(mut self, quota: u32) -> Self {
        self.quota = quota;
        self.window = Duration::from_secs(60);
        self
    }

    /// Build the limiter
    pub fn build(self) -> Result<SlidingWindow> {
        SlidingWindow::new(self.quota, self.window)
    }
}

impl Default for SlidingWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
