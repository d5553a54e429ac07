use std::time::Duration;

use tokio::time::Instant;

/// Time tracking for rate limiters
///
/// Uses tokio's Instant so a paused runtime (tests) drives the same clock the
/// limiter sleeps on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TimeSource {
    /// Origin for relative time measurements
    origin: Instant,
}

impl TimeSource {
    /// Create a new time source with current time as origin
    #[inline(always)]
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }

    /// Time elapsed since the origin, zero if the clock reads before it
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.origin)
    }
}

impl Default for TimeSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole seconds, rounded down
#[inline(always)]
pub(crate) const fn floor_secs(elapsed: Duration) -> u64 {
    elapsed.as_secs()
}

/// Whole seconds, rounded up
#[inline(always)]
pub(crate) const fn ceil_secs(elapsed: Duration) -> u64 {
    if elapsed.subsec_nanos() > 0 { elapsed.as_secs() + 1 } else { elapsed.as_secs() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_time_source_follows_paused_clock() {
        let ts = TimeSource::new();
        assert_eq!(ts.elapsed(), Duration::ZERO);

        tokio::time::advance(Duration::from_millis(1500)).await;
        assert_eq!(ts.elapsed(), Duration::from_millis(1500));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(floor_secs(Duration::from_millis(2999)), 2);
        assert_eq!(ceil_secs(Duration::from_millis(2001)), 3);

        // Exact seconds round to themselves both ways
        assert_eq!(floor_secs(Duration::from_secs(4)), 4);
        assert_eq!(ceil_secs(Duration::from_secs(4)), 4);
        assert_eq!(ceil_secs(Duration::ZERO), 0);
        assert_eq!(ceil_secs(Duration::from_nanos(1)), 1);
    }
}
