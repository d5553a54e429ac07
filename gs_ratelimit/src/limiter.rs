use std::future::Future;
use std::pin::Pin;

use crate::error::RateLimitError;
use crate::error::Result;
use crate::sliding_window::SlidingWindow;

/// Object-safe view of a limiter for callers that do not bracket operations
///
/// `acquire` and `try_acquire` record the operation at admission time. Use
/// [`SlidingWindow::admit`] directly when the operation should be recorded on
/// completion instead.
pub trait RateLimiter: Send + Sync {
    /// Admit and record one operation now, or fail without waiting
    fn try_acquire(&self) -> Result<()>;

    /// Wait until one operation fits, then admit and record it
    fn acquire(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;

    /// Operations that would be admitted right now without waiting
    fn available(&self) -> u32;

    /// Get the maximum operations per window
    fn capacity(&self) -> u32;

    /// Reset the rate limiter to initial state
    fn reset(&self);
}

impl RateLimiter for SlidingWindow {
    fn try_acquire(&self) -> Result<()> {
        // Someone is already waiting for room
        let Ok(_gate) = self.gate.try_lock() else {
            return Err(RateLimitError::Exceeded);
        };

        self.try_reserve().map_err(|_| RateLimitError::Exceeded)?;
        self.finish();
        Ok(())
    }

    fn acquire(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.admit().await.complete();
        })
    }

    fn available(&self) -> u32 {
        self.available_now()
    }

    fn capacity(&self) -> u32 {
        self.quota()
    }

    fn reset(&self) {
        self.restart()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_try_acquire() {
        let limiter = SlidingWindow::new(3, Duration::from_secs(10)).unwrap();

        assert!(limiter.try_acquire().is_ok());
        assert_eq!(limiter.available(), 2);

        assert!(limiter.try_acquire().is_ok());
        assert!(limiter.try_acquire().is_ok());
        assert_eq!(limiter.available(), 0);

        assert!(matches!(limiter.try_acquire(), Err(RateLimitError::Exceeded)));
        assert_eq!(limiter.executed(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_available_recovers_after_window() {
        let limiter = SlidingWindow::new(2, Duration::from_secs(5)).unwrap();
        assert!(limiter.try_acquire().is_ok());
        assert!(limiter.try_acquire().is_ok());
        assert_eq!(limiter.available(), 0);

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(limiter.available(), 2);
        assert!(limiter.try_acquire().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_counts_as_used() {
        let limiter = SlidingWindow::new(2, Duration::from_secs(5)).unwrap();

        let permit = limiter.admit().await;
        assert_eq!(limiter.available(), 1);
        assert!(limiter.try_acquire().is_ok());
        assert!(matches!(limiter.try_acquire(), Err(RateLimitError::Exceeded)));

        permit.complete();
        assert_eq!(limiter.executed(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_through_trait_object() {
        let limiter: Arc<dyn RateLimiter> = Arc::new(SlidingWindow::new(1, Duration::from_secs(3)).unwrap());
        let start = tokio::time::Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_secs(3));
        assert_eq!(limiter.capacity(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset() {
        let limiter = SlidingWindow::new(2, Duration::from_secs(60)).unwrap();
        assert!(limiter.try_acquire().is_ok());
        assert!(limiter.try_acquire().is_ok());
        assert_eq!(limiter.available(), 0);

        limiter.reset();
        assert_eq!(limiter.available(), 2);
        assert_eq!(limiter.executed(), 0);
    }
}
