//! # gs_ratelimit
//!
//! Sliding-window quota limiter for spreadsheet API writes.
//!
//! A [`Timeline`] keeps one cumulative counter per elapsed second and answers
//! "how long until one more operation fits in the trailing window". The
//! [`SlidingWindow`] wraps it with a clock, an admission gate and
//! [`WritePermit`]s that record every executed operation.

pub mod error;
pub mod limiter;
pub mod presets;
pub mod sliding_window;
pub mod timeline;
mod time;

pub use error::RateLimitError;
pub use error::Result;
pub use limiter::RateLimiter;
pub use sliding_window::SlidingWindow;
pub use sliding_window::SlidingWindowBuilder;
pub use sliding_window::WritePermit;
pub use timeline::Timeline;
