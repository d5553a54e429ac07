//! Google Sheets API v4 quota presets
//!
//! Reads and writes are tracked separately by the API:
//! - **Write requests**: `spreadsheets.create` and `spreadsheets.batchUpdate`
//! - **Read requests**: `spreadsheets.get` and value reads
//!
//! Reference: https://developers.google.com/sheets/api/limits

use std::time::Duration;

use crate::SlidingWindow;

/// Write requests allowed per window
pub const WRITE_REQUESTS: u32 = 100;

/// Read requests allowed per window
pub const READ_REQUESTS: u32 = 100;

/// Quota window in seconds, shared by reads and writes
pub const QUOTA_WINDOW_SECS: u64 = 100;

/// Write quota: 100 requests per 100 seconds
///
/// A batchUpdate counts as one write however many edits it carries, so
/// batching requests per spreadsheet is the main way to stay under it.
pub fn write_limits() -> SlidingWindow {
    SlidingWindow::with_fixed_quota(WRITE_REQUESTS, QUOTA_WINDOW_SECS)
}

/// Read quota: 100 requests per 100 seconds
pub fn read_limits() -> SlidingWindow {
    SlidingWindow::with_fixed_quota(READ_REQUESTS, QUOTA_WINDOW_SECS)
}

/// Per-minute quota for projects with raised limits
///
/// Returns `None` for a zero quota.
pub fn per_minute(quota: u32) -> Option<SlidingWindow> {
    SlidingWindow::new(quota, Duration::from_secs(60)).ok()
}
