//! Pre-configured limiters matching published API quotas
//!
//! # Supported APIs
//!
//! - **Google Sheets v4**: separate read and write quotas

pub mod sheets;
