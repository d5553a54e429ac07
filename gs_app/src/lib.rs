//! # gs_app
//!
//! Shared utilities for the batch flushing binary

pub mod batch_file;
pub mod cli;
pub mod config_loader;
pub mod shutdown_handler;
pub mod tracing_setup;
