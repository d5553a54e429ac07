//! # gs_http
//!
//! Google Sheets v4 transport: a pooled HTTP client, per-spreadsheet request
//! batching and a client that routes every call through read and write quota
//! limiters.

pub mod batch;
pub mod client;
pub mod errors;
pub mod model;
pub mod sheets;

pub use batch::RequestsContainer;
pub use client::HttpClient;
pub use client::HttpClientConfig;
pub use errors::Result;
pub use errors::SheetsError;
pub use model::BatchUpdateResponse;
pub use model::Sheet;
pub use model::Spreadsheet;
pub use sheets::SheetsClient;
pub use sheets::SheetsClientBuilder;
