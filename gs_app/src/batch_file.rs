use std::collections::BTreeMap;
use std::path::Path;

use gs_http::SheetsClient;
use serde_json::Value;

/// Requests to deposit, keyed by spreadsheet id
///
/// File format: `{ "<spreadsheet_id>": [request, ...], ... }`
pub type BatchFile = BTreeMap<String, Vec<Value>>;

pub fn parse_batch(json: &str) -> serde_json::Result<BatchFile> {
    serde_json::from_str(json)
}

pub fn load_batch<P: AsRef<Path>>(path: P) -> Result<BatchFile, Box<dyn std::error::Error + Send + Sync>> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    Ok(parse_batch(&contents)?)
}

/// Deposit every request in `batch`; returns the number deposited
pub fn deposit_all(client: &SheetsClient, batch: BatchFile) -> usize {
    let mut count = 0;
    for (spreadsheet_id, requests) in batch {
        for request in requests {
            client.deposit(spreadsheet_id.as_str(), request);
            count += 1;
        }
    }
    count
}
