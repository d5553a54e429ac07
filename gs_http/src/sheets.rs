use std::sync::Arc;
use std::time::Duration;

use gs_ratelimit::RateLimiter;
use gs_ratelimit::SlidingWindow;
use gs_ratelimit::presets;
use parking_lot::Mutex;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::json;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::batch::RequestsContainer;
use crate::client::HttpClient;
use crate::client::HttpClientConfig;
use crate::errors::Result;
use crate::errors::SheetsError;
use crate::model::BatchUpdateResponse;
use crate::model::ErrorEnvelope;
use crate::model::Spreadsheet;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Google Sheets v4 client
///
/// Every write (`create`, `batchUpdate`) runs under a permit from the write
/// limiter and is recorded when the call returns, successful or not. Reads
/// go through a separate limiter. The limiters are shared through `Arc`, so
/// clients acting for the same credential can share one quota.
pub struct SheetsClient {
    client: HttpClient,
    base_url: String,
    access_token: String,
    write_limiter: Arc<SlidingWindow>,
    read_limiter: Arc<dyn RateLimiter>,
    requests: Mutex<RequestsContainer>,
}

#[derive(Serialize)]
struct BatchUpdateBody<'a> {
    requests: &'a [Value],
}

impl SheetsClient {
    /// Create a new client builder
    pub fn builder() -> SheetsClientBuilder {
        SheetsClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn write_limiter(&self) -> &Arc<SlidingWindow> {
        &self.write_limiter
    }

    pub fn read_limiter(&self) -> &Arc<dyn RateLimiter> {
        &self.read_limiter
    }

    /// Create a spreadsheet titled `title` (one write)
    pub async fn create_spreadsheet(&self, title: &str) -> Result<Spreadsheet> {
        let url = format!("{}/spreadsheets", self.base_url);
        let body = json!({ "properties": { "title": title } });

        let spreadsheet: Spreadsheet = self.write(self.client.post(&url).json(&body)).await?;
        info!(spreadsheet_id = %spreadsheet.spreadsheet_id, title, "Created spreadsheet");
        Ok(spreadsheet)
    }

    /// Fetch a spreadsheet (one read)
    pub async fn open_by_id(&self, spreadsheet_id: &str, include_grid_data: bool) -> Result<Spreadsheet> {
        let url = format!("{}/spreadsheets/{}", self.base_url, spreadsheet_id);
        let request = self.client.get(&url).query(&[("includeGridData", include_grid_data)]);

        self.read(request).await
    }

    /// Queue a batchUpdate request object; nothing is sent until executed
    pub fn deposit(&self, spreadsheet_id: impl Into<String>, request: Value) {
        self.requests.lock().deposit(spreadsheet_id, request);
    }

    /// Number of queued requests across all spreadsheets
    pub fn pending_requests(&self) -> usize {
        self.requests.lock().len()
    }

    /// Send every request queued for `spreadsheet_id` as one batchUpdate
    ///
    /// On failure the batch is put back in the queue.
    pub async fn execute_deposited(&self, spreadsheet_id: &str) -> Result<BatchUpdateResponse> {
        let requests =
            self.requests.lock().take(spreadsheet_id).ok_or_else(|| SheetsError::NoDepositedRequests(spreadsheet_id.to_string()))?;

        let url = format!("{}/spreadsheets/{}:batchUpdate", self.base_url, spreadsheet_id);
        let request = self.client.post(&url).json(&BatchUpdateBody { requests: &requests });

        match self.write::<BatchUpdateResponse>(request).await {
            Ok(response) => {
                info!(spreadsheet_id, requests = requests.len(), replies = response.replies.len(), "Executed batch update");
                Ok(response)
            }
            Err(err) => {
                warn!(spreadsheet_id, requests = requests.len(), error = %err, "Batch update failed, requests kept");
                self.requests.lock().restore(spreadsheet_id, requests);
                Err(err)
            }
        }
    }

    /// Flush every queued batch, one write per spreadsheet in id order
    ///
    /// Stops at the first failure; unsent batches stay queued.
    pub async fn execute_all_deposited(&self) -> Result<Vec<BatchUpdateResponse>> {
        let spreadsheet_ids = self.requests.lock().spreadsheet_ids();
        let mut responses = Vec::with_capacity(spreadsheet_ids.len());

        for spreadsheet_id in spreadsheet_ids {
            responses.push(self.execute_deposited(&spreadsheet_id).await?);
        }

        Ok(responses)
    }

    async fn write<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.write_limiter.execute(move || self.send(request)).await
    }

    async fn read<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.read_limiter.acquire().await;
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(api_error(status, &bytes));
        }

        debug!(status = %status, bytes = bytes.len(), "Sheets API response");
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Map a non-2xx response to the API's error envelope when it has one
fn api_error(status: StatusCode, body: &[u8]) -> SheetsError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => SheetsError::ApiError { code: envelope.error.code, message: envelope.error.message },
        Err(_) => SheetsError::InvalidResponse(format!("HTTP {}", status)),
    }
}

/// Builder for configuring a Sheets client
pub struct SheetsClientBuilder {
    http_config: HttpClientConfig,
    base_url: String,
    access_token: Option<String>,
    write_quota: Option<(u32, Duration)>,
    read_quota: Option<(u32, Duration)>,
    write_limiter: Option<Arc<SlidingWindow>>,
    read_limiter: Option<Arc<dyn RateLimiter>>,
}

impl Default for SheetsClientBuilder {
    fn default() -> Self {
        Self {
            http_config: HttpClientConfig::default(),
            base_url: SHEETS_BASE_URL.to_string(),
            access_token: None,
            write_quota: None,
            read_quota: None,
            write_limiter: None,
            read_limiter: None,
        }
    }
}

impl SheetsClientBuilder {
    /// Set custom base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the OAuth bearer token sent with every call
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Configure HTTP client settings
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Set the write quota (default: 100 per 100 seconds)
    pub fn write_quota(mut self, quota: u32, window: Duration) -> Self {
        self.write_quota = Some((quota, window));
        self
    }

    /// Set the read quota (default: 100 per 100 seconds)
    pub fn read_quota(mut self, quota: u32, window: Duration) -> Self {
        self.read_quota = Some((quota, window));
        self
    }

    /// Share an existing write limiter, overriding `write_quota`
    pub fn write_limiter(mut self, limiter: Arc<SlidingWindow>) -> Self {
        self.write_limiter = Some(limiter);
        self
    }

    /// Share an existing read limiter, overriding `read_quota`
    pub fn read_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.read_limiter = Some(limiter);
        self
    }

    /// Build the Sheets client
    pub fn build(self) -> Result<SheetsClient> {
        let access_token = self.access_token.filter(|token| !token.is_empty()).ok_or(SheetsError::MissingAccessToken)?;

        let write_limiter = match (self.write_limiter, self.write_quota) {
            (Some(limiter), _) => limiter,
            (None, Some((quota, window))) => Arc::new(SlidingWindow::new(quota, window)?),
            (None, None) => Arc::new(presets::sheets::write_limits()),
        };

        let read_limiter: Arc<dyn RateLimiter> = match (self.read_limiter, self.read_quota) {
            (Some(limiter), _) => limiter,
            (None, Some((quota, window))) => Arc::new(SlidingWindow::new(quota, window)?),
            (None, None) => Arc::new(presets::sheets::read_limits()),
        };

        let client = HttpClient::with_config(self.http_config)?;

        Ok(SheetsClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            access_token,
            write_limiter,
            read_limiter,
            requests: Mutex::new(RequestsContainer::new()),
        })
    }
}
