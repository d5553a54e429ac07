use std::time::Duration;

use reqwest::Client;
use reqwest::ClientBuilder;

use crate::errors::Result;

const USER_AGENT: &str = concat!("gs_http/", env!("CARGO_PKG_VERSION"));

/// Configuration for HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host (default: 8)
    pub pool_max_idle_per_host: usize,

    /// Idle timeout for connections (default: 90s)
    pub pool_idle_timeout: Duration,

    /// Connection establishment timeout (default: 10s)
    pub connect_timeout: Duration,

    /// Total request timeout (default: 60s)
    ///
    /// Large batchUpdate calls can take tens of seconds server-side.
    pub request_timeout: Duration,

    /// TCP keepalive interval (default: 60s)
    pub tcp_keepalive: Duration,

    /// Enable Hickory DNS for async resolution (default: true)
    pub hickory_dns: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 8,
            pool_idle_timeout: Duration::from_secs(90),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            tcp_keepalive: Duration::from_secs(60),
            hickory_dns: true,
        }
    }
}

impl HttpClientConfig {
    /// Shorter timeouts for interactive use.
    pub fn interactive() -> Self {
        Self { connect_timeout: Duration::from_secs(5), request_timeout: Duration::from_secs(20), ..Default::default() }
    }

    /// Longer request timeout for very large batches.
    pub fn bulk() -> Self {
        Self { request_timeout: Duration::from_secs(180), ..Default::default() }
    }
}

pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .tcp_nodelay(true)
            .tcp_keepalive(Some(config.tcp_keepalive))
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .use_rustls_tls()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .gzip(true)
            .brotli(true)
            .hickory_dns(config.hickory_dns)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Create a GET request builder
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }

    /// Create a POST request builder
    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.pool_max_idle_per_host, 8);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.hickory_dns);
    }

    #[test]
    fn test_interactive_config() {
        let config = HttpClientConfig::interactive();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(20));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_bulk_config() {
        let config = HttpClientConfig::bulk();
        assert_eq!(config.request_timeout, Duration::from_secs(180));
    }

    #[test]
    fn test_client_creation() {
        let client = HttpClient::with_config(HttpClientConfig::interactive());
        assert!(client.is_ok());
        assert_eq!(client.unwrap().config().connect_timeout, Duration::from_secs(5));
    }
}
