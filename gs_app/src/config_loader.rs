use std::path::Path;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use config::Source;
use gs_http::HttpClientConfig;
use gs_http::SheetsClientBuilder;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Prefix for environment overrides, e.g. `GSB_WRITE_QUOTA__QUOTA=50`
pub const ENV_PREFIX: &str = "GSB";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub log_dir: String,
    pub write_quota: QuotaConfig,
    pub read_quota: QuotaConfig,
    pub http: HttpConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_dir: DEFAULT_LOG_DIR.to_string(),
            write_quota: QuotaConfig::default(),
            read_quota: QuotaConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl AppConfig {
    /// Client builder carrying every setting except the access token
    pub fn client_builder(&self) -> SheetsClientBuilder {
        gs_http::SheetsClient::builder()
            .base_url(self.base_url.as_str())
            .http_config(self.http.to_client_config())
            .write_quota(self.write_quota.quota, self.write_quota.window())
            .read_quota(self.read_quota.quota, self.read_quota.window())
    }
}

/// Operations allowed per rolling window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    pub quota: u32,
    pub window_secs: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self { quota: 100, window_secs: 100 }
    }
}

impl QuotaConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let defaults = HttpClientConfig::default();
        Self {
            connect_timeout_ms: defaults.connect_timeout.as_millis() as u64,
            request_timeout_ms: defaults.request_timeout.as_millis() as u64,
            pool_max_idle_per_host: defaults.pool_max_idle_per_host,
        }
    }
}

impl HttpConfig {
    pub fn to_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            pool_max_idle_per_host: self.pool_max_idle_per_host,
            ..HttpClientConfig::default()
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__").try_parsing(true)
}

fn load_from<S>(file: S, env: Environment) -> Result<AppConfig, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    let config = Config::builder().add_source(file).add_source(env).build()?;

    config.try_deserialize()
}

fn load_with_env<P: AsRef<Path>>(path: P, env: Environment) -> Result<AppConfig, ConfigError> {
    // A missing file is the same as an empty one; overrides still apply
    load_from(File::from(path.as_ref()).required(false), env)
}

/// Load a TOML config file, then apply `GSB_` environment overrides
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    load_with_env(path, environment())
}

/// Fall back to defaults when loading failed
pub fn or_default(result: Result<AppConfig, ConfigError>, path: &str) -> AppConfig {
    match result {
        Ok(config) => {
            tracing::info!("Loaded config from {path}");
            config
        }
        Err(err) => {
            tracing::warn!("Failed to load config from {}: {}. Using defaults.", path, err);
            AppConfig::default()
        }
    }
}

/// Load config with fallback to default
pub fn load_config_or_default(path: &str) -> AppConfig {
    or_default(load_config(path), path)
}
