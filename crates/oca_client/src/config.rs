use std::fmt;

use oca_core::error::{AppError, CONFIG_INVALID, CONFIG_PARSE_FAILED};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_PROXY_PATH: &str = "/opsgenie/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

fn default_proxy_path() -> String {
    DEFAULT_PROXY_PATH.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Where and how to reach the alerting service.
///
/// Requests go to `proxy_base_url + proxy_path`; `domain` is only used for web deep links.
/// The token is never serialized back out, and `Debug` prints it redacted.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub proxy_base_url: String,
    #[serde(default = "default_proxy_path")]
    pub proxy_path: String,
    pub domain: String,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("proxy_base_url", &self.proxy_base_url)
            .field("proxy_path", &self.proxy_path)
            .field("domain", &self.domain)
            .field("read_only", &self.read_only)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(proxy_base_url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            proxy_base_url: proxy_base_url.into(),
            proxy_path: default_proxy_path(),
            domain: domain.into(),
            read_only: false,
            token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, AppError> {
        let config: ClientConfig = serde_json::from_str(text).map_err(|e| {
            AppError::new(CONFIG_PARSE_FAILED, "Failed to parse client config")
                .with_details(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let base = Url::parse(&self.proxy_base_url).map_err(|e| {
            AppError::new(CONFIG_INVALID, "Proxy base URL is not a valid URL")
                .with_details(format!("proxy_base_url={}; err={e}", self.proxy_base_url))
        })?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(
                AppError::new(CONFIG_INVALID, "Proxy base URL must use http or https")
                    .with_details(format!("proxy_base_url={}", self.proxy_base_url)),
            );
        }
        if !self.proxy_path.is_empty() && !self.proxy_path.starts_with('/') {
            return Err(AppError::new(CONFIG_INVALID, "Proxy path must start with '/'")
                .with_details(format!("proxy_path={}", self.proxy_path)));
        }
        if self.domain.trim().is_empty() {
            return Err(AppError::new(CONFIG_INVALID, "Web domain must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(AppError::new(CONFIG_INVALID, "Timeout must be positive"));
        }
        Ok(())
    }

    /// Base every API path is appended to, without a trailing slash.
    pub fn api_url(&self) -> String {
        format!(
            "{}{}",
            self.proxy_base_url.trim_end_matches('/'),
            self.proxy_path.trim_end_matches('/')
        )
    }
}
