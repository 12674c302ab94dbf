use serde::{Deserialize, Serialize};
use std::fmt;

pub const API_REQUEST_FAILED: &str = "API_REQUEST_FAILED";
pub const API_UNREACHABLE: &str = "API_UNREACHABLE";
pub const API_DECODE_FAILED: &str = "API_DECODE_FAILED";
pub const API_READ_ONLY: &str = "API_READ_ONLY";
pub const API_INVALID_URL: &str = "API_INVALID_URL";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const CONFIG_PARSE_FAILED: &str = "CONFIG_PARSE_FAILED";

/// Structured error shared by the client and configuration layers.
///
/// Aggregation never produces one of these; only I/O and config parsing can fail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    /// Non-2xx answer from the alerting service.
    pub fn request_failed(status: u16, status_text: &str) -> Self {
        Self::new(
            API_REQUEST_FAILED,
            format!("Request failed with {status} {status_text}"),
        )
        .with_details(format!("status={status}"))
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
