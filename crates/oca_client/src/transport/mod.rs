use oca_core::error::AppError;
use serde_json::Value;

/// Authenticated JSON transport rooted at the alerting service API URL.
///
/// `path` always starts with `/` and may carry a query string.
pub trait Transport {
    fn get_json(&self, path: &str) -> Result<Value, AppError>;
    fn post_json(&self, path: &str, body: &Value) -> Result<(), AppError>;
}

pub mod ureq_transport;

/// `Authorization` header value for an optional bearer token.
pub fn authorization_header(token: Option<&str>) -> Option<String> {
    match token {
        Some(t) if !t.trim().is_empty() => Some(format!("Bearer {t}")),
        _ => None,
    }
}
