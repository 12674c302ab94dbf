use std::fmt;
use std::time::Duration;

use oca_core::error::{AppError, API_DECODE_FAILED, API_UNREACHABLE};
use serde_json::Value;
use tracing::{debug, warn};

use super::{authorization_header, Transport};
use crate::config::ClientConfig;

#[derive(Clone)]
pub struct UreqTransport {
    api_url: String,
    authorization: Option<String>,
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("api_url", &self.api_url)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        config.validate()?;
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build();
        Ok(Self {
            api_url: config.api_url(),
            authorization: authorization_header(config.token.as_deref()),
            agent,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}{}", self.api_url, path);
        let req = self.agent.request(method, &url);
        match &self.authorization {
            Some(value) => req.set("Authorization", value),
            None => req,
        }
    }
}

fn map_call_error(method: &str, path: &str, err: ureq::Error) -> AppError {
    match err {
        ureq::Error::Status(status, resp) => {
            warn!(method, path, status, "alerting service request failed");
            AppError::request_failed(status, resp.status_text())
        }
        ureq::Error::Transport(t) => {
            warn!(method, path, error = %t, "alerting service unreachable");
            AppError::new(API_UNREACHABLE, "Failed to reach the alerting service")
                .with_details(t.to_string())
                .with_retryable(true)
        }
    }
}

impl Transport for UreqTransport {
    fn get_json(&self, path: &str) -> Result<Value, AppError> {
        debug!(path, "GET");
        let resp = self
            .request("GET", path)
            .call()
            .map_err(|e| map_call_error("GET", path, e))?;
        resp.into_json::<Value>().map_err(|e| {
            AppError::new(API_DECODE_FAILED, "Failed to decode alerting service response")
                .with_details(format!("path={path}; err={e}"))
        })
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<(), AppError> {
        debug!(path, "POST");
        self.request("POST", path)
            .send_json(body)
            .map_err(|e| map_call_error("POST", path, e))?;
        Ok(())
    }
}
