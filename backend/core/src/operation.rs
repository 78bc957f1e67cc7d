//! Long-running operations (`202 Accepted` + `Operation-Location`).

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{CogError, CogResult};
use crate::http::ServiceClient;

/// Default delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default bound on the total time spent polling.
pub const DEFAULT_POLL_MAX_WAIT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub max_wait: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_POLL_MAX_WAIT,
        }
    }
}

/// Terminal state of an operation status document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Running,
    Succeeded,
    Failed,
}

impl OperationState {
    /// Classify a vendor status string, case-insensitively.
    pub fn from_status(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "succeeded" => Self::Succeeded,
            "failed" | "canceled" | "cancelled" | "validationfailed" => Self::Failed,
            _ => Self::Running,
        }
    }
}

impl ServiceClient {
    /// Poll `url` until its `status` is terminal and decode the final document.
    pub async fn poll_operation<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
        options: PollOptions,
    ) -> CogResult<T> {
        let started = Instant::now();
        let mut polls = 0u32;
        loop {
            polls += 1;
            let resp = self
                .send(operation, self.request(Method::GET, url))
                .await?;
            let http_status = resp.status().as_u16();
            let wait = retry_after(resp.headers()).unwrap_or(options.interval);
            let value: Value = self.read_json(operation, resp).await?;

            let status = value.get("status").and_then(Value::as_str).unwrap_or("");
            match OperationState::from_status(status) {
                OperationState::Succeeded => {
                    debug!(operation, polls, "Operation succeeded");
                    return serde_json::from_value(value).map_err(|e| CogError::Decode {
                        operation: operation.to_string(),
                        message: e.to_string(),
                    });
                }
                OperationState::Failed => {
                    return Err(failed_operation(self.service(), http_status, status, &value));
                }
                OperationState::Running => {}
            }

            if started.elapsed() + wait > options.max_wait {
                return Err(CogError::Timeout {
                    operation: operation.to_string(),
                    after: options.max_wait,
                });
            }
            debug!(operation, status, polls, wait_ms = wait.as_millis() as u64, "Operation still running");
            tokio::time::sleep(wait).await;
        }
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn failed_operation(service: &str, http_status: u16, status: &str, value: &Value) -> CogError {
    let error = value.get("error");
    let code = error
        .and_then(|e| e.get("code"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("operation finished with status '{status}'"));
    CogError::RemoteService {
        service: service.to_string(),
        status: http_status,
        code,
        message,
        body: value.to_string(),
    }
}
