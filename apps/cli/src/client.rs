//! HTTP client for the evaluation service.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::icp_config::IcpConfig;

const EVALUATE_PATH: &str = "/api/v1/evaluate";
const HEALTH_PATH: &str = "/health";
/// Longest wait between two attempts, whatever the attempt number.
const MAX_BACKOFF: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "Fit")]
    Fit,
    #[serde(rename = "Not Fit")]
    NotFit,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Fit => f.write_str("Fit"),
            Decision::NotFit => f.write_str("Not Fit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub decision: Decision,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub service: String,
    pub completion_backend_configured: bool,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
struct EvaluatePayload<'a> {
    profile_text: &'a str,
    rules: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    icp_title: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    kind: String,
    message: String,
    #[serde(default)]
    retryable: bool,
    raw_response: Option<String>,
}

#[derive(Debug, Error)]
pub enum RequesterError {
    #[error("cannot connect to the evaluation service at {url}; is icp-api running?")]
    Unreachable { url: String },

    #[error("the evaluation service did not answer in time")]
    Timeout,

    #[error("evaluation service returned {status} {kind}: {message}")]
    Service {
        status: u16,
        kind: String,
        message: String,
        retryable: bool,
        raw_response: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from the evaluation service: {0}")]
    Decode(String),
}

impl RequesterError {
    /// Timeouts on either side of the service can be retried; nothing else is.
    pub fn is_retryable(&self) -> bool {
        match self {
            RequesterError::Timeout => true,
            RequesterError::Service { retryable, .. } => *retryable,
            _ => false,
        }
    }
}

pub struct EvaluationClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base: Duration,
}

impl EvaluationClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RequesterError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 0,
            backoff_base: Duration::from_secs(1),
        })
    }

    /// Retries apply only to retryable failures. Zero (the default) disables them.
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[cfg(test)]
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub async fn evaluate(
        &self,
        profile_text: &str,
        icp: &IcpConfig,
    ) -> Result<EvaluationOutcome, RequesterError> {
        let payload = EvaluatePayload {
            profile_text,
            rules: &icp.rules,
            icp_title: icp.icp_title.as_deref(),
        };

        let mut attempt = 0;
        loop {
            match self.post_evaluate(&payload).await {
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = backoff_delay(self.backoff_base, attempt);
                    warn!(
                        "Evaluation attempt {} failed ({err}), retrying after {}ms...",
                        attempt + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    pub async fn health(&self) -> Result<HealthReport, RequesterError> {
        let url = format!("{}{HEALTH_PATH}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        decode(response).await
    }

    async fn post_evaluate(
        &self,
        payload: &EvaluatePayload<'_>,
    ) -> Result<EvaluationOutcome, RequesterError> {
        let url = format!("{}{EVALUATE_PATH}", self.base_url);
        debug!("POST {url} with {} rules", payload.rules.len());

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        decode(response).await
    }

    fn classify(&self, err: reqwest::Error) -> RequesterError {
        if err.is_timeout() {
            RequesterError::Timeout
        } else if err.is_connect() {
            RequesterError::Unreachable {
                url: self.base_url.clone(),
            }
        } else {
            RequesterError::Http(err)
        }
    }
}

/// Exponential backoff (base, 2x base, 4x base...) capped at `MAX_BACKOFF`.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_BACKOFF)
}

async fn decode<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, RequesterError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            RequesterError::Timeout
        } else {
            RequesterError::Http(e)
        }
    })?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| RequesterError::Decode(e.to_string()));
    }

    Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => RequesterError::Service {
            status: status.as_u16(),
            kind: envelope.error.kind,
            message: envelope.error.message,
            retryable: envelope.error.retryable,
            raw_response: envelope.error.raw_response,
        },
        Err(_) => RequesterError::Service {
            status: status.as_u16(),
            kind: "UNKNOWN".to_string(),
            message: body,
            retryable: false,
            raw_response: None,
        },
    })
}
