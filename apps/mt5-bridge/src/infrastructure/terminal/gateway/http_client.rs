//! HTTP client wrapper with retry logic.
//!
//! Reads retry with exponential backoff; writes are sent exactly once so a
//! trade request can never be duplicated by the client.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::GatewayErrorResponse;
use super::config::{GatewayConfig, RetryConfig};
use super::error::GatewayError;

/// HTTP client for the terminal gateway.
#[derive(Debug, Clone)]
pub struct GatewayHttpClient {
    client: Client,
    base_url: Url,
    retry_config: RetryConfig,
}

impl GatewayHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::Http(format!("invalid gateway URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Http(format!(
                "invalid gateway URL: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            retry_config: config.retry.clone(),
        })
    }

    /// GET with retries on network errors, 408, 429 and 5xx.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let url = self.url(segments, query)?;
        let mut backoff = ExponentialBackoff::new(&self.retry_config);

        loop {
            let response = match self.client.get(url.clone()).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            error = %e,
                            url = %url,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Gateway network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(if backoff.attempt > 1 {
                        GatewayError::MaxRetriesExceeded {
                            attempts: backoff.attempt,
                        }
                    } else {
                        GatewayError::Network(e.to_string())
                    });
                }
            };

            let status = response.status();
            if status.is_success() {
                return read_json(response).await;
            }

            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let message = error_message(response).await;

            let delay = match categorize_status(status) {
                ErrorCategory::RateLimited => backoff
                    .next_backoff()
                    .map(|delay| retry_after.map_or(delay, Duration::from_secs)),
                ErrorCategory::Retryable => backoff.next_backoff(),
                ErrorCategory::NonRetryable => None,
            };

            match delay {
                Some(delay) => {
                    tracing::warn!(
                        status = status.as_u16(),
                        message = %message,
                        url = %url,
                        delay_ms = delay.as_millis(),
                        "Gateway error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return Err(GatewayError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
            }
        }
    }

    /// POST a JSON body once.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, GatewayError> {
        let url = self.url(segments, &[])?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return read_json(response).await;
        }

        Err(GatewayError::Api {
            status: status.as_u16(),
            message: error_message(response).await,
        })
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::Http("gateway URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

/// Parse a success body; an empty body reads as JSON `null`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let text = response
        .text()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))?;
    let text = if text.trim().is_empty() { "null" } else { &text };
    serde_json::from_str(text).map_err(|e| GatewayError::JsonParse(e.to_string()))
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<GatewayErrorResponse>(&body) {
        Ok(err) => err.message,
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body,
    }
}

/// Error category for determining retry behavior.
enum ErrorCategory {
    RateLimited,
    Retryable,
    NonRetryable,
}

/// Categorize HTTP status code for retry handling.
const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        429 => ErrorCategory::RateLimited,
        408 | 500 | 502 | 503 | 504 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Exponential backoff calculator.
struct ExponentialBackoff {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    const fn new(config: &RetryConfig) -> Self {
        Self {
            attempt: 0,
            max_attempts: config.max_attempts,
            current_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }

        let backoff = self.current_backoff;
        self.current_backoff = Duration::from_secs_f64(
            (self.current_backoff.as_secs_f64() * self.multiplier)
                .min(self.max_backoff.as_secs_f64()),
        );

        Some(backoff)
    }
}
