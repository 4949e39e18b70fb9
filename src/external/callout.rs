//! Outbound HTTP seam used by the trigger executor and webhook dispatcher.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::client::HTTP_CLIENT;

/// Completion of an outbound call, successful or not.
///
/// Upstream failures are data here, never `Err`: a transport error leaves
/// `status` empty and carries the error text, so callers can always observe
/// what happened without a panic or a lost firing.
#[derive(Debug, Clone)]
pub struct CalloutResponse {
    /// HTTP status code, absent when the call never completed.
    pub status: Option<u16>,
    /// Response body, parsed as JSON when possible, raw text otherwise.
    pub body: Option<JsonValue>,
    /// Transport-level error message when the call failed outright.
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl CalloutResponse {
    /// True iff the upstream answered with 2xx.
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, Some(code) if (200..300).contains(&code))
    }
}

/// Outbound HTTP operations the scheduling core depends on.
#[async_trait]
pub trait HttpCallout: Send + Sync {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> CalloutResponse;

    async fn post_json(&self, url: &str, body: &JsonValue) -> CalloutResponse;
}

/// [`HttpCallout`] backed by the shared reqwest client.
#[derive(Debug, Default)]
pub struct ReqwestCallout;

impl ReqwestCallout {
    pub fn new() -> Self {
        Self
    }

    async fn consume(
        result: Result<reqwest::Response, reqwest::Error>,
        started: Instant,
    ) -> CalloutResponse {
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = match response.text().await {
                    Ok(text) if text.is_empty() => None,
                    Ok(text) => Some(
                        serde_json::from_str(&text).unwrap_or(JsonValue::String(text)),
                    ),
                    Err(_) => None,
                };
                CalloutResponse {
                    status: Some(status),
                    body,
                    error: None,
                    duration_ms,
                }
            }
            Err(e) => CalloutResponse {
                status: None,
                body: None,
                error: Some(e.to_string()),
                duration_ms,
            },
        }
    }
}

#[async_trait]
impl HttpCallout for ReqwestCallout {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> CalloutResponse {
        let started = Instant::now();
        let result = HTTP_CLIENT.get(url).query(query).send().await;
        Self::consume(result, started).await
    }

    async fn post_json(&self, url: &str, body: &JsonValue) -> CalloutResponse {
        let started = Instant::now();
        let result = HTTP_CLIENT.post(url).json(body).send().await;
        Self::consume(result, started).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivered_requires_2xx_status() {
        let base = CalloutResponse {
            status: Some(200),
            body: None,
            error: None,
            duration_ms: 0,
        };
        assert!(base.is_delivered());
        assert!(CalloutResponse { status: Some(201), ..base.clone() }.is_delivered());
        assert!(!CalloutResponse { status: Some(404), ..base.clone() }.is_delivered());
        assert!(!CalloutResponse { status: None, ..base }.is_delivered());
    }
}
