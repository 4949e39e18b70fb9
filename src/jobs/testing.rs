//! Shared test doubles for the scheduling core.

use std::sync::Mutex;

use async_trait::async_trait;
use jiff::Timestamp;
use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

use crate::external::{CalloutResponse, HttpCallout};
use crate::models::CronJob;

/// Scripted [`HttpCallout`] that records every call it receives.
pub(crate) struct StubCallout {
    /// Status returned for GETs; `None` simulates a transport failure.
    status: Option<u16>,
    /// POSTs to these URLs fail at the transport level.
    fail_posts_to: Vec<String>,
    pub(crate) gets: Mutex<Vec<(String, Vec<(String, String)>)>>,
    pub(crate) posts: Mutex<Vec<(String, JsonValue)>>,
}

impl StubCallout {
    pub(crate) fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
            fail_posts_to: Vec::new(),
            gets: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            status: None,
            fail_posts_to: Vec::new(),
            gets: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_posts_to(mut self, url: &str) -> Self {
        self.fail_posts_to.push(url.to_string());
        self
    }
}

#[async_trait]
impl HttpCallout for StubCallout {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> CalloutResponse {
        self.gets.lock().unwrap().push((
            url.to_string(),
            query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        ));
        match self.status {
            Some(status) => CalloutResponse {
                status: Some(status),
                body: Some(json!({"ok": status < 400})),
                error: None,
                duration_ms: 1,
            },
            None => CalloutResponse {
                status: None,
                body: None,
                error: Some("connection refused".to_string()),
                duration_ms: 1,
            },
        }
    }

    async fn post_json(&self, url: &str, body: &JsonValue) -> CalloutResponse {
        self.posts.lock().unwrap().push((url.to_string(), body.clone()));
        if self.fail_posts_to.iter().any(|failing| failing == url) {
            CalloutResponse {
                status: None,
                body: None,
                error: Some("connection refused".to_string()),
                duration_ms: 1,
            }
        } else {
            CalloutResponse {
                status: Some(200),
                body: None,
                error: None,
                duration_ms: 1,
            }
        }
    }
}

/// A job definition with the given start instant, schedule, and subscribers.
pub(crate) fn test_job(start_date: Timestamp, schedule: &str, webhooks: Vec<String>) -> CronJob {
    let now = Timestamp::now();
    CronJob {
        id: Uuid::new_v4(),
        name: "test-job".to_string(),
        link: "https://target.example/ping".to_string(),
        api_key: None,
        schedule: schedule.to_string(),
        start_date,
        webhooks,
        created_at: now,
        updated_at: now,
    }
}
