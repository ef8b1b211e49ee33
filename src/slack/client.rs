//! Slack Web API client
//!
//! Posts messages with either a user token (delegated action) or the bot
//! token. Calls are made once; failures are returned to the caller as-is.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::errors::RelayError;

pub const SLACK_API_BASE: &str = "https://slack.com/api";

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(20))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Shared HTTP client for Slack calls.
#[must_use]
pub fn http_client() -> Client {
    HTTP_CLIENT.clone()
}

/// Response body of `chat.postMessage`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,
    pub channel: Option<String>,
    pub ts: Option<String>,
    /// Slack error code when `ok` is false, e.g. `not_in_channel`.
    pub error: Option<String>,
}

impl PostMessageResponse {
    /// # Errors
    ///
    /// Returns `UpstreamCallFailed` carrying Slack's error code when `ok` is false.
    pub fn into_result(self) -> Result<Self, RelayError> {
        if self.ok {
            Ok(self)
        } else {
            Err(RelayError::UpstreamCallFailed(
                self.error.unwrap_or_else(|| "unknown".to_string()),
            ))
        }
    }
}

pub struct SlackClient {
    token: String,
    http: Client,
    base_url: String,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_http(token, http_client())
    }

    #[must_use]
    pub fn with_http(token: impl Into<String>, http: Client) -> Self {
        Self {
            token: token.into(),
            http,
            base_url: SLACK_API_BASE.to_string(),
        }
    }

    /// Send calls to `base_url` instead of the public Slack API.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Post `text` to `channel_id` as whoever owns the token.
    ///
    /// A response with `ok: false` is still returned as `Ok`; use
    /// [`PostMessageResponse::into_result`] to turn it into an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the body is not valid JSON.
    pub async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
    ) -> Result<PostMessageResponse, RelayError> {
        let payload = build_post_message_payload(channel_id, text);

        let resp = self
            .http
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(RelayError::UpstreamCallFailed(format!(
                "chat.postMessage HTTP {}",
                resp.status()
            )));
        }

        let body: PostMessageResponse = resp.json().await.map_err(|e| {
            RelayError::UpstreamCallFailed(format!("chat.postMessage JSON parse error: {e}"))
        })?;
        debug!(ok = body.ok, channel = %channel_id, "chat.postMessage returned");
        Ok(body)
    }
}

#[must_use]
fn build_post_message_payload(channel_id: &str, text: &str) -> serde_json::Value {
    json!({
        "channel": channel_id,
        "text": text,
    })
}
