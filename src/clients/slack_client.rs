//! Slack API client module
//!
//! Only `chat.postMessage` is needed: the relay acknowledges each forwarded
//! mention in the channel it came from.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{Notifier, truncate_body};
use crate::core::models::AckRequest;
use crate::errors::RelayError;

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

/// Slack Web API client authenticated with a bot token.
#[derive(Clone)]
pub struct SlackClient {
    http: Client,
    token: String,
    api_base_url: Url,
}

impl SlackClient {
    pub fn new(http: Client, token: String, api_base_url: Url) -> Self {
        Self {
            http,
            token,
            api_base_url,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/{method}",
            self.api_base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Notifier for SlackClient {
    async fn post_message(&self, request: &AckRequest) -> Result<(), RelayError> {
        let resp = self
            .http
            .post(self.method_url("chat.postMessage"))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::HttpError(format!("chat.postMessage request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::HttpError(format!(
                "chat.postMessage HTTP {status}: {}",
                truncate_body(&body)
            )));
        }

        // Slack reports most failures as 200 with `ok: false`
        let result: PostMessageResponse = resp.json().await.map_err(|e| {
            RelayError::ApiError(format!("Failed to parse chat.postMessage response: {e}"))
        })?;

        if result.ok {
            Ok(())
        } else {
            Err(RelayError::ApiError(format!(
                "chat.postMessage error: {}",
                result.error.unwrap_or_else(|| "Unknown error".to_string())
            )))
        }
    }

    fn target(&self) -> String {
        self.method_url("chat.postMessage")
    }
}
