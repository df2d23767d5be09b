//! Client modules for external API interactions

pub mod slack_client;
pub mod workflow_client;

pub use slack_client::SlackClient;
pub use workflow_client::WorkflowClient;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::core::config::AppConfig;
use crate::core::models::{AckRequest, ForwardRequest};
use crate::errors::RelayError;

/// Delivers a transformed mention to a workflow endpoint.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, endpoint: &Url, request: &ForwardRequest) -> Result<(), RelayError>;
}

/// Posts a confirmation back to the originating channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post_message(&self, request: &AckRequest) -> Result<(), RelayError>;

    /// URL of the message-post call, recorded alongside delivery failures.
    fn target(&self) -> String;
}

/// Builds the pooled HTTP client shared by every outbound call.
pub fn build_http_client(config: &AppConfig) -> Result<Client, RelayError> {
    Ok(Client::builder().timeout(config.http_timeout).build()?)
}

/// Keeps error messages bounded when a remote answers with a large body.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 512;
    if body.chars().count() <= MAX_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_CHARS).collect();
        format!("{head}…")
    }
}
