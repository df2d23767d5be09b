use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{Forwarder, truncate_body};
use crate::core::models::ForwardRequest;
use crate::errors::RelayError;

/// HTTP client for the external workflow engine.
#[derive(Clone)]
pub struct WorkflowClient {
    http: Client,
}

impl WorkflowClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Forwarder for WorkflowClient {
    async fn forward(&self, endpoint: &Url, request: &ForwardRequest) -> Result<(), RelayError> {
        // `.json()` also sets Content-Type: application/json
        let resp = self
            .http
            .post(endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::HttpError(format!("Forward request failed: {e}")))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(RelayError::ForwardError(format!(
                "HTTP {status}: {}",
                truncate_body(&body)
            )));
        }

        debug!(endpoint = %endpoint, status = %status, response = %truncate_body(&body), "Workflow endpoint accepted mention");
        Ok(())
    }
}
