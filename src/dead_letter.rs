//! Dead-letter records for deliveries that failed.
//!
//! The relay always answers Slack with 200, so a failing workflow endpoint
//! would otherwise only show up in logs. When `DEAD_LETTER_PATH` is set each
//! failed call is appended to that file as one JSON line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::core::config::AppConfig;
use crate::errors::RelayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStage {
    Forward,
    Acknowledge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetterRecord {
    pub correlation_id: String,
    pub recorded_at: DateTime<Utc>,
    pub stage: DeliveryStage,
    pub target: String,
    pub error: String,
    pub payload: Value,
}

impl DeadLetterRecord {
    pub fn new(
        correlation_id: &str,
        stage: DeliveryStage,
        target: &str,
        error: &RelayError,
        payload: Value,
    ) -> Self {
        Self {
            correlation_id: correlation_id.to_string(),
            recorded_at: Utc::now(),
            stage,
            target: target.to_string(),
            error: error.to_string(),
            payload,
        }
    }
}

#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    async fn record(&self, record: &DeadLetterRecord) -> Result<(), RelayError>;
}

/// Appends records as JSON lines to a local file.
pub struct JsonlDeadLetterSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlDeadLetterSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DeadLetterSink for JsonlDeadLetterSink {
    async fn record(&self, record: &DeadLetterRecord) -> Result<(), RelayError> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| RelayError::DeadLetterError(format!("Failed to serialize record: {e}")))?;
        line.push(b'\n');

        // Whole lines only; concurrent requests must not interleave.
        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Returns the configured sink, or `None` when dead-lettering is disabled.
pub fn dead_letter_sink_from_config(config: &AppConfig) -> Option<Arc<dyn DeadLetterSink>> {
    config
        .dead_letter_path
        .as_ref()
        .map(|path| Arc::new(JsonlDeadLetterSink::new(path.clone())) as Arc<dyn DeadLetterSink>)
}
