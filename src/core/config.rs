use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::errors::RelayError;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SLACK_API_BASE_URL: &str = "https://slack.com/api";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub slack_bot_token: String,
    pub slack_api_base_url: Url,
    /// Workflow endpoint for mentions without files or attachments.
    pub forward_text_url: Url,
    /// Workflow endpoint for mentions carrying files or attachments.
    pub forward_attachment_url: Url,
    pub http_timeout: Duration,
    /// When unset, failed deliveries are only logged.
    pub dead_letter_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| RelayError::ConfigError(format!("{key} must be set")))
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| RelayError::ConfigError(format!("PORT: {e}")))?,
            None => DEFAULT_PORT,
        };

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| RelayError::ConfigError(format!("HTTP_TIMEOUT_SECS: {e}")))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let slack_api_base_url = get("SLACK_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_SLACK_API_BASE_URL.to_string());

        Ok(Self {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port,
            slack_bot_token: require("SLACK_BOT_TOKEN")?,
            slack_api_base_url: parse_url("SLACK_API_BASE_URL", &slack_api_base_url)?,
            forward_text_url: parse_url("FORWARD_TEXT_URL", &require("FORWARD_TEXT_URL")?)?,
            forward_attachment_url: parse_url(
                "FORWARD_ATTACHMENT_URL",
                &require("FORWARD_ATTACHMENT_URL")?,
            )?,
            http_timeout: Duration::from_secs(http_timeout_secs),
            dead_letter_path: get("DEAD_LETTER_PATH").map(PathBuf::from),
        })
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url, RelayError> {
    let url = Url::parse(raw.trim()).map_err(|e| RelayError::ConfigError(format!("{key}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RelayError::ConfigError(format!(
            "{key}: unsupported scheme '{other}'"
        ))),
    }
}

// Hand-written so the bot token never ends up in logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("slack_bot_token", &"<redacted>")
            .field("slack_api_base_url", &self.slack_api_base_url.as_str())
            .field("forward_text_url", &self.forward_text_url.as_str())
            .field("forward_attachment_url", &self.forward_attachment_url.as_str())
            .field("http_timeout", &self.http_timeout)
            .field("dead_letter_path", &self.dead_letter_path)
            .finish()
    }
}
