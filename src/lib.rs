//! mention-relay - forwards Slack app mentions to an external workflow engine.
//!
//! A single `POST /` endpoint receives Slack Events API deliveries. Mentions of
//! the bot are stripped of Slack markup, forwarded as JSON to one of two
//! workflow endpoints (plain text, or text with files/attachments), and then
//! acknowledged in the originating channel via `chat.postMessage`.
//!
//! # Architecture
//!
//! The system uses:
//! - axum for the inbound HTTP endpoint
//! - reqwest for the workflow and Slack Web API calls
//! - an optional JSON-lines dead-letter file for failed deliveries
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use mention_relay::api::{AppState, Relay, create_router};
//! use mention_relay::core::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     mention_relay::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let relay = Relay::from_config(&config)?;
//!     let app = create_router(AppState::new(relay));
//!
//!     let listener = tokio::net::TcpListener::bind(config.listen_address()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod clients;
pub mod core;
pub mod dead_letter;
pub mod errors;
pub mod utils;

/// Configure structured logging with JSON format.
///
/// Filtering follows `RUST_LOG`, defaulting to `info` for this crate and for
/// the HTTP trace layer. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// mention_relay::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mention_relay=info,tower_http=info".into());
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
