//! Handler for Slack Events API payloads.
//!
//! - `url_verification` is answered with its challenge
//! - `event_callback` carrying an app mention is forwarded to the workflow
//!   engine and acknowledged in the originating channel
//! - everything else is accepted and ignored

use std::sync::Arc;

use serde::Serialize;
use tracing::{Instrument, debug, error, info, info_span, warn};
use url::Url;
use uuid::Uuid;

use crate::clients::{Forwarder, Notifier, SlackClient, WorkflowClient, build_http_client};
use crate::core::config::AppConfig;
use crate::core::models::{AckRequest, ForwardRequest, InboundEvent, Message};
use crate::dead_letter::{DeadLetterRecord, DeadLetterSink, DeliveryStage, dead_letter_sink_from_config};
use crate::errors::RelayError;
use crate::utils::strip_markup;

pub const ACK_TEXT: &str = "Message received and forwarded for processing.";
pub const ACK_WITH_ATTACHMENTS_TEXT: &str =
    "Message and attachments received and forwarded for processing.";

// ============================================================================
// Classification
// ============================================================================

/// What to do with the message inside an `event_callback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Ignore,
    ProcessMention,
}

/// A message qualifies when it has no `type` or is an `app_mention`.
#[must_use]
pub fn classify(message: &Message) -> Classification {
    match message.kind.as_deref() {
        None | Some("app_mention") => Classification::ProcessMention,
        Some(_) => Classification::Ignore,
    }
}

// ============================================================================
// Payload Builders
// ============================================================================

#[must_use]
pub fn build_forward_request(message: &Message) -> ForwardRequest {
    ForwardRequest {
        slack_event_text: strip_markup(message.text.as_deref().unwrap_or("")),
        slack_channel_id: message.channel.clone().unwrap_or_default(),
        slack_files: message.files.clone().unwrap_or_default(),
        slack_attachments: message.attachments.clone().unwrap_or_default(),
    }
}

#[must_use]
pub fn ack_text(has_attachments: bool) -> &'static str {
    if has_attachments {
        ACK_WITH_ATTACHMENTS_TEXT
    } else {
        ACK_TEXT
    }
}

// ============================================================================
// Relay
// ============================================================================

/// The two workflow endpoints a mention can be routed to.
#[derive(Debug, Clone)]
pub struct ForwardEndpoints {
    pub text: Url,
    pub attachment: Url,
}

impl ForwardEndpoints {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            text: config.forward_text_url.clone(),
            attachment: config.forward_attachment_url.clone(),
        }
    }

    #[must_use]
    pub fn select(&self, has_attachments: bool) -> &Url {
        if has_attachments {
            &self.attachment
        } else {
            &self.text
        }
    }
}

/// Outcome of handling one inbound event. Always answered with 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayResponse {
    Challenge(String),
    Empty,
}

pub struct Relay {
    endpoints: ForwardEndpoints,
    forwarder: Arc<dyn Forwarder>,
    notifier: Arc<dyn Notifier>,
    dead_letters: Option<Arc<dyn DeadLetterSink>>,
}

impl Relay {
    pub fn new(
        endpoints: ForwardEndpoints,
        forwarder: Arc<dyn Forwarder>,
        notifier: Arc<dyn Notifier>,
        dead_letters: Option<Arc<dyn DeadLetterSink>>,
    ) -> Self {
        Self {
            endpoints,
            forwarder,
            notifier,
            dead_letters,
        }
    }

    /// Wires the reqwest-backed clients from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, RelayError> {
        let http = build_http_client(config)?;
        let forwarder = Arc::new(WorkflowClient::new(http.clone()));
        let notifier = Arc::new(SlackClient::new(
            http,
            config.slack_bot_token.clone(),
            config.slack_api_base_url.clone(),
        ));

        Ok(Self::new(
            ForwardEndpoints::from_config(config),
            forwarder,
            notifier,
            dead_letter_sink_from_config(config),
        ))
    }

    /// Handles one inbound event. Downstream failures are logged and
    /// swallowed so Slack never sees anything but a successful receipt.
    ///
    /// A qualifying mention without a usable `channel` is still forwarded
    /// (with an empty `slack_channel_id`), but no acknowledgment is posted;
    /// a `warn` carrying the request's `correlation_id` records the skip.
    pub async fn handle_inbound_event(&self, event: InboundEvent) -> RelayResponse {
        match event {
            InboundEvent::UrlVerification { challenge } => {
                info!("Answering url_verification challenge");
                RelayResponse::Challenge(challenge)
            }
            InboundEvent::EventCallback { event: Some(message) } => {
                match classify(&message) {
                    Classification::ProcessMention => {
                        let correlation_id = Uuid::new_v4().to_string();
                        let span = info_span!(
                            "mention",
                            correlation_id = %correlation_id,
                            channel = message.channel.as_deref().unwrap_or(""),
                            user = message.user.as_deref().unwrap_or(""),
                            ts = message.ts.as_deref().unwrap_or(""),
                        );
                        self.process_mention(&correlation_id, &message)
                            .instrument(span)
                            .await;
                    }
                    Classification::Ignore => {
                        debug!(event_type = message.kind.as_deref().unwrap_or(""), "Ignoring event");
                    }
                }
                RelayResponse::Empty
            }
            InboundEvent::EventCallback { event: None } => {
                warn!("event_callback without an event; ignoring");
                RelayResponse::Empty
            }
            InboundEvent::Unknown => {
                debug!("Ignoring unsupported payload type");
                RelayResponse::Empty
            }
        }
    }

    async fn process_mention(&self, correlation_id: &str, message: &Message) {
        let has_attachments = message.has_attachments();
        let endpoint = self.endpoints.select(has_attachments);
        let request = build_forward_request(message);

        info!(
            has_attachments,
            endpoint = %endpoint,
            text_len = request.slack_event_text.len(),
            "Forwarding mention"
        );

        match self.forwarder.forward(endpoint, &request).await {
            Ok(()) => info!("Mention forwarded"),
            Err(e) => {
                error!(error = %e, endpoint = %endpoint, "Forward failed");
                self.dead_letter(
                    correlation_id,
                    DeliveryStage::Forward,
                    endpoint.as_str(),
                    &e,
                    &request,
                )
                .await;
            }
        }

        // Acknowledge regardless of the forward outcome.
        let Some(channel) = message.channel.as_deref().filter(|c| !c.is_empty()) else {
            warn!(
                correlation_id = %correlation_id,
                "Mention has no channel; skipping acknowledgment"
            );
            return;
        };

        let ack = AckRequest {
            channel: channel.to_string(),
            text: ack_text(has_attachments).to_string(),
        };

        match self.notifier.post_message(&ack).await {
            Ok(()) => info!("Acknowledgment posted"),
            Err(e) => {
                error!(error = %e, "Acknowledgment failed");
                let target = self.notifier.target();
                self.dead_letter(correlation_id, DeliveryStage::Acknowledge, &target, &e, &ack)
                    .await;
            }
        }
    }

    async fn dead_letter<T: Serialize>(
        &self,
        correlation_id: &str,
        stage: DeliveryStage,
        target: &str,
        err: &RelayError,
        payload: &T,
    ) {
        let Some(sink) = &self.dead_letters else {
            return;
        };

        let payload = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => {
                error!(error = %e, "Failed to serialize dead-letter payload");
                return;
            }
        };

        let record = DeadLetterRecord::new(correlation_id, stage, target, err, payload);
        if let Err(e) = sink.record(&record).await {
            error!(error = %e, "Failed to write dead-letter record");
        }
    }
}
