//! HTTP entrypoint - a single `POST /` route for Slack event deliveries.
//!
//! Bodies are parsed here and handed to [`Relay`]; every well-formed payload
//! is answered with 200 whatever happens downstream.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::post;
use tower_http::trace::TraceLayer;
use tracing::error;

use super::event_handler::{Relay, RelayResponse};
use super::helpers;
use crate::core::models::InboundEvent;
use crate::errors::RelayError;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn handle_events(State(state): State<AppState>, body: Bytes) -> Response {
    let event: InboundEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            let err = RelayError::from(e);
            error!(error = %err, body_len = body.len(), "Rejecting inbound payload");
            return helpers::err_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    match state.relay.handle_inbound_event(event).await {
        RelayResponse::Challenge(challenge) => helpers::ok_challenge(&challenge),
        RelayResponse::Empty => helpers::ok_empty(),
    }
}
