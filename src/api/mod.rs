//! HTTP handler and event processing

pub mod event_handler;
pub mod handler;
pub mod helpers;

pub use event_handler::{Classification, ForwardEndpoints, Relay, RelayResponse, classify};
pub use handler::{AppState, create_router};
