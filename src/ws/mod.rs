//! WebSocket module — client sessions and event delivery.
//!
//! - [`messages`]: Wire codec for inbound and outbound events.
//! - [`manager`]: Connection registry with unicast and broadcast.
//! - [`handler`]: Axum WebSocket upgrade handler.

pub mod handler;
pub mod manager;
pub mod messages;

pub use handler::ws_handler;
pub use manager::ConnectionRegistry;
pub use messages::{ClientEvent, ServerEvent};
