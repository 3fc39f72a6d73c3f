//! Relay core — shared client/object tables and the hub that fans events
//! out to connected clients.
//!
//! - [`types`]: Transforms, ids and table aliases.
//! - [`state`]: The ClientState table and ObjectRegistry.
//! - [`hub`]: Per-event handlers over the state and the connection registry.

pub mod hub;
pub mod state;
pub mod types;

pub use hub::RelayHub;
pub use state::RelayState;
pub use types::*;
