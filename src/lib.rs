//! Real-time relay hub: clients connect over WebSocket and share model
//! transforms, drawing strokes, pointer positions, chat messages and
//! spawned objects.

pub mod api;
pub mod config;
pub mod relay;
pub mod ws;
