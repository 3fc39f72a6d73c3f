//! Relay hub — applies each inbound event to the shared tables and fans the
//! result out through the connection registry.
//!
//! Ephemeral UI signals (`move_model`, `draw_line`, `pointer_moved`) go to
//! every connection except the sender. State republications
//! (`updatePositions`, `spawnObject`) and `message` go to everyone,
//! sender included.

use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};

use super::state::RelayState;
use super::types::{ClientTable, ConnectionId, ObjectTable};
use crate::ws::manager::ConnectionRegistry;
use crate::ws::messages::{ClientEvent, ServerEvent};

/// Owns the relay tables and the set of live connections.
#[derive(Debug, Default)]
pub struct RelayHub {
    /// Both tables behind one lock; stateful handlers hold it across their
    /// broadcast so table updates reach every client in the same order.
    state: Mutex<RelayState>,
    connections: ConnectionRegistry,
}

impl RelayHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Admit a new connection: record it at the origin, then send it its id
    /// and the current object registry.
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let mut state = self.state.lock().await;

        let (id, rx) = self.connections.register().await;
        state.insert_client(&id);

        self.connections
            .send_to(&id, ServerEvent::connected(&id))
            .await;
        self.connections
            .send_to(
                &id,
                ServerEvent::InitialObjectPositions(state.objects().clone()),
            )
            .await;

        info!(conn_id = %id, clients = state.client_count(), "client connected");
        (id, rx)
    }

    /// Process one event sent by `origin`.
    pub async fn handle(&self, origin: &str, event: ClientEvent) {
        debug!(conn_id = origin, event = event.name(), "event received");

        match event {
            ClientEvent::MoveModel(data) => {
                self.connections
                    .broadcast(ServerEvent::ModelMoved(data), Some(origin))
                    .await;
            }
            ClientEvent::DrawLine(data) => {
                self.connections
                    .broadcast(ServerEvent::LineDrawn(data), Some(origin))
                    .await;
            }
            ClientEvent::PointerMoved(data) => {
                self.connections
                    .broadcast(ServerEvent::PointerUpdated(data), Some(origin))
                    .await;
            }
            ClientEvent::UpdatePosition(update) => {
                let mut state = self.state.lock().await;
                state.update_position(&update);
                let table = state.clients().clone();
                self.connections
                    .broadcast(ServerEvent::UpdatePositions(table), None)
                    .await;
            }
            ClientEvent::Message(data) => {
                self.connections
                    .broadcast(ServerEvent::Message(data), None)
                    .await;
            }
            ClientEvent::SpawnObject(data) => {
                let mut state = self.state.lock().await;
                let record = state.spawn_object(data);
                debug!(conn_id = origin, object_id = %record["id"], "object spawned");
                self.connections
                    .broadcast(ServerEvent::SpawnObject(record), None)
                    .await;
            }
            ClientEvent::Ping => {
                self.connections.send_to(origin, ServerEvent::pong()).await;
            }
        }
    }

    /// Tear down a connection and republish the shrunken client table.
    /// Safe to call more than once; only the first call broadcasts.
    pub async fn disconnect(&self, id: &str) {
        let mut state = self.state.lock().await;

        self.connections.unregister(id).await;
        if state.remove_client(id).is_none() {
            return;
        }

        let table = state.clients().clone();
        self.connections
            .broadcast(ServerEvent::UpdatePositions(table), None)
            .await;

        info!(conn_id = id, clients = state.client_count(), "client disconnected");
    }

    /// Copy of the ClientState table.
    pub async fn clients(&self) -> ClientTable {
        self.state.lock().await.clients().clone()
    }

    /// Copy of the ObjectRegistry.
    pub async fn objects(&self) -> ObjectTable {
        self.state.lock().await.objects().clone()
    }

    /// Number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.len().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
