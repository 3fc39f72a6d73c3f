//! Connection registry — tracks the outbound channel of every live
//! connection and delivers events by unicast or broadcast.

use std::collections::HashMap;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};
use uuid::Uuid;

use super::messages::ServerEvent;
use crate::relay::types::ConnectionId;

/// Handle for a single WebSocket client.  The session owns the
/// receiving half; the registry keeps the sending half.
pub type ClientSender = mpsc::UnboundedSender<ServerEvent>;

/// Live connections keyed by id.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    conns: RwLock<HashMap<ConnectionId, ClientSender>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection, returning (connection_id, receiver).
    pub async fn register(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = Uuid::new_v4().simple().to_string();
        let (tx, rx) = mpsc::unbounded_channel();

        self.conns.write().await.insert(id.clone(), tx);

        debug!(conn_id = %id, "connection registered");
        (id, rx)
    }

    /// Remove a connection. Returns `false` if it was already gone.
    pub async fn unregister(&self, id: &str) -> bool {
        let removed = self.conns.write().await.remove(id).is_some();
        if removed {
            debug!(conn_id = id, "connection unregistered");
        }
        removed
    }

    /// Deliver an event to one connection.
    pub async fn send_to(&self, id: &str, event: ServerEvent) {
        let delivered = {
            let conns = self.conns.read().await;
            match conns.get(id) {
                Some(tx) => tx.send(event).is_ok(),
                None => return,
            }
        };
        if !delivered {
            self.prune(&[id.to_string()]).await;
        }
    }

    /// Deliver an event to every connection, skipping `except` if given.
    pub async fn broadcast(&self, event: ServerEvent, except: Option<&str>) {
        let conns = self.conns.read().await;
        let mut stale: Vec<ConnectionId> = Vec::new();
        for (cid, tx) in conns.iter() {
            if Some(cid.as_str()) == except {
                continue;
            }
            if tx.send(event.clone()).is_err() {
                stale.push(cid.clone());
            }
        }
        drop(conns); // release read lock before write

        if !stale.is_empty() {
            self.prune(&stale).await;
        }
    }

    /// Number of live connections.
    pub async fn len(&self) -> usize {
        self.conns.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conns.read().await.is_empty()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.conns.read().await.contains_key(id)
    }

    async fn prune(&self, stale: &[ConnectionId]) {
        let mut conns = self.conns.write().await;
        for cid in stale {
            if conns.remove(cid).is_some() {
                warn!(conn_id = %cid, "removed stale connection");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
