//! In-memory relay tables. Lives for the lifetime of the process; nothing
//! here is persisted.

use chrono::Utc;
use serde_json::{Map, Value};

use super::types::{
    ClientTable, ObjectId, ObjectTable, OBJECT_ID_PREFIX, PositionUpdate, Transform,
};

/// ClientState table plus ObjectRegistry. Callers guard it with a single
/// lock; see [`super::hub::RelayHub`].
#[derive(Debug, Default)]
pub struct RelayState {
    clients: ClientTable,
    objects: ObjectTable,
}

impl RelayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly connected client at the origin.
    pub fn insert_client(&mut self, id: &str) {
        self.clients.insert(id.to_string(), Transform::default());
    }

    /// Overwrite (or insert) the entry named by the update's id.
    pub fn update_position(&mut self, update: &PositionUpdate) {
        self.clients.insert(update.id.clone(), update.transform());
    }

    /// Drop a client's entry. Returns the removed transform, if any.
    pub fn remove_client(&mut self, id: &str) -> Option<Transform> {
        self.clients.remove(id)
    }

    /// Store a spawned object stamped with the current time and return the
    /// record that was stored.
    pub fn spawn_object(&mut self, data: Value) -> Value {
        self.spawn_object_at(data, Utc::now().timestamp_millis())
    }

    /// Store a spawned object under the id derived from `millis`.
    ///
    /// Spawns sharing a millisecond share an id; the later record replaces
    /// the earlier one in the registry.
    pub fn spawn_object_at(&mut self, data: Value, millis: i64) -> Value {
        let id = object_id(millis);
        let record = object_record(&id, data);
        self.objects.insert(id, record.clone());
        record
    }

    pub fn clients(&self) -> &ClientTable {
        &self.clients
    }

    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

/// `object_<millis>`.
pub fn object_id(millis: i64) -> ObjectId {
    format!("{OBJECT_ID_PREFIX}{millis}")
}

/// Attach the generated id to a spawn payload. Non-object payloads are
/// wrapped under `data`.
fn object_record(id: &str, data: Value) -> Value {
    match data {
        Value::Object(mut fields) => {
            fields.insert("id".to_string(), Value::String(id.to_string()));
            Value::Object(fields)
        }
        other => {
            let mut fields = Map::new();
            fields.insert("id".to_string(), Value::String(id.to_string()));
            fields.insert("data".to_string(), other);
            Value::Object(fields)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
