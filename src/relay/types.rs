use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier for one live connection.
pub type ConnectionId = String;

/// Identifier of a spawned object (`object_<unix millis>`).
pub type ObjectId = String;

/// Prefix shared by every generated object id.
pub const OBJECT_ID_PREFIX: &str = "object_";

/// Connection id → last known transform.
pub type ClientTable = BTreeMap<String, Transform>;

/// Object id → stored spawn record.
pub type ObjectTable = BTreeMap<ObjectId, serde_json::Value>;

// ---------------------------------------------------------------------------
// Vector3 / Transform
// ---------------------------------------------------------------------------

/// A point or Euler rotation in 3D space. Missing components decode as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }
}

/// Spatial transform recorded per client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vector3,
    pub rotation: Vector3,
}

impl Transform {
    pub fn new(position: Vector3, rotation: Vector3) -> Self {
        Transform { position, rotation }
    }
}

/// Payload of an inbound `updatePosition` event.
///
/// `id` is taken from the client as-is and is not checked against the
/// sender's own connection id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PositionUpdate {
    pub id: String,
    #[serde(default)]
    pub position: Vector3,
    #[serde(default)]
    pub rotation: Vector3,
}

impl PositionUpdate {
    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
