//! WebSocket wire format. Every frame is `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::relay::types::{ClientTable, ObjectTable, PositionUpdate};

// ---------------------------------------------------------------------------
// Client → Server events
// ---------------------------------------------------------------------------

/// Raw inbound frame before the event name is resolved.
#[derive(Debug, Deserialize)]
struct InboundFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Events a client can send.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    MoveModel(Value),
    DrawLine(Value),
    PointerMoved(Value),
    UpdatePosition(PositionUpdate),
    Message(Value),
    SpawnObject(Value),
    Ping,
}

/// Reasons an inbound frame is dropped. Never reported to the client.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    InvalidFrame(#[source] serde_json::Error),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("invalid payload for {event}: {source}")]
    InvalidPayload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientEvent {
    /// Decode one text frame.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let frame: InboundFrame =
            serde_json::from_str(text).map_err(ProtocolError::InvalidFrame)?;

        let event = match frame.event.as_str() {
            "move_model" => ClientEvent::MoveModel(frame.data),
            "draw_line" => ClientEvent::DrawLine(frame.data),
            "pointer_moved" => ClientEvent::PointerMoved(frame.data),
            "updatePosition" => {
                let update = serde_json::from_value(frame.data).map_err(|source| {
                    ProtocolError::InvalidPayload {
                        event: "updatePosition",
                        source,
                    }
                })?;
                ClientEvent::UpdatePosition(update)
            }
            "message" => ClientEvent::Message(frame.data),
            "spawnObject" => ClientEvent::SpawnObject(frame.data),
            "ping" => ClientEvent::Ping,
            _ => return Err(ProtocolError::UnknownEvent(frame.event)),
        };
        Ok(event)
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::MoveModel(_) => "move_model",
            ClientEvent::DrawLine(_) => "draw_line",
            ClientEvent::PointerMoved(_) => "pointer_moved",
            ClientEvent::UpdatePosition(_) => "updatePosition",
            ClientEvent::Message(_) => "message",
            ClientEvent::SpawnObject(_) => "spawnObject",
            ClientEvent::Ping => "ping",
        }
    }
}

// ---------------------------------------------------------------------------
// Server → Client events
// ---------------------------------------------------------------------------

/// Events pushed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "connected")]
    Connected(ConnectedPayload),
    #[serde(rename = "model_moved")]
    ModelMoved(Value),
    #[serde(rename = "line_drawn")]
    LineDrawn(Value),
    #[serde(rename = "pointer_updated")]
    PointerUpdated(Value),
    #[serde(rename = "updatePositions")]
    UpdatePositions(ClientTable),
    #[serde(rename = "initialObjectPositions")]
    InitialObjectPositions(ObjectTable),
    #[serde(rename = "message")]
    Message(Value),
    #[serde(rename = "spawnObject")]
    SpawnObject(Value),
    #[serde(rename = "pong")]
    Pong(PongPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectedPayload {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongPayload {
    pub timestamp: i64,
}

impl ServerEvent {
    pub fn connected(id: &str) -> Self {
        ServerEvent::Connected(ConnectedPayload { id: id.to_string() })
    }

    pub fn pong() -> Self {
        ServerEvent::Pong(PongPayload {
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connected(_) => "connected",
            ServerEvent::ModelMoved(_) => "model_moved",
            ServerEvent::LineDrawn(_) => "line_drawn",
            ServerEvent::PointerUpdated(_) => "pointer_updated",
            ServerEvent::UpdatePositions(_) => "updatePositions",
            ServerEvent::InitialObjectPositions(_) => "initialObjectPositions",
            ServerEvent::Message(_) => "message",
            ServerEvent::SpawnObject(_) => "spawnObject",
            ServerEvent::Pong(_) => "pong",
        }
    }

    /// Serialize to JSON text for sending over WebSocket.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"event":"error","data":"serialization failed"}"#.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::types::{Transform, Vector3};
    use serde_json::json;

    fn parsed(evt: &ServerEvent) -> Value {
        serde_json::from_str(&evt.to_json()).unwrap()
    }

    #[test]
    fn relay_events_keep_payload_verbatim() {
        let cmd = ClientEvent::parse(r#"{"event":"pointer_moved","data":{"x":1,"y":2}}"#).unwrap();
        assert_eq!(cmd, ClientEvent::PointerMoved(json!({"x": 1, "y": 2})));

        let cmd = ClientEvent::parse(r#"{"event":"draw_line","data":[[0,0,0],[1,1,1]]}"#).unwrap();
        assert_eq!(cmd, ClientEvent::DrawLine(json!([[0, 0, 0], [1, 1, 1]])));
    }

    #[test]
    fn missing_data_decodes_as_null() {
        let cmd = ClientEvent::parse(r#"{"event":"move_model"}"#).unwrap();
        assert_eq!(cmd, ClientEvent::MoveModel(Value::Null));
    }

    #[test]
    fn update_position_decodes_typed_payload() {
        let text = r#"{"event":"updatePosition","data":{"id":"c1","position":{"x":1,"y":2,"z":3},"rotation":{"x":0,"y":0.5,"z":0}}}"#;
        match ClientEvent::parse(text).unwrap() {
            ClientEvent::UpdatePosition(update) => {
                assert_eq!(update.id, "c1");
                assert_eq!(update.position, Vector3::new(1.0, 2.0, 3.0));
                assert_eq!(update.rotation.y, 0.5);
            }
            other => panic!("expected UpdatePosition, got {other:?}"),
        }
    }

    #[test]
    fn update_position_without_id_is_rejected() {
        let err = ClientEvent::parse(r#"{"event":"updatePosition","data":{}}"#).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidPayload {
                event: "updatePosition",
                ..
            }
        ));
    }

    #[test]
    fn ping_decodes() {
        assert_eq!(ClientEvent::parse(r#"{"event":"ping"}"#).unwrap(), ClientEvent::Ping);
    }

    #[test]
    fn unknown_event_is_rejected() {
        let err = ClientEvent::parse(r#"{"event":"teleport","data":1}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownEvent(name) if name == "teleport"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            ClientEvent::parse("not json"),
            Err(ProtocolError::InvalidFrame(_))
        ));
        assert!(matches!(
            ClientEvent::parse(r#"{"data":1}"#),
            Err(ProtocolError::InvalidFrame(_))
        ));
    }

    #[test]
    fn client_event_names_match_wire() {
        let cmd = ClientEvent::parse(r#"{"event":"spawnObject","data":{}}"#).unwrap();
        assert_eq!(cmd.name(), "spawnObject");
    }

    #[test]
    fn relayed_events_use_renamed_names() {
        let json = parsed(&ServerEvent::ModelMoved(json!({"a": 1})));
        assert_eq!(json["event"], "model_moved");
        assert_eq!(json["data"]["a"], 1);

        assert_eq!(parsed(&ServerEvent::LineDrawn(Value::Null))["event"], "line_drawn");
        assert_eq!(
            parsed(&ServerEvent::PointerUpdated(Value::Null))["event"],
            "pointer_updated"
        );
    }

    #[test]
    fn update_positions_serializes_full_table() {
        let mut table = ClientTable::new();
        table.insert("c1".into(), Transform::default());
        table.insert(
            "c2".into(),
            Transform::new(Vector3::new(1.0, 0.0, 0.0), Vector3::ZERO),
        );
        let json = parsed(&ServerEvent::UpdatePositions(table));
        assert_eq!(json["event"], "updatePositions");
        assert_eq!(json["data"]["c1"]["position"]["x"], 0.0);
        assert_eq!(json["data"]["c2"]["position"]["x"], 1.0);
    }

    #[test]
    fn initial_object_positions_serializes_empty_registry_as_object() {
        let json = parsed(&ServerEvent::InitialObjectPositions(ObjectTable::new()));
        assert_eq!(json["event"], "initialObjectPositions");
        assert_eq!(json["data"], json!({}));
    }

    #[test]
    fn connected_and_pong_serialize() {
        let json = parsed(&ServerEvent::connected("abc"));
        assert_eq!(json["event"], "connected");
        assert_eq!(json["data"]["id"], "abc");

        let json = parsed(&ServerEvent::pong());
        assert_eq!(json["event"], "pong");
        assert!(json["data"]["timestamp"].is_number());
    }

    #[test]
    fn server_event_name_matches_serialized_tag() {
        let evt = ServerEvent::SpawnObject(json!({"id": "object_1"}));
        assert_eq!(parsed(&evt)["event"], evt.name());
    }
}
