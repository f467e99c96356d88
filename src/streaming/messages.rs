//! Wire message types for the WebSocket event stream
//!
//! Every message is a JSON text frame of the shape
//! `{"action": "CREATE"|"UPDATE"|"DELETE", "payload": {...}}`.
//!
//! Touch payloads carry the transient protocol id. Tag payloads deliberately
//! put the stable tag id in the `id` field: clients key on logical marker
//! identity, not on the tracker's session id.

use crate::types::TrackedObject;
use serde::{Deserialize, Serialize};

/// Event action kind
///
/// Also used internally to classify reconciler actions before resolution;
/// the external and internal vocabularies are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
}

/// JSON payload for one tracked object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventPayload {
    #[serde(rename = "TOUCH")]
    Touch { id: i32, x: f32, y: f32 },
    #[serde(rename = "TAG")]
    Tag { id: i32, x: f32, y: f32, angle: f32 },
}

impl From<&TrackedObject> for EventPayload {
    fn from(object: &TrackedObject) -> Self {
        match object {
            TrackedObject::Touch(t) => Self::Touch {
                id: t.id,
                x: t.x,
                y: t.y,
            },
            TrackedObject::Tag(t) => Self::Tag {
                id: t.tag_id,
                x: t.x,
                y: t.y,
                angle: t.angle,
            },
        }
    }
}

/// One event pushed to every connected subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub action: EventKind,
    pub payload: EventPayload,
}

impl EventMessage {
    /// Serialize to the JSON text sent over the wire
    pub fn to_json(&self) -> crate::error::Result<String> {
        serde_json::to_string(self).map_err(|e| crate::error::Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaggedObject;
    use serde_json::json;

    #[test]
    fn test_touch_create_json_shape() {
        let msg = EventMessage {
            action: EventKind::Create,
            payload: EventPayload::Touch {
                id: 5,
                x: 0.1,
                y: 0.2,
            },
        };
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "action": "CREATE",
                "payload": {"type": "TOUCH", "id": 5, "x": 0.1, "y": 0.2}
            })
        );
    }

    #[test]
    fn test_tag_payload_uses_tag_id() {
        let object = TrackedObject::Tag(TaggedObject {
            id: 9,
            tag_id: 42,
            x: 1.0,
            y: 1.0,
            angle: 0.5,
        });
        let payload = EventPayload::from(&object);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["type"], "TAG");
        assert_eq!(value["angle"], 0.5);
    }

    #[test]
    fn test_action_names_are_uppercase() {
        for (kind, name) in [
            (EventKind::Create, "\"CREATE\""),
            (EventKind::Update, "\"UPDATE\""),
            (EventKind::Delete, "\"DELETE\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), name);
        }
    }
}
