//! JSON codec for the control channel.

use frame_core::{Action, ArtifactRef, FrameUpdate, InvalidAction, ServerEvent};
use serde_json::Value;

use crate::wire_types::{WireInbound, WireOutbound, ACTION_TYPE};

/// Errors that can occur while decoding or encoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Payload is not valid JSON.
    #[error("malformed message: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Valid JSON, but not an object.
    #[error("message is not a JSON object")]
    NotAnObject,

    /// `"type":"action"` without an `action` field.
    #[error("action message without an action")]
    MissingAction,

    /// `action` is not one of the known controls.
    #[error(transparent)]
    InvalidAction(#[from] InvalidAction),

    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Action(Action),

    /// Any message whose `type` is not `"action"` (or is missing),
    /// carrying the `type` as sent, JSON-encoded if it was not a string.
    Ignored(Option<String>),
}

/// Decode one text frame from a client.
pub fn decode_client(text: &str) -> Result<Inbound, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;
    if !value.is_object() {
        return Err(ProtocolError::NotAnObject);
    }
    let wire: WireInbound = serde_json::from_value(value).map_err(ProtocolError::Malformed)?;

    match wire.kind {
        Some(Value::String(kind)) if kind == ACTION_TYPE => match wire.action {
            Some(Value::String(raw)) => Ok(Inbound::Action(raw.parse()?)),
            None | Some(Value::Null) => Err(ProtocolError::MissingAction),
            Some(other) => Err(InvalidAction(other.to_string()).into()),
        },
        Some(Value::String(kind)) => Ok(Inbound::Ignored(Some(kind))),
        other => Ok(Inbound::Ignored(other.map(|v| v.to_string()))),
    }
}

/// Encode one server event as a text frame.
pub fn encode_server(event: &ServerEvent) -> Result<String, ProtocolError> {
    serde_json::to_string(&to_wire(event)).map_err(ProtocolError::Encode)
}

/// Decode a server text frame. Used by clients and tests.
pub fn decode_server(text: &str) -> Result<ServerEvent, ProtocolError> {
    let wire: WireOutbound = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;
    Ok(from_wire(wire))
}

fn to_wire(event: &ServerEvent) -> WireOutbound {
    match event {
        ServerEvent::Status { message } => WireOutbound::Status {
            message: message.clone(),
        },
        ServerEvent::FrameUpdate(update) => WireOutbound::FrameUpdate {
            frame: update.frame,
            image_url: update.artifact_ref.to_string(),
            processing: update.processing,
        },
        ServerEvent::Error { message } => WireOutbound::Error {
            message: message.clone(),
        },
    }
}

fn from_wire(wire: WireOutbound) -> ServerEvent {
    match wire {
        WireOutbound::Status { message } => ServerEvent::Status { message },
        WireOutbound::FrameUpdate {
            frame,
            image_url,
            processing,
        } => ServerEvent::FrameUpdate(FrameUpdate {
            frame,
            artifact_ref: ArtifactRef(image_url),
            processing,
        }),
        WireOutbound::Error { message } => ServerEvent::Error { message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn decodes_actions() {
        assert_eq!(
            decode_client(r#"{"type":"action","action":"W"}"#).unwrap(),
            Inbound::Action(Action::Forward)
        );
        assert_eq!(
            decode_client(r#"{"type":"action","action":"none"}"#).unwrap(),
            Inbound::Action(Action::None)
        );
    }

    #[test]
    fn other_types_are_ignored() {
        assert_eq!(
            decode_client(r#"{"type":"ping"}"#).unwrap(),
            Inbound::Ignored(Some("ping".into()))
        );
        assert_eq!(
            decode_client(r#"{"action":"W"}"#).unwrap(),
            Inbound::Ignored(None)
        );
    }

    #[test]
    fn non_string_type_or_stray_action_is_ignored() {
        assert_eq!(
            decode_client(r#"{"type":5}"#).unwrap(),
            Inbound::Ignored(Some("5".into()))
        );
        assert_eq!(
            decode_client(r#"{"type":"telemetry","action":{"x":1}}"#).unwrap(),
            Inbound::Ignored(Some("telemetry".into()))
        );
        assert_eq!(
            decode_client(r#"{"type":null,"action":"W"}"#).unwrap(),
            Inbound::Ignored(Some("null".into()))
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            decode_client("{not json"),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            decode_client(r#"["action","W"]"#),
            Err(ProtocolError::NotAnObject)
        ));
    }

    #[test]
    fn bad_action_values() {
        assert!(matches!(
            decode_client(r#"{"type":"action"}"#),
            Err(ProtocolError::MissingAction)
        ));
        assert!(matches!(
            decode_client(r#"{"type":"action","action":"Q"}"#),
            Err(ProtocolError::InvalidAction(_))
        ));
        assert!(matches!(
            decode_client(r#"{"type":"action","action":null}"#),
            Err(ProtocolError::MissingAction)
        ));
        assert!(matches!(
            decode_client(r#"{"type":"action","action":1}"#),
            Err(ProtocolError::InvalidAction(_))
        ));
    }

    #[test]
    fn encodes_wire_shapes() {
        let status: Value =
            serde_json::from_str(&encode_server(&ServerEvent::connected()).unwrap()).unwrap();
        assert_eq!(status, json!({"type": "status", "message": "Connected"}));

        let update = ServerEvent::FrameUpdate(FrameUpdate {
            frame: 7,
            artifact_ref: ArtifactRef("frames/frame_7.svg".into()),
            processing: false,
        });
        let text = encode_server(&update).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "frame_update",
                "frame": 7,
                "image_url": "frames/frame_7.svg",
                "processing": false
            })
        );
        assert_eq!(decode_server(&text).unwrap(), update);

        let err: Value =
            serde_json::from_str(&encode_server(&ServerEvent::error("boom")).unwrap()).unwrap();
        assert_eq!(err, json!({"type": "error", "message": "boom"}));
    }
}
