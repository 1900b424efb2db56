//! Serde shapes of the control-channel messages.
//!
//! Client → server:
//!
//! - `{"type":"action","action":"<W|A|S|D|none>"}`
//!
//! Server → client:
//!
//! - `{"type":"status","message":"Connected"}`
//! - `{"type":"frame_update","frame":1,"image_url":"...","processing":false}`
//! - `{"type":"error","message":"..."}`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message type tag carrying a control action.
pub const ACTION_TYPE: &str = "action";

/// Inbound message, kept loose so unknown types can be skipped
/// instead of rejected: neither field is required to be a string
/// until `type` says the message is an action.
#[derive(Debug, Clone, Deserialize)]
pub struct WireInbound {
    #[serde(rename = "type", default)]
    pub kind: Option<Value>,

    #[serde(default)]
    pub action: Option<Value>,
}

/// Outbound message, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireOutbound {
    Status {
        message: String,
    },
    FrameUpdate {
        frame: u64,
        image_url: String,
        processing: bool,
    },
    Error {
        message: String,
    },
}
