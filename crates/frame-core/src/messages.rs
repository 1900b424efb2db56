//! Events produced for a session.
//!
//! These are **transport-agnostic**; the JSON encoding lives in the
//! `frame-protocol` crate.

use crate::artifact::ArtifactRef;

/// Status text sent right after the handshake.
pub const CONNECTED_STATUS: &str = "Connected";

/// A newly produced artifact for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameUpdate {
    /// Session frame counter after the increment.
    pub frame: u64,

    /// Where the client can fetch the artifact.
    pub artifact_ref: ArtifactRef,

    /// Whether generation is still ongoing. Always `false` at emission.
    pub processing: bool,
}

/// An event the server delivers to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Lifecycle notification (e.g. "Connected").
    Status { message: String },

    /// Result of one effective action.
    FrameUpdate(FrameUpdate),

    /// A recoverable per-session failure the client should know about.
    Error { message: String },
}

impl ServerEvent {
    pub fn connected() -> Self {
        ServerEvent::Status {
            message: CONNECTED_STATUS.to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }
}

impl From<FrameUpdate> for ServerEvent {
    fn from(update: FrameUpdate) -> Self {
        ServerEvent::FrameUpdate(update)
    }
}
