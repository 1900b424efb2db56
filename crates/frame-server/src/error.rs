//! Server error types.
//!
//! Per-session errors (decode failures, unavailable artifacts, dropped
//! connections) are handled inside the session's own tasks; only
//! [`ServerError::Bind`] and [`ServerError::InvalidConfig`] are fatal.

use std::io::ErrorKind;

use tokio_tungstenite::tungstenite;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The WebSocket connection failed or was reset.
    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Whether this is just the peer going away.
    pub fn is_disconnect(&self) -> bool {
        match self {
            ServerError::Transport(
                tungstenite::Error::ConnectionClosed
                | tungstenite::Error::AlreadyClosed
                | tungstenite::Error::Protocol(
                    tungstenite::error::ProtocolError::ResetWithoutClosingHandshake,
                ),
            ) => true,
            ServerError::Transport(tungstenite::Error::Io(e)) | ServerError::Io(e) => matches!(
                e.kind(),
                ErrorKind::ConnectionReset | ErrorKind::BrokenPipe | ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}
