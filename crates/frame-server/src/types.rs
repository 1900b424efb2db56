//! Shared types for the frame server.
//!
//! This module defines:
//! - `SessionId`: a lightweight handle for connected clients
//! - channel aliases between a session's reader, worker and writer tasks

use std::fmt;

use frame_core::{Action, ServerEvent};
use tokio::sync::mpsc;

/// Identifier for a connected session.
///
/// This is intentionally opaque; we just guarantee uniqueness
/// over the lifetime of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound events to a given session's writer task.
pub type OutboundTx = mpsc::UnboundedSender<ServerEvent>;
pub type OutboundRx = mpsc::UnboundedReceiver<ServerEvent>;

/// Bounded FIFO queue of decoded actions for one session's worker task.
pub type ActionTx = mpsc::Sender<Action>;
pub type ActionRx = mpsc::Receiver<Action>;
