//! Registry of live sessions.
//!
//! Maps each connected [`SessionId`] to the outbound channel of its
//! writer task. The registry is the only state shared between session
//! tasks; everything else a session owns lives in its own tasks.
//!
//! Delivery goes through [`SessionRegistry::send_to`], so once a session
//! is removed any late frame for it is silently dropped.

use std::collections::HashMap;
use std::sync::Arc;

use frame_core::ServerEvent;
use tokio::sync::RwLock;

use crate::types::{OutboundTx, SessionId};

/// Cloneable handle to the set of live sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, OutboundTx>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry::default()
    }

    /// Register a session. Replaces any previous entry for the same id.
    pub async fn add(&self, id: SessionId, tx: OutboundTx) {
        self.sessions.write().await.insert(id, tx);
    }

    /// Unregister a session. Dropping its sender lets the writer task finish.
    pub async fn remove(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop every session, letting all writer tasks wind down.
    pub async fn clear(&self) -> usize {
        let mut guard = self.sessions.write().await;
        let n = guard.len();
        guard.clear();
        n
    }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Deliver an event to one session.
    ///
    /// Returns `false` if the session is gone; that is not an error.
    pub async fn send_to(&self, id: SessionId, event: ServerEvent) -> bool {
        let guard = self.sessions.read().await;
        match guard.get(&id) {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Deliver an event to every live session; returns how many accepted it.
    pub async fn broadcast(&self, event: ServerEvent) -> usize {
        let guard = self.sessions.read().await;
        guard
            .values()
            .filter(|tx| tx.send(event.clone()).is_ok())
            .count()
    }
}
