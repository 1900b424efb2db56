//! TCP listener and top-level control-channel wiring.
//!
//! This module:
//! - Binds the configured control address.
//! - Accepts new TCP connections.
//! - Assigns each connection a `SessionId`.
//! - Spawns one task per connection running the gateway in `client`.
//!
//! The server owns the [`SessionRegistry`] for its whole lifetime and
//! hands clones of it to each connection task.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use frame_core::{ActionProcessor, ArtifactSource};
use futures::FutureExt;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::client;
use crate::config::Config;
use crate::error::ServerError;
use crate::registry::SessionRegistry;
use crate::types::SessionId;

/// A bound control-channel server.
pub struct Server {
    listener: TcpListener,
    max_clients: usize,
    action_queue_capacity: usize,
    processor: ActionProcessor,
    registry: SessionRegistry,
    next_session_id: u64,
}

impl Server {
    /// Bind the control listener and prepare the action processor.
    pub async fn bind(config: &Config, source: Arc<dyn ArtifactSource>) -> Result<Self, ServerError> {
        let addr = config.control_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        let mut processor = ActionProcessor::new(source);
        if let Some(limit) = config.generation_timeout() {
            processor = processor.with_timeout(limit);
        }

        Ok(Server {
            listener,
            max_clients: config.max_clients,
            action_queue_capacity: config.action_queue_capacity.max(1),
            processor,
            registry: SessionRegistry::new(),
            next_session_id: 1,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle to the live session set.
    pub fn registry(&self) -> SessionRegistry {
        self.registry.clone()
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Connection tasks still running at shutdown are aborted.
    pub async fn run<F>(mut self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        info!(addr = %self.local_addr()?, "control channel listening");
        tokio::pin!(shutdown);

        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                _ = &mut shutdown => break,

                Some(_) = connections.join_next(), if !connections.is_empty() => {}

                accepted = self.listener.accept() => {
                    let (stream, peer_addr) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                            continue;
                        }
                    };

                    // Count every live connection task, including ones still
                    // in the handshake and not yet registered.
                    while let Some(Some(_)) = connections.join_next().now_or_never() {}
                    if connections.len() >= self.max_clients {
                        warn!(peer = %peer_addr, max_clients = self.max_clients, "rejecting connection: max_clients reached");
                        // Just drop the stream; client will see the connection closed.
                        continue;
                    }

                    let session_id = self.next_session_id();
                    info!(session = %session_id, peer = %peer_addr, "accepted connection");

                    let processor = self.processor.clone();
                    let registry = self.registry.clone();
                    let capacity = self.action_queue_capacity;
                    connections.spawn(async move {
                        match client::run_client(session_id, stream, processor, registry, capacity).await {
                            Ok(()) => info!(session = %session_id, "client disconnected"),
                            Err(e) if e.is_disconnect() => {
                                info!(session = %session_id, "client dropped connection")
                            }
                            Err(e) => warn!(session = %session_id, error = %e, "client error"),
                        }
                    });
                }
            }
        }

        info!(sessions = connections.len(), "control channel shutting down");
        connections.shutdown().await;
        self.registry.clear().await;
        debug!("all connection tasks stopped");
        Ok(())
    }

    fn next_session_id(&mut self) -> SessionId {
        let id = SessionId(self.next_session_id);
        self.next_session_id += 1;
        id
    }
}
