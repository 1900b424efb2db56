//! Connection gateway for a single client.
//!
//! One call to [`run_client`] per accepted TCP connection:
//! - performs the WebSocket handshake,
//! - registers the session and queues the `Connected` status,
//! - spawns a writer task (outbound events → socket) and a worker task
//!   (action queue → frame updates),
//! - runs the reader loop (socket → decoded actions) on the current task.
//!
//! A bad message never ends the session; only the transport closing does.

use frame_core::{ActionProcessor, ServerEvent};
use frame_protocol::{decode_client, encode_server, Inbound};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, error, warn};

use crate::error::ServerError;
use crate::registry::SessionRegistry;
use crate::session_task;
use crate::types::{ActionTx, OutboundRx, SessionId};

type WsSink = futures::stream::SplitSink<WebSocketStream<TcpStream>, Message>;
type WsSource = futures::stream::SplitStream<WebSocketStream<TcpStream>>;

/// Run the full lifecycle of one client connection.
pub async fn run_client(
    session_id: SessionId,
    stream: TcpStream,
    processor: ActionProcessor,
    registry: SessionRegistry,
    action_queue_capacity: usize,
) -> Result<(), ServerError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (ws_tx, mut ws_rx) = ws.split();

    // Outbound channel: the registry holds the only sender.
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let _ = out_tx.send(ServerEvent::connected());
    registry.add(session_id, out_tx).await;

    let writer = tokio::spawn(run_writer(session_id, ws_tx, out_rx));

    // Bounded: a client outpacing its worker stalls its own reader only.
    let (action_tx, action_rx) = mpsc::channel(action_queue_capacity);
    tokio::spawn(session_task::run_session(
        session_id,
        action_rx,
        processor,
        registry.clone(),
    ));

    let result = run_reader(session_id, &mut ws_rx, &action_tx, &registry).await;

    // Any in-flight cycle may still finish; its delivery becomes a no-op.
    registry.remove(session_id).await;
    drop(action_tx);
    if let Err(e) = writer.await {
        error!(session = %session_id, error = %e, "writer task panicked");
    }

    result
}

/// Drain outbound events into the socket until the session is removed.
async fn run_writer(session_id: SessionId, mut ws_tx: WsSink, mut out_rx: OutboundRx) {
    while let Some(event) = out_rx.recv().await {
        let text = match encode_server(&event) {
            Ok(text) => text,
            Err(e) => {
                error!(session = %session_id, error = %e, "failed to encode event");
                continue;
            }
        };

        if let Err(e) = ws_tx.send(Message::Text(text)).await {
            debug!(session = %session_id, error = %e, "write failed");
            return;
        }
    }

    let _ = ws_tx.close().await;
}

async fn run_reader(
    session_id: SessionId,
    ws_rx: &mut WsSource,
    action_tx: &ActionTx,
    registry: &SessionRegistry,
) -> Result<(), ServerError> {
    while let Some(msg) = ws_rx.next().await {
        match msg? {
            Message::Text(text) => handle_text(session_id, &text, action_tx, registry).await,
            Message::Close(_) => break,
            Message::Binary(data) => {
                debug!(session = %session_id, len = data.len(), "ignoring binary message");
            }
            // Pings are answered by tungstenite itself.
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }

    Ok(())
}

async fn handle_text(
    session_id: SessionId,
    text: &str,
    action_tx: &ActionTx,
    registry: &SessionRegistry,
) {
    match decode_client(text) {
        Ok(Inbound::Action(action)) => {
            debug!(session = %session_id, action = %action, "action received");
            if action_tx.send(action).await.is_err() {
                warn!(session = %session_id, "session worker stopped, dropping action");
            }
        }
        Ok(Inbound::Ignored(kind)) => {
            debug!(session = %session_id, kind = ?kind, "ignoring message");
        }
        Err(e) => {
            warn!(session = %session_id, error = %e, "dropping undecodable message");
            registry
                .send_to(session_id, ServerEvent::error(e.to_string()))
                .await;
        }
    }
}
