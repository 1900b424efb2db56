//! Per-session worker.
//!
//! Each connected session gets one of these tasks. It owns the
//! session's [`SessionState`] and drains the session's action queue in
//! order, so at most one generation cycle is in flight per session and
//! frame updates leave in the order their actions arrived.
//!
//! Results go back through the registry: if the connection has gone
//! away meanwhile, delivery is a no-op and the result is dropped.

use frame_core::{ActionProcessor, ServerEvent, SessionState};
use tracing::{debug, warn};

use crate::registry::SessionRegistry;
use crate::types::{ActionRx, SessionId};

/// Run the processing loop for one session until its queue closes.
pub async fn run_session(
    session_id: SessionId,
    mut action_rx: ActionRx,
    processor: ActionProcessor,
    registry: SessionRegistry,
) {
    let mut state = SessionState::new();

    while let Some(action) = action_rx.recv().await {
        // Queued actions of a closed connection are not worth generating.
        if !registry.contains(session_id).await {
            break;
        }

        match processor.process(&mut state, action).await {
            Ok(Some(update)) => {
                debug!(session = %session_id, frame = update.frame, artifact = %update.artifact_ref, "frame ready");
                if !registry.send_to(session_id, update.into()).await {
                    debug!(session = %session_id, "session gone, dropping frame");
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(session = %session_id, action = %action, frame = state.frame_counter(), error = %e, "generation failed");
                registry
                    .send_to(session_id, ServerEvent::error(e.to_string()))
                    .await;
            }
        }
    }

    debug!(session = %session_id, frames = state.frame_counter(), "session worker finished");
}
