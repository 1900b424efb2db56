//! Action processing.
//!
//! The processor turns one decoded [`Action`] for one session into
//! zero or one [`FrameUpdate`]. It holds no per-session state itself:
//! the caller passes the session's [`SessionState`] by `&mut`, which is
//! what serializes cycles for a session.

use std::sync::Arc;
use std::time::Duration;

use crate::action::Action;
use crate::artifact::{ArtifactRef, ArtifactSource};
use crate::error::SourceError;
use crate::messages::FrameUpdate;
use crate::session::SessionState;

#[derive(Clone)]
pub struct ActionProcessor {
    source: Arc<dyn ArtifactSource>,
    timeout: Option<Duration>,
}

impl ActionProcessor {
    pub fn new(source: Arc<dyn ArtifactSource>) -> Self {
        ActionProcessor {
            source,
            timeout: None,
        }
    }

    /// Bound every generation call; expiry yields [`SourceError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Process a single action for a session.
    ///
    /// - `Action::None` → `Ok(None)`, state untouched.
    /// - effective action → counter advanced, source awaited, then
    ///   `Ok(Some(update))` or the source's error. The processing flag
    ///   is cleared either way; a failed index is not reused.
    pub async fn process(
        &self,
        state: &mut SessionState,
        action: Action,
    ) -> Result<Option<FrameUpdate>, SourceError> {
        let Some(frame) = state.begin(action) else {
            return Ok(None);
        };

        let result = self.resolve(frame, action).await;
        state.finish();

        let artifact_ref = result?;
        Ok(Some(FrameUpdate {
            frame,
            artifact_ref,
            processing: false,
        }))
    }

    async fn resolve(&self, frame: u64, action: Action) -> Result<ArtifactRef, SourceError> {
        let fut = self.source.resolve(frame, action);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| SourceError::Timeout(limit))?,
            None => fut.await,
        }
    }
}

impl std::fmt::Debug for ActionProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionProcessor")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
