//! Error types for the core session logic.
//!
//! Everything here is recoverable at the session level: a failed
//! generation never closes the connection that asked for it.

use std::time::Duration;

/// Failure reported by an [`ArtifactSource`](crate::ArtifactSource).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The backend could not produce an artifact.
    #[error("artifact source unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer within the configured bound.
    #[error("artifact source timed out after {0:?}")]
    Timeout(Duration),
}
