//! frame-core
//!
//! Transport-agnostic session logic:
//! - control actions
//! - per-session frame counter state
//! - artifact sources (the generation backend boundary)
//! - the action processor tying them together

pub mod action;
pub mod artifact;
pub mod error;
pub mod messages;
pub mod processor;
pub mod session;

pub use action::{Action, InvalidAction};
pub use artifact::{ArtifactPattern, ArtifactRef, ArtifactSource, InvalidPattern, RotatingSource};
pub use error::SourceError;
pub use messages::{FrameUpdate, ServerEvent};
pub use processor::ActionProcessor;
pub use session::SessionState;
