//! Artifact sources.
//!
//! An [`ArtifactSource`] is the boundary to whatever produces the
//! visual output for a frame. The server only ever sees it as
//! `Arc<dyn ArtifactSource>`, so a real synthesis backend can replace
//! [`RotatingSource`] without touching session or protocol code.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::action::Action;
use crate::error::SourceError;

/// Reference to a produced artifact (a path or URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRef(pub String);

impl ArtifactRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ArtifactRef {
    fn from(s: String) -> Self {
        ArtifactRef(s)
    }
}

/// Something that turns a frame index (and the action that caused it)
/// into an artifact reference.
///
/// Implementations may be slow; they are awaited from the owning
/// session's task only and must not block other sessions.
pub trait ArtifactSource: Send + Sync {
    fn resolve(&self, index: u64, action: Action) -> BoxFuture<'_, Result<ArtifactRef, SourceError>>;
}

/// Layout of the pre-generated artifact set.
pub const DEFAULT_ARTIFACT_PATTERN: &str = "demo_images/gta_drive/{slot:04}.png";

const SLOT_OPEN: &str = "{slot";

/// Template turning a rotation slot into an artifact reference.
///
/// Exactly one `{slot}` placeholder, optionally zero-padded as
/// `{slot:0N}`; e.g. `demo_images/gta_drive/{slot:04}.png` renders slot 3
/// as `demo_images/gta_drive/0003.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPattern {
    prefix: String,
    width: usize,
    suffix: String,
}

/// A pattern string that cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid artifact pattern {pattern:?}: {reason}")]
pub struct InvalidPattern {
    pub pattern: String,
    pub reason: &'static str,
}

impl ArtifactPattern {
    pub fn render(&self, slot: u64) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            slot,
            self.suffix,
            width = self.width
        )
    }
}

impl Default for ArtifactPattern {
    fn default() -> Self {
        ArtifactPattern {
            prefix: "demo_images/gta_drive/".to_string(),
            width: 4,
            suffix: ".png".to_string(),
        }
    }
}

impl FromStr for ArtifactPattern {
    type Err = InvalidPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| InvalidPattern {
            pattern: s.to_string(),
            reason,
        };

        let start = s
            .find(SLOT_OPEN)
            .ok_or_else(|| invalid("missing {slot} placeholder"))?;
        let rest = &s[start + SLOT_OPEN.len()..];
        let end = rest
            .find('}')
            .ok_or_else(|| invalid("unterminated placeholder"))?;

        let width = match &rest[..end] {
            "" => 0,
            spec => spec
                .strip_prefix(":0")
                .and_then(|w| w.parse::<usize>().ok())
                .ok_or_else(|| invalid("padding must be written as {slot:0N}"))?,
        };

        let suffix = &rest[end + 1..];
        if suffix.contains(SLOT_OPEN) {
            return Err(invalid("more than one placeholder"));
        }

        Ok(ArtifactPattern {
            prefix: s[..start].to_string(),
            width,
            suffix: suffix.to_string(),
        })
    }
}

impl fmt::Display for ArtifactPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            write!(f, "{}{{slot}}{}", self.prefix, self.suffix)
        } else {
            write!(f, "{}{{slot:0{}}}{}", self.prefix, self.width, self.suffix)
        }
    }
}

/// Deterministic stand-in for a generation backend.
///
/// Waits `latency`, then returns the pattern rendered for
/// `index mod count`. The action is accepted but does not influence
/// the result.
#[derive(Debug, Clone)]
pub struct RotatingSource {
    count: u64,
    latency: Duration,
    pattern: ArtifactPattern,
}

impl RotatingSource {
    pub fn new(count: u64, latency: Duration) -> Self {
        RotatingSource {
            count,
            latency,
            pattern: ArtifactPattern::default(),
        }
    }

    pub fn with_pattern(mut self, pattern: ArtifactPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Rotation slot for a frame index.
    pub fn slot(&self, index: u64) -> Option<u64> {
        index.checked_rem(self.count)
    }
}

impl ArtifactSource for RotatingSource {
    fn resolve(&self, index: u64, _action: Action) -> BoxFuture<'_, Result<ArtifactRef, SourceError>> {
        Box::pin(async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            let slot = self
                .slot(index)
                .ok_or_else(|| SourceError::Unavailable("empty artifact set".to_string()))?;
            Ok(ArtifactRef(self.pattern.render(slot)))
        })
    }
}
