//! Configuration for the frame server.
//!
//! Every option can be given on the command line or through an
//! environment variable:
//!
//! - `FRAME_BIND_ADDR`             (default: "0.0.0.0")
//! - `FRAME_CONTROL_PORT`          (default: 8765)
//! - `FRAME_ASSET_PORT`            (default: 3000)
//! - `FRAME_ARTIFACT_COUNT`        (default: 10)
//! - `FRAME_ARTIFACT_PATTERN`      (default: "demo_images/gta_drive/{slot:04}.png")
//! - `FRAME_GENERATE_PLACEHOLDERS` (default: off)
//! - `FRAME_LATENCY_MS`            (default: 300)
//! - `FRAME_GENERATION_TIMEOUT_MS` (default: 5000, 0 = unbounded)
//! - `FRAME_MAX_CLIENTS`           (default: 1024)
//! - `FRAME_ACTION_QUEUE`          (default: 32)
//! - `FRAME_ASSET_DIR`             (default: ".")
//! - `FRAME_LOG`                   (default: "info")

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use frame_core::artifact::DEFAULT_ARTIFACT_PATTERN;
use frame_core::ArtifactPattern;

use crate::assets::sanitize;
use crate::error::ServerError;

/// Server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "frame-server")]
#[command(about = "Streams generated frames to clients over a WebSocket control channel")]
pub struct Config {
    /// IP address / interface to bind both listeners to.
    #[arg(long, env = "FRAME_BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: String,

    /// WebSocket control-channel port.
    #[arg(long, env = "FRAME_CONTROL_PORT", default_value_t = 8765)]
    pub control_port: u16,

    /// Static asset (HTTP) port.
    #[arg(long, env = "FRAME_ASSET_PORT", default_value_t = 3000)]
    pub asset_port: u16,

    /// Number of artifacts in the rotation.
    #[arg(long, env = "FRAME_ARTIFACT_COUNT", default_value_t = 10)]
    pub artifact_count: u64,

    /// Artifact reference template; `{slot}` or `{slot:0N}` is replaced by
    /// the rotation slot.
    #[arg(long, env = "FRAME_ARTIFACT_PATTERN", default_value = DEFAULT_ARTIFACT_PATTERN)]
    pub artifact_pattern: ArtifactPattern,

    /// Write placeholder SVGs for missing artifacts under the asset directory
    /// at startup. Requires a relative `.svg` pattern.
    #[arg(long, env = "FRAME_GENERATE_PLACEHOLDERS")]
    pub generate_placeholders: bool,

    /// Simulated generation latency in milliseconds.
    #[arg(long, env = "FRAME_LATENCY_MS", default_value_t = 300)]
    pub latency_ms: u64,

    /// Upper bound on one generation call in milliseconds; 0 disables it.
    #[arg(long, env = "FRAME_GENERATION_TIMEOUT_MS", default_value_t = 5000)]
    pub generation_timeout_ms: u64,

    /// Maximum number of simultaneously connected clients.
    #[arg(long, env = "FRAME_MAX_CLIENTS", default_value_t = 1024)]
    pub max_clients: usize,

    /// Actions a session may have queued before its reader waits.
    #[arg(long, env = "FRAME_ACTION_QUEUE", default_value_t = 32)]
    pub action_queue_capacity: usize,

    /// Directory served by the asset server.
    #[arg(long, env = "FRAME_ASSET_DIR", default_value = ".")]
    pub asset_dir: PathBuf,

    /// Log filter, e.g. "info" or "frame_server=debug".
    #[arg(long, env = "FRAME_LOG", default_value = "info")]
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            control_port: 8765,
            asset_port: 3000,
            artifact_count: 10,
            artifact_pattern: ArtifactPattern::default(),
            generate_placeholders: false,
            latency_ms: 300,
            generation_timeout_ms: 5000,
            max_clients: 1024,
            action_queue_capacity: 32,
            asset_dir: PathBuf::from("."),
            log: "info".to_string(),
        }
    }
}

impl Config {
    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.artifact_count == 0 {
            return Err(ServerError::InvalidConfig(
                "artifact_count must be at least 1".to_string(),
            ));
        }
        if self.control_port != 0 && self.control_port == self.asset_port {
            return Err(ServerError::InvalidConfig(format!(
                "control and asset ports must differ (both {})",
                self.control_port
            )));
        }
        if self.max_clients == 0 {
            return Err(ServerError::InvalidConfig(
                "max_clients must be at least 1".to_string(),
            ));
        }
        if self.action_queue_capacity == 0 {
            return Err(ServerError::InvalidConfig(
                "action_queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.generate_placeholders {
            let sample = self.artifact_pattern.render(0);
            if !sample.ends_with(".svg") || sanitize(&sample).is_none() {
                return Err(ServerError::InvalidConfig(format!(
                    "placeholders are SVG files under the asset directory; \
                     pattern {} must be a relative .svg path",
                    self.artifact_pattern
                )));
            }
        }
        Ok(())
    }

    /// `addr:port` of the control channel.
    pub fn control_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.control_port)
    }

    /// `addr:port` of the asset server.
    pub fn asset_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.asset_port)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn generation_timeout(&self) -> Option<Duration> {
        (self.generation_timeout_ms > 0).then(|| Duration::from_millis(self.generation_timeout_ms))
    }
}
