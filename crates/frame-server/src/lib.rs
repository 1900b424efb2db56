//! frame-server
//!
//! Multi-client async WebSocket server streaming generated frames,
//! plus the independent static asset server.

pub mod assets;
pub mod config;
pub mod error;
pub mod page;
pub mod registry;
pub mod server;
pub mod types;

// these are internal modules, not re-exported
mod client;
mod session_task;

pub use config::Config;
pub use error::ServerError;
pub use registry::SessionRegistry;
pub use server::Server;
