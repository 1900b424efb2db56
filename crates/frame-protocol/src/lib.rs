//! frame-protocol
//!
//! Wire-level encoding/decoding for the control channel.
//!
//! This crate turns logical messages (`frame_core::Action` in,
//! `frame_core::ServerEvent` out) into JSON text frames and back.
//!
//! - [`wire_types`] : serde shapes of the JSON messages
//! - [`json_codec`] : decode inbound / encode outbound

pub mod json_codec;
pub mod wire_types;

pub use json_codec::{decode_client, decode_server, encode_server, Inbound, ProtocolError};
