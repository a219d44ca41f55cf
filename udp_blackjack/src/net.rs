//! Networking layer for client-server communication.
//!
//! Plain-text commands and notices over UDP, one message per datagram.
//! The server runs on tokio with a single receiver task.

/// UDP client for talking to a round server.
pub mod client;

/// Protocol errors.
pub mod errors;

/// Command and notice types, with their wire text.
pub mod messages;

/// Receiver loop, command routing and delivery.
pub mod server;

/// Datagram encoding and decoding.
pub mod utils;
