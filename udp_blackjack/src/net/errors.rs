//! Errors for reading and writing protocol datagrams.

use thiserror::Error;

use crate::game::entities::ParseCardError;

/// Errors that can occur while decoding or encoding a datagram.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The datagram isn't valid UTF-8 text.
    #[error("datagram is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Message size exceeded the UDP payload limit.
    #[error("message size {actual} exceeds maximum {max}")]
    MessageTooLarge { actual: usize, max: usize },

    /// A server message with a prefix the client doesn't know.
    #[error("unknown message: {0}")]
    UnknownMessage(String),

    #[error("bad card: {0}")]
    BadCard(#[from] ParseCardError),

    #[error("bad points value: {0}")]
    BadPoints(#[from] std::num::ParseIntError),
}

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
