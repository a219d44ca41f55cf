use std::fmt::Display;

use super::errors::{ProtocolError, Result};

/// Largest payload a single UDP datagram can carry over IPv4.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Receive buffer size. Anything longer is truncated by the socket.
pub const RECV_BUFFER_SIZE: usize = 64 * 1024;

/// Decode a received datagram into trimmed text. Invalid UTF-8 is rejected
/// rather than replaced.
pub fn decode_datagram(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes)?;
    Ok(text.trim())
}

/// Render a message as datagram bytes, refusing anything that can't fit in
/// one datagram.
pub fn encode_datagram<T: Display>(message: &T) -> Result<Vec<u8>> {
    let encoded = message.to_string().into_bytes();
    if encoded.len() > MAX_DATAGRAM_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            actual: encoded.len(),
            max: MAX_DATAGRAM_SIZE,
        });
    }
    Ok(encoded)
}
