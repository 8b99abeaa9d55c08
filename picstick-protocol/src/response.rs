//! Responses sent from the programmer to the host
//!
//! Every command cycle produces exactly one response:
//! - `OK:` on success
//! - `OK:` followed by two raw bytes (high, low) for `read`
//! - `ERROR:` followed by the raw bytes that failed validation
//! - `UNKNOWN:` followed by the raw bytes of an unrecognised keyword

use crate::frame::{ProtocolError, INPUT_BUFFER_SIZE, SEPARATOR};
use heapless::Vec;

/// Status written for a successful command
pub const STATUS_OK: &[u8] = b"OK";

/// Status written when a command body fails validation
pub const STATUS_ERROR: &[u8] = b"ERROR";

/// Status written for an unrecognised keyword
pub const STATUS_UNKNOWN: &[u8] = b"UNKNOWN";

/// Largest encoded response: the longest status, the separator and a
/// full input buffer echoed back
pub const MAX_RESPONSE_SIZE: usize = 7 + 1 + INPUT_BUFFER_SIZE;

/// A response to one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response<'a> {
    /// Command succeeded
    Ok,
    /// `read` succeeded with this word
    Word(u16),
    /// Command body failed validation; echoes the received bytes
    Error(&'a [u8]),
    /// Keyword not recognised; echoes the received bytes
    Unknown(&'a [u8]),
}

impl<'a> Response<'a> {
    fn status(&self) -> &'static [u8] {
        match self {
            Response::Ok | Response::Word(_) => STATUS_OK,
            Response::Error(_) => STATUS_ERROR,
            Response::Unknown(_) => STATUS_UNKNOWN,
        }
    }

    /// Encoded length in bytes
    pub fn encoded_len(&self) -> usize {
        let payload = match self {
            Response::Ok => 0,
            Response::Word(_) => 2,
            Response::Error(echo) | Response::Unknown(echo) => echo.len(),
        };
        self.status().len() + 1 + payload
    }

    /// Encode this response into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, ProtocolError> {
        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(ProtocolError::BufferTooSmall);
        }

        let status = self.status();
        buffer[..status.len()].copy_from_slice(status);
        buffer[status.len()] = SEPARATOR;
        let payload = &mut buffer[status.len() + 1..len];

        match self {
            Response::Ok => {}
            Response::Word(word) => payload.copy_from_slice(&word.to_be_bytes()),
            Response::Error(echo) | Response::Unknown(echo) => payload.copy_from_slice(echo),
        }

        Ok(len)
    }

    /// Encode this response into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_RESPONSE_SIZE>, ProtocolError> {
        let mut buffer = [0u8; MAX_RESPONSE_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| ProtocolError::BufferTooSmall)?;
        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok() {
        let encoded = Response::Ok.encode_to_vec().unwrap();
        assert_eq!(&encoded[..], b"OK:");
    }

    #[test]
    fn test_word_is_big_endian() {
        let encoded = Response::Word(0x3FA5).encode_to_vec().unwrap();
        assert_eq!(&encoded[..], &[b'O', b'K', b':', 0x3F, 0xA5]);
    }

    #[test]
    fn test_error_echoes_bytes() {
        let echo = [0x00, 0x10, b'X', 0xAB, 0xCD];
        let encoded = Response::Error(&echo).encode_to_vec().unwrap();
        assert_eq!(&encoded[..6], b"ERROR:");
        assert_eq!(&encoded[6..], &echo);
    }

    #[test]
    fn test_unknown_echoes_bytes() {
        let encoded = Response::Unknown(b"flash").encode_to_vec().unwrap();
        assert_eq!(&encoded[..], b"UNKNOWN:flash");
    }

    #[test]
    fn test_empty_echo() {
        let encoded = Response::Error(&[]).encode_to_vec().unwrap();
        assert_eq!(&encoded[..], b"ERROR:");
    }

    #[test]
    fn test_full_buffer_echo_fits() {
        let echo = [0x55u8; INPUT_BUFFER_SIZE];
        let encoded = Response::Unknown(&echo).encode_to_vec().unwrap();
        assert_eq!(encoded.len(), MAX_RESPONSE_SIZE);
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buffer = [0u8; 4];
        assert_eq!(
            Response::Word(1).encode(&mut buffer),
            Err(ProtocolError::BufferTooSmall)
        );
    }
}
