//! Shared command input buffer

use picstick_protocol::INPUT_BUFFER_SIZE;

/// Input buffer reused by every command
///
/// Never cleared between commands. Callers only ever look at the bytes
/// the current read reported, through [`filled`](Self::filled).
pub struct InputBuffer {
    bytes: [u8; INPUT_BUFFER_SIZE],
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBuffer {
    /// Create a zeroed buffer
    pub const fn new() -> Self {
        Self {
            bytes: [0; INPUT_BUFFER_SIZE],
        }
    }

    /// Total capacity in bytes
    pub const fn capacity(&self) -> usize {
        INPUT_BUFFER_SIZE
    }

    /// Writable window over the first `len` bytes (clamped to capacity)
    pub fn window_mut(&mut self, len: usize) -> &mut [u8] {
        let len = len.min(INPUT_BUFFER_SIZE);
        &mut self.bytes[..len]
    }

    /// The whole buffer, for reads bounded only by capacity
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// The first `len` bytes (clamped to capacity)
    pub fn filled(&self, len: usize) -> &[u8] {
        &self.bytes[..len.min(INPUT_BUFFER_SIZE)]
    }
}
