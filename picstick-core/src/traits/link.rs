//! Byte transport trait

/// Blocking byte transport to the host
pub trait ByteLink {
    /// Send one byte, blocking while the transmit side is full
    fn send_byte(&mut self, byte: u8);

    /// Receive one byte, blocking until one arrives
    ///
    /// Returns `None` only if the link can never deliver another byte.
    /// The software UART never does; this exists so finite byte sources
    /// can report a short read instead of blocking forever.
    fn recv_byte(&mut self) -> Option<u8>;

    /// Check if a received byte is waiting
    fn rx_available(&self) -> bool;

    /// Send every byte of `bytes` in order
    fn send_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.send_byte(byte);
        }
    }

    /// Fill `buf` completely
    ///
    /// Returns the number of bytes stored, which is `buf.len()` unless
    /// the link ran dry.
    fn recv_bytes(&mut self, buf: &mut [u8]) -> usize {
        for (count, slot) in buf.iter_mut().enumerate() {
            match self.recv_byte() {
                Some(byte) => *slot = byte,
                None => return count,
            }
        }
        buf.len()
    }

    /// Receive until `separator` or until `buf` is full
    ///
    /// The separator is consumed but not stored. Returns the number of
    /// bytes stored: less than `buf.len()` when the separator was found,
    /// `buf.len()` when it was not found in time.
    fn recv_bytes_until(&mut self, separator: u8, buf: &mut [u8]) -> usize {
        for (count, slot) in buf.iter_mut().enumerate() {
            match self.recv_byte() {
                Some(byte) if byte == separator => return count,
                Some(byte) => *slot = byte,
                None => return count,
            }
        }
        buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    /// Link fed from a fixed byte script
    struct ScriptLink {
        input: VecDeque<u8>,
        output: Vec<u8>,
    }

    impl ScriptLink {
        fn new(input: &[u8]) -> Self {
            Self {
                input: input.iter().copied().collect(),
                output: Vec::new(),
            }
        }
    }

    impl ByteLink for ScriptLink {
        fn send_byte(&mut self, byte: u8) {
            self.output.push(byte);
        }

        fn recv_byte(&mut self) -> Option<u8> {
            self.input.pop_front()
        }

        fn rx_available(&self) -> bool {
            !self.input.is_empty()
        }
    }

    #[test]
    fn test_until_separator() {
        let mut link = ScriptLink::new(b"hello:rest");
        let mut buf = [0u8; 8];
        let n = link.recv_bytes_until(b':', &mut buf);
        assert_eq!(n, 5);
        assert_eq!(&buf[..n], b"hello");
        // Separator consumed, the rest still queued
        assert_eq!(link.recv_byte(), Some(b'r'));
    }

    #[test]
    fn test_until_no_separator_fills_buffer() {
        let mut link = ScriptLink::new(b"abcdefgh:");
        let mut buf = [0u8; 4];
        assert_eq!(link.recv_bytes_until(b':', &mut buf), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(link.recv_byte(), Some(b'e'));
    }

    #[test]
    fn test_until_immediate_separator() {
        let mut link = ScriptLink::new(b":x");
        let mut buf = [0xEEu8; 4];
        assert_eq!(link.recv_bytes_until(b':', &mut buf), 0);
        // Untouched
        assert_eq!(buf, [0xEE; 4]);
    }

    #[test]
    fn test_recv_bytes_short() {
        let mut link = ScriptLink::new(&[1, 2, 3]);
        let mut buf = [0u8; 5];
        assert_eq!(link.recv_bytes(&mut buf), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
    }

    #[test]
    fn test_send_bytes_in_order() {
        let mut link = ScriptLink::new(&[]);
        link.send_bytes(b"OK:");
        assert_eq!(link.output, b"OK:");
        assert!(!link.rx_available());
    }

    proptest! {
        #[test]
        fn prop_until_stores_prefix(
            input in proptest::collection::vec(any::<u8>(), 0..32),
            cap in 1usize..16,
        ) {
            let mut link = ScriptLink::new(&input);
            let mut buf = vec![0u8; cap];
            let n = link.recv_bytes_until(b':', &mut buf);

            match input.iter().take(cap).position(|&b| b == b':') {
                Some(pos) => {
                    prop_assert_eq!(n, pos);
                    prop_assert!(n < cap);
                }
                None => prop_assert_eq!(n, cap.min(input.len())),
            }
            prop_assert_eq!(&buf[..n], &input[..n]);
        }
    }
}
