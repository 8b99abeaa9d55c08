//! Fixed-capacity ring buffer shared between interrupt and foreground code
//!
//! Exactly one side produces (advances `head`) and exactly one side
//! consumes (advances `tail`), so an interrupt handler and the foreground
//! can share a buffer without locking:
//!
//! - receive: the shift-overflow interrupt produces, the foreground consumes
//! - transmit: the foreground produces, the shift-overflow interrupt consumes
//!
//! `head` indexes the last slot written and `tail` the last slot read.
//! The buffer is empty when they are equal and full when advancing `head`
//! would make them equal, so one slot is always left unused.

use portable_atomic::{AtomicU8, AtomicUsize, Ordering};

/// Single-producer single-consumer byte ring
///
/// `N` must be a power of two and at least 2; this is checked at compile
/// time when the buffer is first used.
pub struct RingBuffer<const N: usize> {
    slots: [AtomicU8; N],
    head: AtomicUsize,
    tail: AtomicUsize,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    const MASK: usize = {
        assert!(
            N >= 2 && N.is_power_of_two(),
            "ring buffer capacity must be a power of two"
        );
        N - 1
    };

    /// Create an empty ring buffer
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU8::new(0) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Number of bytes the buffer can hold
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Append a byte (producer side)
    ///
    /// Returns the byte back if the buffer is full.
    pub fn push(&self, byte: u8) -> Result<(), u8> {
        let next = (self.head.load(Ordering::Relaxed) + 1) & Self::MASK;
        if next == self.tail.load(Ordering::Acquire) {
            return Err(byte);
        }
        self.slots[next].store(byte, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Remove the oldest byte (consumer side)
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let next = (tail + 1) & Self::MASK;
        let byte = self.slots[next].load(Ordering::Relaxed);
        self.tail.store(next, Ordering::Release);
        Some(byte)
    }

    /// Check if there is nothing to consume
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Check if a push would be rejected
    pub fn is_full(&self) -> bool {
        let next = (self.head.load(Ordering::Acquire) + 1) & Self::MASK;
        next == self.tail.load(Ordering::Acquire)
    }

    /// Number of bytes waiting to be consumed
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail) & Self::MASK
    }

    /// Reset both indices to the start of the buffer
    ///
    /// Only valid while neither the producer nor the consumer is active.
    pub fn clear(&self) {
        self.head.store(0, Ordering::Release);
        self.tail.store(0, Ordering::Release);
    }
}
