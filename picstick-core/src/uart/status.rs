//! UART status flags shared between interrupt and foreground code
//!
//! Each flag documents the contexts allowed to write it. Every write is a
//! single atomic read-modify-write, so a flag set by an interrupt is
//! never lost to a concurrent clear of a different flag.

use portable_atomic::{AtomicU8, Ordering};

/// One status bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Flag {
    /// Transmit mode is active
    ///
    /// Set by the foreground when it starts a transmission (inside the
    /// hardware critical section); cleared by the shift-overflow interrupt
    /// when the transmit buffer runs dry.
    TxFromBuffer = 1 << 0,
    /// First half of the current byte is on the wire
    ///
    /// Written only by the shift-overflow interrupt.
    TxSecondHalf = 1 << 1,
    /// A frame is being shifted in
    ///
    /// Set by the line-change interrupt; cleared by the shift-overflow
    /// interrupt.
    Receiving = 1 << 2,
    /// A received byte was dropped because the receive buffer was full
    ///
    /// Set by the shift-overflow interrupt; cleared by the foreground
    /// with [`UartStatus::take`].
    RxOverflow = 1 << 3,
}

/// Atomic status bitfield
#[derive(Debug, Default)]
pub struct UartStatus(AtomicU8);

impl UartStatus {
    /// All flags clear
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    /// Check if a flag is set
    pub fn contains(&self, flag: Flag) -> bool {
        self.0.load(Ordering::Acquire) & flag as u8 != 0
    }

    /// Set a flag
    pub fn set(&self, flag: Flag) {
        self.0.fetch_or(flag as u8, Ordering::AcqRel);
    }

    /// Clear a flag
    pub fn clear(&self, flag: Flag) {
        self.0.fetch_and(!(flag as u8), Ordering::AcqRel);
    }

    /// Clear a flag, returning whether it was set
    pub fn take(&self, flag: Flag) -> bool {
        self.0.fetch_and(!(flag as u8), Ordering::AcqRel) & flag as u8 != 0
    }

    /// Clear every flag
    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }
}
