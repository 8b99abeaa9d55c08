//! Interrupt-driven software UART on a shift-register peripheral
//!
//! Fixed baud, 8-N-1, half duplex. The shift register clocks its MSB out
//! first while UART framing is LSB first, so bytes are stored in the ring
//! buffers bit-reversed; the reversal happens in the foreground to keep
//! the interrupt handlers short.

pub mod soft;
pub mod status;
pub mod timing;

pub use soft::{SoftUart, RX_BUFFER_SIZE, TX_BUFFER_SIZE};
pub use status::{Flag, UartStatus};
pub use timing::UartTiming;

/// Reverse the bit order of a byte (MSB swapped with LSB, and so on)
pub const fn bit_reverse(mut x: u8) -> u8 {
    x = ((x >> 1) & 0x55) | ((x << 1) & 0xAA);
    x = ((x >> 2) & 0x33) | ((x << 2) & 0xCC);
    x = ((x >> 4) & 0x0F) | ((x << 4) & 0xF0);
    x
}
