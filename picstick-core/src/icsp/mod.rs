//! Bit-banged ICSP master
//!
//! Three lines: MCLR (reset / mode), CLK and DAT. Every bit is clocked by
//! raising CLK, presenting DAT, holding for the clock-high time, then
//! dropping CLK (the target latches on the falling edge) and holding for
//! the clock-low time. Commands are 8 bits and payloads 24 bits, both MSB
//! first.

pub mod driver;
pub mod opcode;
pub mod timing;

pub use driver::{encode_payload, IcspDriver};
pub use opcode::Opcode;
