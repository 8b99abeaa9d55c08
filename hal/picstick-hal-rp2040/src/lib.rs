//! RP2040-specific HAL for the picstick programmer
//!
//! Implements the shared `picstick-hal` traits on top of `embassy-rp`:
//!
//! - [`FlexPin`](picstick_hal::FlexPin) for `embassy_rp::gpio::Flex`, used
//!   for the three ICSP lines
//! - [`EmulatedUsi`], a shift register with bit counter and an 8-bit bit
//!   timer emulated on TIMER alarm 1, because the RP2040 has no USI block
//! - [`StartDetect`], the RX falling-edge source for start detection

#![no_std]

pub mod gpio;
pub mod usi;

pub use usi::{EmulatedUsi, StartDetect};
