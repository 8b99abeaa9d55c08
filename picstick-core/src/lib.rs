//! Board-agnostic core of the picstick programmer firmware
//!
//! This crate contains all programmer logic that does not depend on a
//! specific microcontroller:
//!
//! - Lock-free ring buffers shared between interrupt and foreground code
//! - The interrupt-driven software UART built on a shift register
//! - The bit-banged ICSP master
//! - The connection state machine
//! - The command dispatcher that ties the two together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod dispatch;
pub mod icsp;
pub mod ring;
pub mod state;
pub mod traits;
pub mod uart;
