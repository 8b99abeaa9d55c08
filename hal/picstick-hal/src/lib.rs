//! picstick Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the programmer core
//! is written against. Chip-specific crates (RP2040 today) implement them,
//! and host tests implement them with simulated hardware.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  picstick-firmware                      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picstick-core (UART, ICSP, dispatcher) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  picstick-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ picstick-hal-   │
//!            │    rp2040       │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::FlexPin`] - Digital I/O
//! - [`usi::ShiftRegister`], [`usi::BitTimer`], [`usi::SerialLine`] - the
//!   pieces of a shift-register serial interface, combined as
//!   [`usi::UsiHardware`]

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod usi;

// Re-export key traits at crate root for convenience
pub use gpio::{FlexPin, InputPin, OutputPin, Pull};
pub use usi::{BitTimer, SerialLine, ShiftRegister, UsiEvents, UsiHardware};
