//! Seams between the dispatcher and the hardware-facing drivers
//!
//! The command dispatcher only talks to these traits, so it can run
//! against the real software UART and ICSP driver on target, or against
//! recording mocks on the host.

pub mod icsp;
pub mod link;

pub use icsp::IcspBus;
pub use link::ByteLink;
