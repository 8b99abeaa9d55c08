//! Shift-register serial interface abstractions
//!
//! The software UART is built from three cooperating pieces of hardware,
//! modelled on a universal serial interface (USI) block:
//!
//! - a shift register with a 4-bit clock counter that raises an overflow
//!   interrupt when the counter wraps from 15 to 0,
//! - an 8-bit timer whose overflow both clocks the shift register and
//!   raises its own interrupt,
//! - the serial line itself: an input that can raise a start-condition
//!   interrupt, and an output that is either connected to the shift
//!   register's MSB or released to a pulled-up input.
//!
//! Only one interrupt source is armed per phase: start detection while
//! idle, timer and shift overflow while a frame is in flight.

/// Shift register with bit counter
pub trait ShiftRegister {
    /// Load the data register and preload the 4-bit counter
    ///
    /// Clears any pending overflow. The overflow fires after
    /// `16 - counter` clocks.
    fn load(&mut self, data: u8, counter: u8);

    /// Current content of the data register
    fn data(&self) -> u8;

    /// Enable shifting in three-wire mode, clocked by the bit timer,
    /// with the counter overflow interrupt enabled
    fn enable(&mut self);

    /// Disable the shift register and its overflow interrupt
    fn disable(&mut self);
}

/// 8-bit bit-clock timer
pub trait BitTimer {
    /// Set the count, start the prescaled clock and enable the overflow
    /// interrupt
    fn start(&mut self, count: u8);

    /// Add `seed` to the current count
    ///
    /// Called from the overflow interrupt; adding (rather than
    /// assigning) keeps the ticks already elapsed since the overflow.
    fn reload(&mut self, seed: u8);

    /// Stop the clock
    fn stop(&mut self);
}

/// The physical serial line
pub trait SerialLine {
    /// Check if the receive line currently reads low
    fn rx_is_low(&self) -> bool;

    /// Connect the transmit output to the shift register MSB
    fn drive(&mut self);

    /// Release the transmit output to an input with pull-up
    ///
    /// This is the idle-high state required by UART framing while the
    /// shift register is not transmitting.
    fn release(&mut self);

    /// Clear any pending line change and enable the start-condition
    /// interrupt
    fn arm_start_detect(&mut self);

    /// Disable the start-condition interrupt
    fn disarm_start_detect(&mut self);
}

/// Complete shift-register serial interface
pub trait UsiHardware: ShiftRegister + BitTimer + SerialLine {}

// Blanket implementation
impl<T: ShiftRegister + BitTimer + SerialLine> UsiHardware for T {}

/// Interrupt sources raised by emulated or simulated hardware
///
/// Hardware without a native USI block services these sources from
/// shared interrupt vectors and reports which of them fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsiEvents {
    /// The receive line changed while start detection was armed
    pub line_change: bool,
    /// The bit timer overflowed
    pub timer_overflow: bool,
    /// The shift counter overflowed
    pub shift_overflow: bool,
}
