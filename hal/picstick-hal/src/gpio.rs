//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific HALs.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Input bias applied while a pin is configured as an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Floating input (high impedance)
    None,
    /// Internal pull-up enabled
    Up,
}

/// Pin whose direction can change at runtime
///
/// ICSP needs this for the data line (driven for writes, sampled for
/// reads) and to release every line to high impedance when the target
/// is not being programmed.
pub trait FlexPin: OutputPin + InputPin {
    /// Drive the pin with the last level written by `set_high`/`set_low`
    fn set_as_output(&mut self);

    /// Stop driving the pin and apply the given bias
    fn set_as_input(&mut self, pull: Pull);
}
