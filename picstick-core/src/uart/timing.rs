//! Bit timing for the shift-register UART
//!
//! The bit timer is an 8-bit up-counter clocked at
//! `system_clock / prescaler` that overflows at 256. Every overflow clocks
//! the shift register once, so a bit period is obtained by reloading the
//! timer with `256 - ticks_per_bit`.
//!
//! Reception starts on the falling edge of the start bit. The first
//! sample must land in the middle of the first data bit, 1.5 bit periods
//! later. When 1.5 periods do not fit in one 8-bit timer run the receiver
//! instead waits half a period, samples the start bit too and shifts nine
//! bits instead of eight.

/// Clocks needed before the shift counter overflows (4-bit counter)
pub const COUNTER_MAX_COUNT: u8 = 16;

/// Data bits per frame
pub const DATA_BITS: u8 = 8;

/// Start bits per frame
pub const START_BIT: u8 = 1;

/// Bits shifted per transmit half: the frame (start, 8 data, stop) is
/// sent as two halves of five bits
pub const HALF_FRAME: u8 = 5;

/// Counter preload for each transmit half
pub const COUNTER_SEED_TRANSMIT: u8 = COUNTER_MAX_COUNT - HALF_FRAME;

/// Counter preload that overflows on the very first clock
pub const COUNTER_SEED_IMMEDIATE: u8 = COUNTER_MAX_COUNT - 1;

/// Compile-time UART timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartTiming {
    /// CPU clock feeding the timer prescaler, in Hz
    pub system_clock_hz: u32,
    /// Timer prescaler
    pub prescaler: u32,
    /// Line rate in bits per second
    pub baudrate: u32,
}

impl Default for UartTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl UartTiming {
    /// 9600 baud from an 8 MHz clock with a /8 prescaler (1 µs timer ticks)
    pub const DEFAULT: Self = Self::new(8_000_000, 8, 9600);

    /// Create a timing configuration
    ///
    /// Panics at compile time when used in a `const` and the bit period
    /// does not fit the 8-bit timer.
    pub const fn new(system_clock_hz: u32, prescaler: u32, baudrate: u32) -> Self {
        let timing = Self {
            system_clock_hz,
            prescaler,
            baudrate,
        };
        let ticks = timing.ticks_per_bit();
        assert!(ticks > 0 && ticks <= 256, "bit period must fit the 8-bit timer");
        assert!(
            timing.startup_delay() < 256,
            "interrupt start-up delay must fit the 8-bit timer"
        );
        timing
    }

    /// Timer ticks per bit period
    ///
    /// Integer division, so there is a small round-off error.
    pub const fn ticks_per_bit(&self) -> u32 {
        (self.system_clock_hz / self.baudrate) / self.prescaler
    }

    /// Ticks consumed between the start edge and the timer being planted
    pub const fn startup_delay(&self) -> u32 {
        0x11 / self.prescaler
    }

    /// Timer reload producing one overflow per bit period
    pub const fn timer_seed(&self) -> u8 {
        (256 - self.ticks_per_bit()) as u8
    }

    const fn waits_half_bit(&self) -> bool {
        self.ticks_per_bit() * 3 / 2 > 256 - self.startup_delay()
    }

    /// Timer count planted on the start edge, start-up delay included
    pub const fn initial_receive_count(&self) -> u8 {
        let ticks = self.ticks_per_bit();
        let seed = if self.waits_half_bit() {
            256 - ticks / 2
        } else {
            256 - ticks * 3 / 2
        };
        (seed + self.startup_delay()) as u8
    }

    /// Shift counter preload for reception
    pub const fn counter_seed_receive(&self) -> u8 {
        if self.waits_half_bit() {
            COUNTER_MAX_COUNT - (START_BIT + DATA_BITS)
        } else {
            COUNTER_MAX_COUNT - DATA_BITS
        }
    }
}
