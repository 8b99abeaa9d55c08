//! ICSP master on three direction-switchable GPIO lines

use embedded_hal::delay::DelayNs;
use picstick_hal::{FlexPin, Pull};

use super::timing::{
    CLOCK_HIGH_US, CLOCK_LOW_US, ENTRY_HOLD_US, ENTRY_KEY, EXIT_SETTLE_US, READ_DATA_BITS,
    READ_DUMMY_CLOCKS,
};
use crate::traits::IcspBus;

/// Encode a word as the three bytes of a 24-bit payload frame
///
/// The frame is a start bit, the 16 data bits and a stop bit, padded to
/// 24 bits on the left: shifting the word up by one inside a 24-bit field
/// gives exactly that layout.
pub fn encode_payload(word: u16) -> [u8; 3] {
    let [_, high, mid, low] = (u32::from(word) << 1).to_be_bytes();
    [high, mid, low]
}

/// Bit-banged ICSP master
///
/// Lines idle as floating inputs, so the target runs normally while the
/// programmer is attached but not programming.
pub struct IcspDriver<MCLR, CLK, DAT, D> {
    mclr: MCLR,
    clk: CLK,
    dat: DAT,
    delay: D,
}

impl<MCLR, CLK, DAT, D> IcspDriver<MCLR, CLK, DAT, D>
where
    MCLR: FlexPin,
    CLK: FlexPin,
    DAT: FlexPin,
    D: DelayNs,
{
    /// Create a driver and release all lines
    pub fn new(mclr: MCLR, clk: CLK, dat: DAT, delay: D) -> Self {
        let mut driver = Self {
            mclr,
            clk,
            dat,
            delay,
        };
        driver.release();
        driver
    }

    fn release(&mut self) {
        self.mclr.set_as_input(Pull::None);
        self.clk.set_as_input(Pull::None);
        self.dat.set_as_input(Pull::None);
    }

    /// Clock one bit out on DAT
    fn write_bit(&mut self, bit: bool) {
        self.clk.set_high();
        self.dat.set_state(bit);
        self.delay.delay_us(CLOCK_HIGH_US);
        self.clk.set_low();
        self.delay.delay_us(CLOCK_LOW_US);
    }

    fn write_byte(&mut self, byte: u8) {
        for bit in (0..8).rev() {
            self.write_bit(byte & (1 << bit) != 0);
        }
    }

    /// Clock one cycle without touching DAT, optionally sampling it after
    /// the falling edge
    fn clock(&mut self, sample: bool) -> bool {
        self.clk.set_high();
        self.delay.delay_us(CLOCK_HIGH_US);
        self.clk.set_low();
        let bit = sample && self.dat.is_high();
        self.delay.delay_us(CLOCK_LOW_US);
        bit
    }
}

impl<MCLR, CLK, DAT, D> IcspBus for IcspDriver<MCLR, CLK, DAT, D>
where
    MCLR: FlexPin,
    CLK: FlexPin,
    DAT: FlexPin,
    D: DelayNs,
{
    fn enable(&mut self) {
        // Latch low before driving so MCLR never pulses high
        self.mclr.set_low();
        self.clk.set_low();
        self.dat.set_low();
        self.mclr.set_as_output();
        self.clk.set_as_output();
        self.dat.set_as_output();

        self.delay.delay_us(ENTRY_HOLD_US);

        for byte in ENTRY_KEY {
            self.write_byte(byte);
        }
    }

    fn disable(&mut self) {
        self.mclr.set_high();
        self.delay.delay_us(EXIT_SETTLE_US);
        self.release();
    }

    fn command(&mut self, opcode: u8) {
        self.write_byte(opcode);
    }

    fn payload(&mut self, word: u16) {
        for byte in encode_payload(word) {
            self.write_byte(byte);
        }
    }

    fn read(&mut self) -> u16 {
        self.dat.set_as_input(Pull::None);

        for _ in 0..READ_DUMMY_CLOCKS {
            self.clock(false);
        }

        // First sample is bit 13, last is bit 0
        let mut word = 0u16;
        for position in (0..READ_DATA_BITS).rev() {
            if self.clock(true) {
                word |= 1 << position;
            }
        }

        // Stop bit
        self.clock(false);

        self.dat.set_as_output();
        word
    }

    fn wait_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icsp::timing::{COMMAND_DELAY_US, ENTRY_KEY};
    use picstick_hal::{InputPin, OutputPin};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Line {
        Mclr,
        Clk,
        Dat,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Dir {
        Input(Pull),
        Output,
    }

    /// Shared view of the three lines as the target would see them
    struct Wire {
        level: [bool; 3],
        dir: [Dir; 3],
        /// DAT level at every CLK falling edge while DAT is driven
        latched: Vec<bool>,
        /// Levels the target presents on DAT while it is an input
        response: VecDeque<bool>,
        /// Every delay requested, in microseconds
        delays: Vec<u32>,
        /// MCLR level each time it changed direction
        mclr_history: Vec<(Dir, bool)>,
    }

    impl Wire {
        fn new() -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self {
                level: [false; 3],
                dir: [Dir::Output; 3],
                latched: Vec::new(),
                response: VecDeque::new(),
                delays: Vec::new(),
                mclr_history: Vec::new(),
            }))
        }

        fn latched_bytes(&self) -> Vec<u8> {
            self.latched
                .chunks(8)
                .map(|bits| bits.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
                .collect()
        }
    }

    struct MockPin {
        line: Line,
        wire: Rc<RefCell<Wire>>,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.wire.borrow_mut().level[self.line as usize] = true;
        }

        fn set_low(&mut self) {
            let mut wire = self.wire.borrow_mut();
            let was_high = wire.level[self.line as usize];
            wire.level[self.line as usize] = false;
            if self.line == Line::Clk && was_high && wire.dir[Line::Dat as usize] == Dir::Output {
                let bit = wire.level[Line::Dat as usize];
                wire.latched.push(bit);
            }
        }

        fn is_set_high(&self) -> bool {
            self.wire.borrow().level[self.line as usize]
        }
    }

    impl InputPin for MockPin {
        fn is_high(&self) -> bool {
            assert_eq!(self.line, Line::Dat);
            let mut wire = self.wire.borrow_mut();
            assert!(matches!(wire.dir[Line::Dat as usize], Dir::Input(_)));
            // Sampled after the falling edge
            assert!(!wire.level[Line::Clk as usize]);
            wire.response.pop_front().unwrap_or(false)
        }
    }

    impl FlexPin for MockPin {
        fn set_as_output(&mut self) {
            let mut wire = self.wire.borrow_mut();
            wire.dir[self.line as usize] = Dir::Output;
            if self.line == Line::Mclr {
                let level = wire.level[Line::Mclr as usize];
                wire.mclr_history.push((Dir::Output, level));
            }
        }

        fn set_as_input(&mut self, pull: Pull) {
            let mut wire = self.wire.borrow_mut();
            wire.dir[self.line as usize] = Dir::Input(pull);
            if self.line == Line::Mclr {
                let level = wire.level[Line::Mclr as usize];
                wire.mclr_history.push((Dir::Input(pull), level));
            }
        }
    }

    struct MockDelay {
        wire: Rc<RefCell<Wire>>,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.wire.borrow_mut().delays.push(ns / 1000);
        }

        fn delay_us(&mut self, us: u32) {
            self.wire.borrow_mut().delays.push(us);
        }
    }

    type Driver = IcspDriver<MockPin, MockPin, MockPin, MockDelay>;

    fn driver() -> (Driver, Rc<RefCell<Wire>>) {
        let wire = Wire::new();
        let pin = |line| MockPin {
            line,
            wire: wire.clone(),
        };
        let driver = IcspDriver::new(
            pin(Line::Mclr),
            pin(Line::Clk),
            pin(Line::Dat),
            MockDelay { wire: wire.clone() },
        );
        (driver, wire)
    }

    fn reset(wire: &Rc<RefCell<Wire>>) {
        let mut wire = wire.borrow_mut();
        wire.latched.clear();
        wire.delays.clear();
        wire.mclr_history.clear();
    }

    #[test]
    fn test_new_releases_lines() {
        let (_driver, wire) = driver();
        assert_eq!(wire.borrow().dir, [Dir::Input(Pull::None); 3]);
    }

    #[test]
    fn test_enable_sends_key() {
        let (mut driver, wire) = driver();
        reset(&wire);
        driver.enable();

        let wire = wire.borrow();
        assert_eq!(wire.dir, [Dir::Output; 3]);
        // MCLR driven low from the start, never high
        assert_eq!(wire.mclr_history, vec![(Dir::Output, false)]);
        assert!(!wire.level[Line::Mclr as usize]);
        assert_eq!(wire.delays[0], ENTRY_HOLD_US);
        assert_eq!(wire.latched_bytes(), ENTRY_KEY.to_vec());
        // Each key bit has a clock-high and a clock-low hold
        assert_eq!(wire.delays.len(), 1 + 32 * 2);
    }

    #[test]
    fn test_disable_raises_mclr_then_releases() {
        let (mut driver, wire) = driver();
        driver.enable();
        reset(&wire);
        driver.disable();

        let wire = wire.borrow();
        assert_eq!(wire.delays, vec![EXIT_SETTLE_US]);
        assert_eq!(wire.mclr_history, vec![(Dir::Input(Pull::None), true)]);
        assert_eq!(wire.dir, [Dir::Input(Pull::None); 3]);
    }

    #[test]
    fn test_command_msb_first() {
        let (mut driver, wire) = driver();
        driver.enable();
        reset(&wire);
        driver.command(0x80);

        let wire = wire.borrow();
        assert_eq!(
            wire.latched,
            vec![true, false, false, false, false, false, false, false]
        );
    }

    #[test]
    fn test_payload_frame() {
        assert_eq!(encode_payload(0x1234), [0x00, 0x24, 0x68]);
        assert_eq!(encode_payload(0xFFFF), [0x01, 0xFF, 0xFE]);
        assert_eq!(encode_payload(0x0000), [0x00, 0x00, 0x00]);

        let (mut driver, wire) = driver();
        driver.enable();
        reset(&wire);
        driver.payload(0x1234);
        assert_eq!(wire.borrow().latched_bytes(), vec![0x00, 0x24, 0x68]);
    }

    #[test]
    fn test_read_frame() {
        let (mut driver, wire) = driver();
        driver.enable();
        reset(&wire);

        // 14 data bits: 10 1010 1011 1100 (0x2ABC)
        let word = 0x2ABCu16;
        wire.borrow_mut().response = (0..14).rev().map(|i| word & (1 << i) != 0).collect();

        assert_eq!(driver.read(), word);

        let wire = wire.borrow();
        // 24 clocks, nothing latched while DAT was an input
        assert_eq!(wire.delays.len(), 24 * 2);
        assert!(wire.latched.is_empty());
        assert!(wire.response.is_empty());
        assert_eq!(wire.dir[Line::Dat as usize], Dir::Output);
    }

    #[test]
    fn test_read_upper_bits_clear() {
        let (mut driver, wire) = driver();
        driver.enable();
        wire.borrow_mut().response = std::iter::repeat(true).take(14).collect();
        assert_eq!(driver.read(), 0x3FFF);
    }

    #[test]
    fn test_wait() {
        let (mut driver, wire) = driver();
        reset(&wire);
        driver.wait_us(COMMAND_DELAY_US);
        assert_eq!(wire.borrow().delays, vec![COMMAND_DELAY_US]);
    }

    proptest! {
        #[test]
        fn prop_payload_carries_word(word in any::<u16>()) {
            let [high, mid, low] = encode_payload(word);
            let frame = u32::from_be_bytes([0, high, mid, low]);
            // Start bit and stop bit are zero, data sits in between
            prop_assert_eq!(frame & 1, 0);
            prop_assert_eq!(frame >> 17, 0);
            prop_assert_eq!((frame >> 1) as u16, word);
        }
    }
}
