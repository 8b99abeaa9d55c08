//! Software UART state machine
//!
//! Idle: line released, start detection armed.
//! Receiving: entered on a falling edge; timer and shift register sample
//! nine bit periods, the shift overflow stores the byte and returns to idle.
//! Transmitting: entered from the foreground when a byte is queued and no
//! frame is being received; each byte goes out in two halves of five bit
//! periods (idle, start and data bits 0..2, then data bits 3..7 with the
//! stop level left in the register behind them).

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use picstick_hal::UsiHardware;
use portable_atomic::{AtomicU8, Ordering};

use super::bit_reverse;
use super::status::{Flag, UartStatus};
use super::timing::{UartTiming, COUNTER_SEED_IMMEDIATE, COUNTER_SEED_TRANSMIT};
use crate::ring::RingBuffer;
use crate::traits::ByteLink;

/// Default receive ring size (3 usable bytes)
pub const RX_BUFFER_SIZE: usize = 4;

/// Default transmit ring size (3 usable bytes)
pub const TX_BUFFER_SIZE: usize = 4;

/// Half-duplex software UART
///
/// Meant to live in a `static` shared by the foreground and the three
/// interrupt handlers ([`on_line_change`](Self::on_line_change),
/// [`on_timer_overflow`](Self::on_timer_overflow),
/// [`on_shift_overflow`](Self::on_shift_overflow)). Hardware access is
/// serialised through a critical-section mutex; the ring buffers and the
/// status byte are lock-free.
pub struct SoftUart<H, const RX: usize = RX_BUFFER_SIZE, const TX: usize = TX_BUFFER_SIZE> {
    hw: Mutex<CriticalSectionRawMutex, RefCell<Option<H>>>,
    rx: RingBuffer<RX>,
    tx: RingBuffer<TX>,
    status: UartStatus,
    /// Byte currently on the wire (interrupt context only)
    tx_data: AtomicU8,
    timing: UartTiming,
}

impl<H, const RX: usize, const TX: usize> SoftUart<H, RX, TX> {
    /// Create an uninitialised UART
    ///
    /// Nothing is transmitted or received until [`init`](Self::init)
    /// hands over the hardware.
    pub const fn new(timing: UartTiming) -> Self {
        Self {
            hw: Mutex::new(RefCell::new(None)),
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            status: UartStatus::new(),
            tx_data: AtomicU8::new(0),
            timing,
        }
    }

    /// Timing this UART was built with
    pub fn timing(&self) -> &UartTiming {
        &self.timing
    }

    /// Check if a received byte is waiting
    pub fn rx_available(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Check if a transmission is in progress
    pub fn is_transmitting(&self) -> bool {
        self.status.contains(Flag::TxFromBuffer)
    }

    /// Check if a frame is currently being received
    pub fn is_receiving(&self) -> bool {
        self.status.contains(Flag::Receiving)
    }

    /// Return and clear the receive overflow flag
    ///
    /// The flag is set when a byte arrives while the receive ring is full;
    /// that byte is lost.
    pub fn take_overflow(&self) -> bool {
        self.status.take(Flag::RxOverflow)
    }

    /// Receive one byte, spinning until one is available
    pub fn recv_byte(&self) -> u8 {
        loop {
            if let Some(byte) = self.try_recv_byte() {
                return byte;
            }
            core::hint::spin_loop();
        }
    }

    /// Receive one byte if available
    pub fn try_recv_byte(&self) -> Option<u8> {
        self.rx.pop().map(bit_reverse)
    }
}

impl<H: UsiHardware, const RX: usize, const TX: usize> SoftUart<H, RX, TX> {
    /// Take ownership of the hardware and enter the idle state
    pub fn init(&self, hw: H) {
        self.hw.lock(|cell| cell.replace(Some(hw)));
        self.flush();
    }

    /// Abort any frame in flight, discard all buffered bytes and reset
    /// the state flags
    ///
    /// The hardware is returned to idle under the same lock, so no
    /// interrupt can observe cleared flags with the shifter still running.
    pub fn flush(&self) {
        self.hw.lock(|cell| {
            if let Some(hw) = cell.borrow_mut().as_mut() {
                Self::idle(hw);
            }
            self.rx.clear();
            self.tx.clear();
            self.status.reset();
        });
    }

    /// Run `f` with exclusive access to the hardware
    ///
    /// Returns `None` if [`init`](Self::init) has not been called yet.
    pub fn with_hardware<R>(&self, f: impl FnOnce(&mut H) -> R) -> Option<R> {
        self.hw.lock(|cell| cell.borrow_mut().as_mut().map(f))
    }

    /// Queue one byte for transmission, spinning while the ring is full
    ///
    /// Starts the transmitter if it is idle. When a frame is being
    /// received, transmission waits until it completes.
    pub fn send_byte(&self, byte: u8) {
        let mut reversed = bit_reverse(byte);
        while let Err(rejected) = self.tx.push(reversed) {
            reversed = rejected;
            core::hint::spin_loop();
        }
        self.kick_transmit();
    }

    /// Queue one byte without waiting
    ///
    /// Returns the byte back if the transmit ring is full.
    pub fn try_send_byte(&self, byte: u8) -> Result<(), u8> {
        self.tx.push(bit_reverse(byte)).map_err(bit_reverse)?;
        self.kick_transmit();
        Ok(())
    }

    fn kick_transmit(&self) {
        loop {
            while self.is_receiving() {
                core::hint::spin_loop();
            }
            // Both flags are checked again with interrupts masked: a start
            // edge may arrive after the wait above, and the transmitter
            // may go idle after the byte was queued
            let started = self.with_hardware(|hw| {
                if self.is_transmitting() {
                    return true;
                }
                if self.is_receiving() {
                    return false;
                }
                self.start_transmit(hw);
                true
            });
            if started != Some(false) {
                return;
            }
        }
    }

    fn start_transmit(&self, hw: &mut H) {
        hw.disarm_start_detect();
        hw.start(0);
        // Idle-high data with the counter one clock from overflow, so the
        // first byte is loaded on the next bit boundary
        hw.load(0xFF, COUNTER_SEED_IMMEDIATE);
        hw.enable();
        hw.drive();
        self.status.set(Flag::TxFromBuffer);
    }

    /// Start-condition interrupt handler
    ///
    /// Ignored while transmitting or if the line is already back high.
    pub fn on_line_change(&self) {
        self.with_hardware(|hw| {
            if self.is_transmitting() || !hw.rx_is_low() {
                return;
            }
            hw.start(self.timing.initial_receive_count());
            hw.load(0xFF, self.timing.counter_seed_receive());
            hw.enable();
            hw.disarm_start_detect();
            self.status.set(Flag::Receiving);
        });
    }

    /// Bit timer overflow interrupt handler
    pub fn on_timer_overflow(&self) {
        let seed = self.timing.timer_seed();
        self.with_hardware(|hw| hw.reload(seed));
    }

    /// Shift counter overflow interrupt handler
    pub fn on_shift_overflow(&self) {
        self.with_hardware(|hw| {
            if self.is_transmitting() {
                self.transmit_step(hw);
            } else {
                self.receive_complete(hw);
            }
        });
    }

    fn transmit_step(&self, hw: &mut H) {
        if self.status.take(Flag::TxSecondHalf) {
            // Data bits 3..7, then the stop level
            let data = self.tx_data.load(Ordering::Relaxed);
            hw.load((data << 3) | 0x07, COUNTER_SEED_TRANSMIT);
        } else if let Some(data) = self.tx.pop() {
            // Idle bit, start bit, then data bits 0..2
            self.tx_data.store(data, Ordering::Relaxed);
            self.status.set(Flag::TxSecondHalf);
            hw.load((data >> 2) | 0x80, COUNTER_SEED_TRANSMIT);
        } else {
            self.status.clear(Flag::TxFromBuffer);
            Self::idle(hw);
        }
    }

    fn receive_complete(&self, hw: &mut H) {
        self.status.clear(Flag::Receiving);
        if self.rx.push(hw.data()).is_err() {
            self.status.set(Flag::RxOverflow);
        }
        Self::idle(hw);
    }

    fn idle(hw: &mut H) {
        hw.stop();
        hw.release();
        hw.disable();
        hw.arm_start_detect();
    }
}

impl<H: UsiHardware, const RX: usize, const TX: usize> ByteLink for &SoftUart<H, RX, TX> {
    fn send_byte(&mut self, byte: u8) {
        SoftUart::send_byte(*self, byte);
    }

    fn recv_byte(&mut self) -> Option<u8> {
        Some(SoftUart::recv_byte(*self))
    }

    fn rx_available(&self) -> bool {
        SoftUart::rx_available(*self)
    }
}
