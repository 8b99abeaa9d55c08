//! Shift-register serial interface emulated on the RP2040 timer
//!
//! The 8-bit bit timer is modelled on the 1 MHz system timer: one timer
//! count per microsecond, which is exactly an 8 MHz clock through a /8
//! prescaler. Instead of ticking, the emulation computes when the next
//! overflow is due and sets TIMER alarm 1 for it. Each overflow clocks
//! the shift register: DO follows the register MSB, DI is sampled into
//! the LSB.
//!
//! [`EmulatedUsi::service`] must be called from the `TIMER_IRQ_1`
//! handler. It reports which virtual interrupt sources fired; the caller
//! runs the matching UART handlers.
//!
//! Start detection uses the GPIO falling-edge interrupt on RX through
//! [`StartDetect`]. The alarm only runs while a frame is in flight.

use embassy_rp::gpio::{Flex, Input, Level, Pin, Pull};
use embassy_rp::interrupt::{self, InterruptExt};
use embassy_rp::pac::{SIO, TIMER};
use embassy_rp::Peri;
use picstick_hal::{BitTimer, SerialLine, ShiftRegister, UsiEvents};

/// TIMER alarm used for the bit clock (alarm 0 belongs to embassy-time)
const ALARM: usize = 1;

/// Microseconds between two overflows of a free-running 8-bit timer
const TIMER_PERIOD_US: u32 = 256;

const COUNTER_MASK: u8 = 0x0F;

fn now() -> u32 {
    TIMER.timerawl().read()
}

/// True once `now` has reached `target`, across counter wrap
fn is_due(now: u32, target: u32) -> bool {
    now.wrapping_sub(target) as i32 >= 0
}

/// Falling-edge source on the RX line
///
/// Owns the RX pin as an edge-triggered input. Run [`falling_edge`]
/// in a task that preempts the foreground and forward each edge to the
/// UART's start-condition handler while
/// [`EmulatedUsi::start_detect_armed`] holds.
///
/// [`falling_edge`]: Self::falling_edge
pub struct StartDetect<'d> {
    rx: Input<'d>,
}

impl StartDetect<'_> {
    /// Wait for the next high-to-low transition on RX
    pub async fn falling_edge(&mut self) {
        self.rx.wait_for_falling_edge().await;
    }
}

/// Emulated USI: shift register, bit counter, bit timer and serial line
pub struct EmulatedUsi<'d> {
    /// RX bit in the bank 0 input register
    rx_mask: u32,
    tx: Flex<'d>,
    data: u8,
    counter: u8,
    shifting: bool,
    running: bool,
    next_overflow: u32,
    driving: bool,
    armed: bool,
}

impl<'d> EmulatedUsi<'d> {
    /// Take the RX and TX pins and enable the alarm interrupt
    ///
    /// TX starts released (input with pull-up). RX is handed back as a
    /// [`StartDetect`]; the emulation only samples its level. The caller
    /// still has to enable `TIMER_IRQ_1` in the NVIC.
    pub fn new(rx: Peri<'d, impl Pin>, tx: Peri<'d, impl Pin>) -> (Self, StartDetect<'d>) {
        let rx_mask = 1 << rx.pin();
        let rx = Input::new(rx, Pull::Up);
        let mut tx = Flex::new(tx);
        tx.set_as_input();
        tx.set_pull(Pull::Up);

        TIMER.inte().modify(|w| w.set_alarm(ALARM, true));

        let usi = Self {
            rx_mask,
            tx,
            data: 0xFF,
            counter: 0,
            shifting: false,
            running: false,
            next_overflow: 0,
            driving: false,
            armed: false,
        };
        (usi, StartDetect { rx })
    }

    /// Check if a falling edge on RX counts as a start condition
    pub fn start_detect_armed(&self) -> bool {
        self.armed
    }

    /// Advance the emulation from the alarm interrupt
    pub fn service(&mut self) -> UsiEvents {
        TIMER.intr().write(|w| w.set_alarm(ALARM, true));

        let mut events = UsiEvents::default();

        if self.running && is_due(now(), self.next_overflow) {
            events.timer_overflow = true;
            self.next_overflow = self.next_overflow.wrapping_add(TIMER_PERIOD_US);

            if self.shifting {
                self.data = (self.data << 1) | self.rx_is_high() as u8;
                self.counter = (self.counter + 1) & COUNTER_MASK;
                events.shift_overflow = self.counter == 0;
                self.update_output();
            }
        }

        self.schedule();
        events
    }

    fn rx_is_high(&self) -> bool {
        SIO.gpio_in(0).read() & self.rx_mask != 0
    }

    fn update_output(&mut self) {
        if self.driving {
            self.tx.set_level(Level::from(self.data & 0x80 != 0));
        }
    }

    /// Point alarm 1 at the next overflow, or disarm it while stopped
    fn schedule(&mut self) {
        if !self.running {
            TIMER.armed().write(|w| w.set_armed(1 << ALARM));
            return;
        }

        let target = self.next_overflow;
        TIMER.alarm(ALARM).write_value(target);

        // An alarm written in the past only fires after the counter wraps
        if is_due(now(), target) {
            TIMER.armed().write(|w| w.set_armed(1 << ALARM));
            interrupt::TIMER_IRQ_1.pend();
        }
    }
}

impl ShiftRegister for EmulatedUsi<'_> {
    fn load(&mut self, data: u8, counter: u8) {
        self.data = data;
        self.counter = counter & COUNTER_MASK;
        self.update_output();
    }

    fn data(&self) -> u8 {
        self.data
    }

    fn enable(&mut self) {
        self.shifting = true;
    }

    fn disable(&mut self) {
        self.shifting = false;
    }
}

impl BitTimer for EmulatedUsi<'_> {
    fn start(&mut self, count: u8) {
        let remaining = TIMER_PERIOD_US - u32::from(count);
        self.next_overflow = now().wrapping_add(remaining);
        self.running = true;
        self.schedule();
    }

    fn reload(&mut self, seed: u8) {
        self.next_overflow = self.next_overflow.wrapping_sub(u32::from(seed));
        self.schedule();
    }

    fn stop(&mut self) {
        self.running = false;
        self.schedule();
    }
}

impl SerialLine for EmulatedUsi<'_> {
    fn rx_is_low(&self) -> bool {
        !self.rx_is_high()
    }

    fn drive(&mut self) {
        self.driving = true;
        self.update_output();
        self.tx.set_as_output();
    }

    fn release(&mut self) {
        self.driving = false;
        self.tx.set_as_input();
        self.tx.set_pull(Pull::Up);
    }

    fn arm_start_detect(&mut self) {
        self.armed = true;
    }

    fn disarm_start_detect(&mut self) {
        self.armed = false;
    }
}
