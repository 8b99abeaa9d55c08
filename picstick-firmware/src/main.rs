//! picstick - ICSP programmer for PIC microcontrollers
//!
//! Commands arrive over a software UART and are executed one at a time
//! on a bit-banged ICSP master. The foreground polls for received data
//! and runs one dispatch cycle per command. The UART bit clock runs from
//! the TIMER_IRQ_1 alarm interrupt; start bits are caught by a GPIO edge
//! task on an interrupt executor, so both preempt a blocking dispatch.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_futures::yield_now;
use embassy_rp::gpio::{Flex, Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use picstick_core::dispatch::{CommandDispatcher, Dispatched};
use picstick_core::icsp::IcspDriver;
use picstick_core::uart::{SoftUart, UartTiming};
use picstick_hal_rp2040::{EmulatedUsi, StartDetect};

use crate::board::Board;

mod board;

static UART: SoftUart<EmulatedUsi<'static>> = SoftUart::new(UartTiming::DEFAULT);

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

/// Virtual USI interrupts: bit timer and shift counter
#[interrupt]
unsafe fn TIMER_IRQ_1() {
    let Some(events) = UART.with_hardware(|usi| usi.service()) else {
        return;
    };
    if events.shift_overflow {
        UART.on_shift_overflow();
    }
    if events.timer_overflow {
        UART.on_timer_overflow();
    }
}

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Start-condition detection on the RX falling edge
#[embassy_executor::task]
async fn start_detect_task(mut start: StartDetect<'static>) {
    loop {
        start.falling_edge().await;
        // Edges inside a frame or from our own transmission are ignored
        if UART.with_hardware(|usi| usi.start_detect_armed()) == Some(true) {
            UART.on_line_change();
        }
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("picstick starting...");

    let p = embassy_rp::init(Default::default());
    let board = Board::new(p);

    let icsp = IcspDriver::new(
        Flex::new(board.mclr),
        Flex::new(board.clk),
        Flex::new(board.dat),
        Delay,
    );
    info!("ICSP lines released");

    let mut led = Output::new(board.led, Level::Low);

    let (usi, start) = EmulatedUsi::new(board.uart_rx, board.uart_tx);
    UART.init(usi);
    interrupt::TIMER_IRQ_1.set_priority(Priority::P1);
    // SAFETY: the handler only touches UART, which is fully initialised
    unsafe { interrupt::TIMER_IRQ_1.enable() };

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    unwrap!(high.spawn(start_detect_task(start)));

    let timing = UART.timing();
    info!(
        "UART ready: {} baud, timer seed {}, receive seed {}",
        timing.baudrate,
        timing.timer_seed(),
        timing.initial_receive_count()
    );

    let mut dispatcher = CommandDispatcher::new(&UART, icsp);

    loop {
        if UART.take_overflow() {
            warn!("Receive buffer overflow, bytes lost");
        }

        if !UART.rx_available() {
            yield_now().await;
            continue;
        }

        led.set_high();
        let report = dispatcher.dispatch();
        led.set_low();

        log_report(&report);
    }
}

fn log_report(report: &Dispatched) {
    match (report.keyword, report.result) {
        (Some(keyword), Ok(())) => debug!("{}: ok, state {}", keyword, report.state),
        (keyword, Err(err)) => warn!("{}: {}", keyword, err),
        (None, Ok(())) => {}
    }

    if report.out_of_state() {
        warn!(
            "{} received while {}, executed anyway",
            report.keyword, report.previous
        );
    }
}
