//! Pin assignment
//!
//! | Signal    | GPIO | Notes                                   |
//! |-----------|------|-----------------------------------------|
//! | UART TX   | 0    | released to pull-up while not sending   |
//! | UART RX   | 1    | pull-up, falling edge starts a frame    |
//! | ICSP MCLR | 2    |                                         |
//! | ICSP CLK  | 3    |                                         |
//! | ICSP DAT  | 4    | switches direction for reads            |
//! | LED       | 25   | on while a command is being handled     |

use embassy_rp::gpio::AnyPin;
use embassy_rp::{Peri, Peripherals};

/// Pins used by the programmer
pub struct Board {
    pub uart_tx: Peri<'static, AnyPin>,
    pub uart_rx: Peri<'static, AnyPin>,
    pub mclr: Peri<'static, AnyPin>,
    pub clk: Peri<'static, AnyPin>,
    pub dat: Peri<'static, AnyPin>,
    pub led: Peri<'static, AnyPin>,
}

impl Board {
    pub fn new(p: Peripherals) -> Self {
        Self {
            uart_tx: p.PIN_0.into(),
            uart_rx: p.PIN_1.into(),
            mclr: p.PIN_2.into(),
            clk: p.PIN_3.into(),
            dat: p.PIN_4.into(),
            led: p.PIN_25.into(),
        }
    }
}
