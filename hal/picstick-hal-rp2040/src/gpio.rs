//! GPIO trait implementations for embassy-rp pins

use embassy_rp::gpio::{Flex, Pull as RpPull};
use picstick_hal::{FlexPin, InputPin, OutputPin, Pull};

impl OutputPin for Flex<'_> {
    fn set_high(&mut self) {
        Flex::set_high(self);
    }

    fn set_low(&mut self) {
        Flex::set_low(self);
    }

    fn is_set_high(&self) -> bool {
        Flex::is_set_high(self)
    }
}

impl InputPin for Flex<'_> {
    fn is_high(&self) -> bool {
        Flex::is_high(self)
    }
}

impl FlexPin for Flex<'_> {
    fn set_as_output(&mut self) {
        Flex::set_as_output(self);
    }

    fn set_as_input(&mut self, pull: Pull) {
        Flex::set_as_input(self);
        self.set_pull(to_rp_pull(pull));
    }
}

fn to_rp_pull(pull: Pull) -> RpPull {
    match pull {
        Pull::None => RpPull::None,
        Pull::Up => RpPull::Up,
    }
}
