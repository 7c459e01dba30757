//! GPIO adapters
//!
//! Wraps embassy-rp pins so drivers written against `tactus-hal` traits can
//! run on the RP2040.

use embassy_rp::gpio::Output;

/// Push-pull output implementing [`tactus_hal::OutputPin`]
pub struct Rp2040Output<'d> {
    pin: Output<'d>,
}

impl<'d> Rp2040Output<'d> {
    /// Wrap an already configured embassy output
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl<'d> tactus_hal::OutputPin for Rp2040Output<'d> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
