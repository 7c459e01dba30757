//! Haptic task
//!
//! Owns the vibration motor and plays the patterns the controller sends.
//! A new pattern replaces whatever is playing; Stop turns the motor off
//! at once.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_time::{Instant, Timer};

use tactus_drivers::haptic::{Polarity, VibeMotor};
use tactus_hal_rp2040::gpio::Rp2040Output;

use crate::channels::{HapticCommand, HAPTIC_CMD};

/// Haptic task - drives the motor through its pattern segments
#[embassy_executor::task]
pub async fn haptic_task(pin: Output<'static>, polarity: Polarity) {
    info!("Haptic task started ({:?})", polarity);

    let mut motor = VibeMotor::new(Rp2040Output::new(pin), polarity);

    loop {
        let command = match motor.deadline() {
            Some(deadline) => {
                match select(HAPTIC_CMD.wait(), Timer::at(Instant::from_millis(deadline))).await {
                    Either::First(command) => Some(command),
                    Either::Second(()) => None,
                }
            }
            None => Some(HAPTIC_CMD.wait().await),
        };

        let now_ms = Instant::now().as_millis();
        match command {
            Some(HapticCommand::Play(pattern)) => {
                trace!("Pulse {} ms", pattern.total_duration_ms());
                motor.play(&pattern, now_ms);
            }
            Some(HapticCommand::Stop) => {
                if motor.is_on() {
                    debug!("Pulse cut short");
                } else if motor.is_active() {
                    debug!("Pattern cancelled in a pause");
                }
                motor.stop();
            }
            None => {
                motor.poll(now_ms);
            }
        }
    }
}
