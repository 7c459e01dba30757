//! Haptic output seen from the core
//!
//! The controller hands pulses to the haptic task through [`HAPTIC_CMD`];
//! the core never waits for the motor.

use tactus_core::traits::HapticOutput;
use tactus_core::vibe::VibePattern;

use crate::channels::{HapticCommand, HAPTIC_CMD};

/// [`HapticOutput`] that forwards to the haptic task
pub struct HapticLink;

impl HapticOutput for HapticLink {
    fn enqueue(&mut self, pattern: &VibePattern) {
        HAPTIC_CMD.signal(HapticCommand::Play(pattern.clone()));
    }

    fn cancel(&mut self) {
        HAPTIC_CMD.signal(HapticCommand::Stop);
    }
}
