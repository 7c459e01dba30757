//! Collaborator traits
//!
//! These traits define the interface between the metronome core and the
//! host: where settings persist and where haptic pulses go.

pub mod haptic;
pub mod store;

pub use haptic::HapticOutput;
pub use store::{PersistentStore, SettingKey, SettingsSink};
