//! ON/OFF run state
//!
//! Starts ON on every startup and is never persisted. `toggle` is the only
//! transition and has no guards.

use crate::render::ColorHint;

/// Whether beats produce haptic pulses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// Pulses are emitted on every beat
    #[default]
    On,
    /// Beats keep firing but no pulse is emitted
    Off,
}

impl RunState {
    /// Flip the state
    pub fn toggle(self) -> Self {
        match self {
            RunState::On => RunState::Off,
            RunState::Off => RunState::On,
        }
    }

    /// Check if pulses are emitted
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::On)
    }

    /// Status label shown above the tempo
    pub fn label(&self) -> &'static str {
        match self {
            RunState::On => "ON",
            RunState::Off => "OFF",
        }
    }

    /// Color hint for the status label
    pub fn color(&self) -> ColorHint {
        match self {
            RunState::On => ColorHint::Positive,
            RunState::Off => ColorHint::Negative,
        }
    }
}
