//! Vibration policy
//!
//! Two ways of choosing the beat pulse length exist and are selected per
//! build by [`PolicyKind`]:
//!
//! - **Threshold**: short pulse at fast tempos, long pulse at slow ones.
//!   Follows every tempo change.
//! - **Configured**: a fixed length supplied over the companion link and
//!   persisted in flash. Ignores tempo.

use crate::config::{
    LONG_PULSE_MS, MAX_VIBE_DURATION_MS, MIN_VIBE_DURATION_MS, SHORT_PULSE_MS, THRESHOLD_TEMPO,
};
use crate::tempo::Tempo;

use super::pattern::VibePattern;

/// Which policy a build uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PolicyKind {
    /// Pulse length follows tempo
    Threshold,
    /// Pulse length comes from configuration
    #[default]
    Configured,
}

/// Active vibration policy with its state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VibrationPolicy {
    /// 64 ms at or above 256 BPM, 96 ms below
    Threshold,
    /// Fixed pulse length in milliseconds
    Configured(u32),
}

impl VibrationPolicy {
    /// Build the policy for `kind`, seeding the configured duration
    pub fn new(kind: PolicyKind, duration_ms: u32) -> Self {
        match kind {
            PolicyKind::Threshold => VibrationPolicy::Threshold,
            PolicyKind::Configured => VibrationPolicy::Configured(duration_ms),
        }
    }

    /// The kind of this policy
    pub fn kind(&self) -> PolicyKind {
        match self {
            VibrationPolicy::Threshold => PolicyKind::Threshold,
            VibrationPolicy::Configured(_) => PolicyKind::Configured,
        }
    }

    /// Configured duration, if this is the configured policy
    pub fn vibe_duration_ms(&self) -> Option<u32> {
        match self {
            VibrationPolicy::Threshold => None,
            VibrationPolicy::Configured(ms) => Some(*ms),
        }
    }

    /// True if the pattern depends on tempo
    pub fn follows_tempo(&self) -> bool {
        matches!(self, VibrationPolicy::Threshold)
    }

    /// Beat pulse length at `tempo`
    pub fn pulse_ms(&self, tempo: Tempo) -> u32 {
        match self {
            VibrationPolicy::Threshold => {
                if tempo.bpm() >= THRESHOLD_TEMPO {
                    SHORT_PULSE_MS
                } else {
                    LONG_PULSE_MS
                }
            }
            VibrationPolicy::Configured(ms) => *ms,
        }
    }

    /// Single-segment pattern to play at `tempo`
    pub fn pattern_for(&self, tempo: Tempo) -> VibePattern {
        VibePattern::single(self.pulse_ms(tempo))
    }
}

/// Clamp a stored or parsed duration into the accepted pulse range
pub fn clamp_vibe_duration(raw: i32) -> u32 {
    raw.clamp(MIN_VIBE_DURATION_MS as i32, MAX_VIBE_DURATION_MS as i32) as u32
}

/// Parse a duration string delivered by the companion link
///
/// Surrounding whitespace is ignored. Anything that is not a whole decimal
/// integer (including values that overflow `i32`) yields `None` so the
/// caller keeps its previous value. Numeric values are clamped.
pub fn parse_vibe_duration(raw: &str) -> Option<u32> {
    let value: i32 = raw.trim().parse().ok()?;
    Some(clamp_vibe_duration(value))
}
