//! Vibration pattern
//!
//! A pattern is a list of segment durations that alternate motor on and
//! motor off, starting with on. The metronome only ever plays a single
//! "on" segment per beat, but drivers accept the general form.

use heapless::Vec;

/// Maximum segments in one pattern
pub const MAX_SEGMENTS: usize = 8;

/// Ordered on/off segment durations in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VibePattern {
    segments: Vec<u32, MAX_SEGMENTS>,
}

impl VibePattern {
    /// A single pulse of `duration_ms`
    pub fn single(duration_ms: u32) -> Self {
        let mut segments = Vec::new();
        // Capacity is at least one, so this cannot fail
        let _ = segments.push(duration_ms);
        Self { segments }
    }

    /// Build a pattern from alternating on/off durations
    ///
    /// Returns `None` if there are more than [`MAX_SEGMENTS`] segments.
    pub fn from_segments(durations: &[u32]) -> Option<Self> {
        let segments = Vec::from_slice(durations).ok()?;
        Some(Self { segments })
    }

    /// Segment durations in milliseconds
    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True if the pattern has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Length of the first (on) segment, which is the beat pulse
    pub fn pulse_ms(&self) -> Option<u32> {
        self.segments.first().copied()
    }

    /// Wall-clock length of the whole pattern
    pub fn total_duration_ms(&self) -> u32 {
        self.segments.iter().fold(0u32, |acc, d| acc.saturating_add(*d))
    }
}
