//! Haptic output trait

use crate::vibe::VibePattern;

/// Sink for haptic pulse requests
///
/// Both operations must return immediately: `enqueue` hands the pattern to
/// whatever plays it and does not wait for the motor.
pub trait HapticOutput {
    /// Queue one pattern for playback
    fn enqueue(&mut self, pattern: &VibePattern);

    /// Stop any pattern that is playing or queued
    fn cancel(&mut self);
}
