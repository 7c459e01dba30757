//! GPIO vibration motor
//!
//! Plays a [`VibePattern`] on a motor switched by one pin. Segments
//! alternate on/off starting with on. The motor is off after construction,
//! after the last segment and after [`VibeMotor::stop`].
//!
//! ```text
//! play(pattern, now) ──► ON  ──seg 0──► OFF ──seg 1──► ON ... ──► idle
//!                         │                                        ▲
//!                         └──────────────── stop() ────────────────┘
//! ```

use tactus_core::vibe::VibePattern;
use tactus_hal::OutputPin;

/// Pin level that turns the motor on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Motor on = pin high
    #[default]
    ActiveHigh,
    /// Motor on = pin low (P-channel switch)
    ActiveLow,
}

/// Pattern player for a GPIO vibration motor
pub struct VibeMotor<P> {
    pin: P,
    polarity: Polarity,
    pattern: VibePattern,
    /// Index of the segment currently playing
    segment: usize,
    /// End of the current segment
    deadline_ms: Option<u64>,
    /// Current logical motor state
    on: bool,
}

impl<P: OutputPin> VibeMotor<P> {
    /// Create a motor driver, forcing the motor off
    pub fn new(pin: P, polarity: Polarity) -> Self {
        let mut motor = Self {
            pin,
            polarity,
            pattern: VibePattern::default(),
            segment: 0,
            deadline_ms: None,
            on: false,
        };
        motor.set_on(false);
        motor
    }

    /// Start playing `pattern`, replacing anything still playing
    ///
    /// Returns the deadline at which [`poll`](Self::poll) must be called
    /// next, or `None` if the pattern has nothing to play.
    pub fn play(&mut self, pattern: &VibePattern, now_ms: u64) -> Option<u64> {
        self.pattern = pattern.clone();
        self.segment = 0;
        self.deadline_ms = None;
        self.enter_segment(now_ms)
    }

    /// Advance the pattern
    ///
    /// Call at or after the returned deadline. Early calls change nothing and
    /// return the same deadline. Returns `None` once the pattern finished.
    pub fn poll(&mut self, now_ms: u64) -> Option<u64> {
        let deadline = self.deadline_ms?;
        if now_ms < deadline {
            return Some(deadline);
        }
        self.segment += 1;
        // Next segment starts where the previous one ended, not when we woke
        self.enter_segment(deadline)
    }

    /// Stop immediately and turn the motor off
    pub fn stop(&mut self) {
        self.deadline_ms = None;
        self.set_on(false);
    }

    /// Check if a pattern is playing
    pub fn is_active(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Check if the motor is currently driven
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Deadline of the current segment
    pub fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }

    fn enter_segment(&mut self, start_ms: u64) -> Option<u64> {
        let Some(&duration_ms) = self.pattern.segments().get(self.segment) else {
            self.stop();
            return None;
        };
        // Even segments vibrate, odd segments pause
        self.set_on(self.segment % 2 == 0);
        let deadline = start_ms + u64::from(duration_ms);
        self.deadline_ms = Some(deadline);
        Some(deadline)
    }

    fn set_on(&mut self, on: bool) {
        self.on = on;
        let high = match self.polarity {
            Polarity::ActiveHigh => on,
            Polarity::ActiveLow => !on,
        };
        self.pin.set_state(high);
    }
}
