//! Re-arming beat scheduler
//!
//! The scheduler does not own a hardware timer. It decides when the next
//! beat is due and hands the host a [`Wakeup`]; the host sleeps until the
//! deadline and reports back with the wakeup's token.
//!
//! The pending wakeup is the "armed" flag: `Some` while running, `None`
//! after cancel. Only [`BeatScheduler::arm`] stores a wakeup, and each new
//! wakeup carries a fresh token, so a late callback for a wakeup that was
//! cancelled or replaced is recognised and dropped. At most one wakeup is
//! ever live.

/// Identity of one scheduled wakeup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeupToken(u32);

impl WakeupToken {
    /// Raw generation counter
    pub fn generation(&self) -> u32 {
        self.0
    }
}

/// A scheduled beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Wakeup {
    /// Token to hand back when the deadline passes
    pub token: WakeupToken,
    /// Host monotonic time (ms) at which the beat is due
    pub deadline_ms: u64,
}

/// Single-timer beat scheduler
#[derive(Debug, Clone, Default)]
pub struct BeatScheduler {
    pending: Option<Wakeup>,
    generation: u32,
    beats: u32,
}

impl BeatScheduler {
    /// Create an idle scheduler
    pub const fn new() -> Self {
        Self {
            pending: None,
            generation: 0,
            beats: 0,
        }
    }

    /// Arm the first wakeup
    ///
    /// Returns `None` without touching anything if a wakeup is already
    /// pending, so starting twice never produces a second timer.
    pub fn start(&mut self, now_ms: u64, interval_ms: u32) -> Option<Wakeup> {
        if self.pending.is_some() {
            return None;
        }
        self.beats = 0;
        Some(self.arm(now_ms, interval_ms))
    }

    /// Handle a wakeup firing
    ///
    /// If `token` is the pending wakeup, it is replaced by the next one,
    /// `interval_ms` after `now_ms`, and the new wakeup is returned. Stale
    /// or cancelled tokens return `None` and change nothing.
    pub fn fire(&mut self, token: WakeupToken, now_ms: u64, interval_ms: u32) -> Option<Wakeup> {
        match self.pending {
            Some(pending) if pending.token == token => {
                self.beats = self.beats.wrapping_add(1);
                Some(self.arm(now_ms, interval_ms))
            }
            _ => None,
        }
    }

    /// Drop the pending wakeup, returning it if there was one
    pub fn cancel(&mut self) -> Option<Wakeup> {
        self.pending.take()
    }

    /// The pending wakeup
    pub fn pending(&self) -> Option<Wakeup> {
        self.pending
    }

    /// Check if a wakeup is pending
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Beats fired since the last start
    pub fn beat_count(&self) -> u32 {
        self.beats
    }

    fn arm(&mut self, now_ms: u64, interval_ms: u32) -> Wakeup {
        self.generation = self.generation.wrapping_add(1);
        let wakeup = Wakeup {
            token: WakeupToken(self.generation),
            deadline_ms: now_ms + u64::from(interval_ms),
        };
        self.pending = Some(wakeup);
        wakeup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_arms_once() {
        let mut sched = BeatScheduler::new();
        let first = sched.start(1_000, 500).unwrap();
        assert_eq!(first.deadline_ms, 1_500);
        assert!(sched.is_armed());

        // Second start must not stack a timer
        assert!(sched.start(1_100, 500).is_none());
        assert_eq!(sched.pending(), Some(first));
    }

    #[test]
    fn test_fire_replaces_pending() {
        let mut sched = BeatScheduler::new();
        let first = sched.start(0, 500).unwrap();

        let second = sched.fire(first.token, 500, 250).unwrap();
        assert_ne!(second.token, first.token);
        assert_eq!(second.deadline_ms, 750);
        assert_eq!(sched.pending(), Some(second));
        assert_eq!(sched.beat_count(), 1);
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let mut sched = BeatScheduler::new();
        let first = sched.start(0, 500).unwrap();
        let second = sched.fire(first.token, 500, 500).unwrap();

        assert!(sched.fire(first.token, 600, 500).is_none());
        assert_eq!(sched.pending(), Some(second));
        assert_eq!(sched.beat_count(), 1);
    }

    #[test]
    fn test_cancel_invalidates_token() {
        let mut sched = BeatScheduler::new();
        let first = sched.start(0, 500).unwrap();

        assert_eq!(sched.cancel(), Some(first));
        assert!(!sched.is_armed());
        assert!(sched.fire(first.token, 500, 500).is_none());
        assert!(!sched.is_armed());

        // Cancel on an idle scheduler is harmless
        assert_eq!(sched.cancel(), None);
    }

    #[test]
    fn test_restart_after_cancel_uses_new_token() {
        let mut sched = BeatScheduler::new();
        let first = sched.start(0, 500).unwrap();
        sched.cancel();

        let again = sched.start(10_000, 500).unwrap();
        assert_ne!(again.token, first.token);
        assert!(sched.fire(first.token, 10_100, 500).is_none());
        assert!(sched.fire(again.token, 10_500, 500).is_some());
    }
}
