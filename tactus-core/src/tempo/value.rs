//! Bounded tempo in beats per minute

use crate::config::{DEFAULT_TEMPO, MAX_TEMPO, MIN_TEMPO, MS_PER_MINUTE, TEMPO_STEP};

/// Tempo in beats per minute
///
/// Always within [`Tempo::MIN`]..=[`Tempo::MAX`]; there is no way to build
/// one outside that range, so the beat interval division is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tempo(u16);

impl Tempo {
    /// Slowest tempo
    pub const MIN: Tempo = Tempo(MIN_TEMPO);
    /// Fastest tempo
    pub const MAX: Tempo = Tempo(MAX_TEMPO);
    /// Startup tempo when nothing is stored
    pub const DEFAULT: Tempo = Tempo(DEFAULT_TEMPO);

    /// Create a tempo if `bpm` is within bounds
    pub const fn from_bpm(bpm: u16) -> Option<Self> {
        if bpm >= MIN_TEMPO && bpm <= MAX_TEMPO {
            Some(Tempo(bpm))
        } else {
            None
        }
    }

    /// Create a tempo from an untrusted stored integer, clamping into bounds
    pub fn clamped(raw: i32) -> Self {
        let bpm = raw.clamp(MIN_TEMPO as i32, MAX_TEMPO as i32);
        Tempo(bpm as u16)
    }

    /// Beats per minute
    pub const fn bpm(self) -> u16 {
        self.0
    }

    /// Milliseconds between beats (integer division, truncating)
    pub const fn beat_interval_ms(self) -> u32 {
        MS_PER_MINUTE / self.0 as u32
    }

    /// One step faster, or `None` if that would pass [`Tempo::MAX`]
    pub fn step_up(self) -> Option<Self> {
        let next = self.0 + TEMPO_STEP;
        (next <= MAX_TEMPO).then_some(Tempo(next))
    }

    /// One step slower, or `None` if that would pass [`Tempo::MIN`]
    pub fn step_down(self) -> Option<Self> {
        let next = self.0.checked_sub(TEMPO_STEP)?;
        (next >= MIN_TEMPO).then_some(Tempo(next))
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bpm_bounds() {
        assert_eq!(Tempo::from_bpm(16), Some(Tempo::MIN));
        assert_eq!(Tempo::from_bpm(512), Some(Tempo::MAX));
        assert_eq!(Tempo::from_bpm(15), None);
        assert_eq!(Tempo::from_bpm(513), None);
        assert_eq!(Tempo::from_bpm(0), None);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Tempo::clamped(-40).bpm(), 16);
        assert_eq!(Tempo::clamped(0).bpm(), 16);
        assert_eq!(Tempo::clamped(200).bpm(), 200);
        assert_eq!(Tempo::clamped(100_000).bpm(), 512);
    }

    #[test]
    fn test_beat_interval_truncates() {
        assert_eq!(Tempo::DEFAULT.beat_interval_ms(), 468); // 60000 / 128 = 468.75
        assert_eq!(Tempo::MIN.beat_interval_ms(), 3750);
        assert_eq!(Tempo::MAX.beat_interval_ms(), 117); // 117.1875
        assert_eq!(Tempo::from_bpm(120).unwrap().beat_interval_ms(), 500);
    }

    #[test]
    fn test_step_up_stops_at_max() {
        assert_eq!(Tempo::from_bpm(510).unwrap().step_up(), Some(Tempo::MAX));
        assert_eq!(Tempo::MAX.step_up(), None);
        // An odd stored tempo can never step past the ceiling
        assert_eq!(Tempo::from_bpm(511).unwrap().step_up(), None);
    }

    #[test]
    fn test_step_down_stops_at_min() {
        assert_eq!(Tempo::from_bpm(18).unwrap().step_down(), Some(Tempo::MIN));
        assert_eq!(Tempo::MIN.step_down(), None);
        assert_eq!(Tempo::from_bpm(17).unwrap().step_down(), None);
    }

    #[test]
    fn test_default() {
        assert_eq!(Tempo::default().bpm(), 128);
    }
}
