//! Tempo controller
//!
//! Owns the tempo and the vibration policy, enforces bounds and step size,
//! and keeps the beat pattern derived from both.

use crate::config::DEFAULT_VIBE_DURATION_MS;
use crate::traits::{PersistentStore, SettingKey};
use crate::vibe::{clamp_vibe_duration, parse_vibe_duration, PolicyKind, VibePattern, VibrationPolicy};

use super::value::Tempo;

/// Result of applying a configured pulse length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigOutcome {
    /// The message carried no pulse length
    Absent,
    /// New pulse length in effect (after clamping)
    Applied(u32),
    /// Value was not an integer; previous length kept
    Malformed,
    /// Build uses the threshold policy; nothing to configure
    Ignored,
}

/// Validated tempo mutation and vibration pattern derivation
#[derive(Debug, Clone)]
pub struct TempoController {
    tempo: Tempo,
    policy: VibrationPolicy,
    pattern: VibePattern,
}

impl TempoController {
    /// Create a controller at the default tempo and pulse length
    pub fn new(kind: PolicyKind) -> Self {
        let tempo = Tempo::DEFAULT;
        let policy = VibrationPolicy::new(kind, DEFAULT_VIBE_DURATION_MS);
        Self {
            tempo,
            policy,
            pattern: policy.pattern_for(tempo),
        }
    }

    /// Current tempo
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Active policy
    pub fn policy(&self) -> VibrationPolicy {
        self.policy
    }

    /// Pattern to play on the next beat
    pub fn pattern(&self) -> &VibePattern {
        &self.pattern
    }

    /// Configured pulse length (configured policy only)
    pub fn vibe_duration_ms(&self) -> Option<u32> {
        self.policy.vibe_duration_ms()
    }

    /// Step the tempo up
    ///
    /// Returns `false` and leaves everything untouched at the ceiling.
    pub fn increase(&mut self) -> bool {
        match self.tempo.step_up() {
            Some(next) => {
                self.set_tempo(next);
                true
            }
            None => false,
        }
    }

    /// Step the tempo down
    ///
    /// Returns `false` and leaves everything untouched at the floor.
    pub fn decrease(&mut self) -> bool {
        match self.tempo.step_down() {
            Some(next) => {
                self.set_tempo(next);
                true
            }
            None => false,
        }
    }

    fn set_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo;
        if self.policy.follows_tempo() {
            self.pattern = self.policy.pattern_for(tempo);
        }
    }

    fn set_vibe_duration(&mut self, duration_ms: u32) {
        self.policy = VibrationPolicy::Configured(duration_ms);
        self.pattern = VibePattern::single(duration_ms);
    }

    /// Apply a pulse length string from the companion link
    pub fn set_configured_vibe_duration(&mut self, raw: &str) -> ConfigOutcome {
        if !matches!(self.policy, VibrationPolicy::Configured(_)) {
            return ConfigOutcome::Ignored;
        }
        match parse_vibe_duration(raw) {
            Some(duration_ms) => {
                self.set_vibe_duration(duration_ms);
                ConfigOutcome::Applied(duration_ms)
            }
            None => ConfigOutcome::Malformed,
        }
    }

    /// Restore tempo (and pulse length, configured policy) from `store`
    ///
    /// Missing keys fall back to the compiled-in defaults. Values outside
    /// the accepted ranges are clamped.
    pub fn load_from_store<S: PersistentStore>(&mut self, store: &S) {
        self.tempo = if store.exists(SettingKey::Tempo) {
            Tempo::clamped(store.read_int(SettingKey::Tempo))
        } else {
            Tempo::DEFAULT
        };

        if let VibrationPolicy::Configured(_) = self.policy {
            let duration_ms = if store.exists(SettingKey::VibeDuration) {
                clamp_vibe_duration(store.read_int(SettingKey::VibeDuration))
            } else {
                DEFAULT_VIBE_DURATION_MS
            };
            self.policy = VibrationPolicy::Configured(duration_ms);
        }

        self.pattern = self.policy.pattern_for(self.tempo);
    }

    /// Write tempo (and pulse length, configured policy) to `store`
    pub fn save_to_store<S: PersistentStore>(&self, store: &mut S) {
        store.write_int(SettingKey::Tempo, i32::from(self.tempo.bpm()));
        if let Some(duration_ms) = self.policy.vibe_duration_ms() {
            store.write_int(SettingKey::VibeDuration, duration_ms as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::SettingsSnapshot;

    #[test]
    fn test_defaults() {
        let threshold = TempoController::new(PolicyKind::Threshold);
        assert_eq!(threshold.tempo().bpm(), 128);
        assert_eq!(threshold.pattern(), &VibePattern::single(96));
        assert_eq!(threshold.vibe_duration_ms(), None);

        let configured = TempoController::new(PolicyKind::Configured);
        assert_eq!(configured.pattern(), &VibePattern::single(48));
        assert_eq!(configured.vibe_duration_ms(), Some(48));
    }

    #[test]
    fn test_increase_and_decrease_step_by_two() {
        let mut ctl = TempoController::new(PolicyKind::Threshold);
        assert!(ctl.increase());
        assert_eq!(ctl.tempo().bpm(), 130);
        assert!(ctl.decrease());
        assert!(ctl.decrease());
        assert_eq!(ctl.tempo().bpm(), 126);
    }

    #[test]
    fn test_clamp_at_max() {
        let mut ctl = TempoController::new(PolicyKind::Threshold);
        while ctl.increase() {}
        assert_eq!(ctl.tempo(), Tempo::MAX);
        assert!(!ctl.increase());
        assert_eq!(ctl.tempo(), Tempo::MAX);
    }

    #[test]
    fn test_clamp_at_min() {
        let mut ctl = TempoController::new(PolicyKind::Threshold);
        while ctl.decrease() {}
        assert_eq!(ctl.tempo(), Tempo::MIN);
        assert!(!ctl.decrease());
        assert_eq!(ctl.tempo(), Tempo::MIN);
    }

    #[test]
    fn test_threshold_pattern_follows_tempo() {
        let store = SettingsSnapshot::new().with(SettingKey::Tempo, 254);
        let mut ctl = TempoController::new(PolicyKind::Threshold);
        ctl.load_from_store(&store);
        assert_eq!(ctl.pattern().pulse_ms(), Some(96));

        ctl.increase();
        assert_eq!(ctl.tempo().bpm(), 256);
        assert_eq!(ctl.pattern().pulse_ms(), Some(64));

        ctl.decrease();
        assert_eq!(ctl.pattern().pulse_ms(), Some(96));
    }

    #[test]
    fn test_configured_pattern_ignores_tempo() {
        let mut ctl = TempoController::new(PolicyKind::Configured);
        for _ in 0..100 {
            ctl.increase();
        }
        assert_eq!(ctl.pattern(), &VibePattern::single(48));
    }

    #[test]
    fn test_set_configured_vibe_duration() {
        let mut ctl = TempoController::new(PolicyKind::Configured);
        assert_eq!(
            ctl.set_configured_vibe_duration("80"),
            ConfigOutcome::Applied(80)
        );
        assert_eq!(ctl.pattern(), &VibePattern::single(80));
        assert_eq!(ctl.vibe_duration_ms(), Some(80));
    }

    #[test]
    fn test_malformed_duration_keeps_previous() {
        let mut ctl = TempoController::new(PolicyKind::Configured);
        ctl.set_configured_vibe_duration("70");
        assert_eq!(
            ctl.set_configured_vibe_duration("fast"),
            ConfigOutcome::Malformed
        );
        assert_eq!(ctl.vibe_duration_ms(), Some(70));
        assert_eq!(ctl.pattern(), &VibePattern::single(70));
    }

    #[test]
    fn test_threshold_ignores_configuration() {
        let mut ctl = TempoController::new(PolicyKind::Threshold);
        assert_eq!(
            ctl.set_configured_vibe_duration("80"),
            ConfigOutcome::Ignored
        );
        assert_eq!(ctl.pattern(), &VibePattern::single(96));
    }

    #[test]
    fn test_load_missing_keys_uses_defaults() {
        let mut ctl = TempoController::new(PolicyKind::Configured);
        ctl.set_configured_vibe_duration("200");
        ctl.increase();

        ctl.load_from_store(&SettingsSnapshot::new());
        assert_eq!(ctl.tempo().bpm(), 128);
        assert_eq!(ctl.vibe_duration_ms(), Some(48));
    }

    #[test]
    fn test_load_clamps_corrupt_values() {
        let store = SettingsSnapshot::new()
            .with(SettingKey::Tempo, 9000)
            .with(SettingKey::VibeDuration, 0);
        let mut ctl = TempoController::new(PolicyKind::Configured);
        ctl.load_from_store(&store);
        assert_eq!(ctl.tempo(), Tempo::MAX);
        assert_eq!(ctl.vibe_duration_ms(), Some(1));
    }

    #[test]
    fn test_save_writes_policy_keys() {
        let mut threshold_store = SettingsSnapshot::new();
        TempoController::new(PolicyKind::Threshold).save_to_store(&mut threshold_store);
        assert_eq!(threshold_store.get(SettingKey::Tempo), Some(128));
        assert_eq!(threshold_store.get(SettingKey::VibeDuration), None);

        let mut configured_store = SettingsSnapshot::new();
        TempoController::new(PolicyKind::Configured).save_to_store(&mut configured_store);
        assert_eq!(configured_store.get(SettingKey::Tempo), Some(128));
        assert_eq!(configured_store.get(SettingKey::VibeDuration), Some(48));
    }
}
