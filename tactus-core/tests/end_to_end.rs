//! Whole-core scenarios driven the way the firmware drives them

use tactus_core::persist::SettingsSnapshot;
use tactus_core::render::ColorHint;
use tactus_core::scheduler::Wakeup;
use tactus_core::state::{Intent, RunState};
use tactus_core::tempo::ConfigOutcome;
use tactus_core::traits::{HapticOutput, PersistentStore, SettingKey};
use tactus_core::vibe::{PolicyKind, VibePattern};
use tactus_core::{ConfigUpdate, MetronomeCore};

#[derive(Default)]
struct RecordingHaptic {
    pulses: Vec<u32>,
    cancels: u32,
}

impl HapticOutput for RecordingHaptic {
    fn enqueue(&mut self, pattern: &VibePattern) {
        self.pulses.push(pattern.total_duration_ms());
    }

    fn cancel(&mut self) {
        self.cancels += 1;
    }
}

/// Fire the pending wakeup exactly on its deadline
fn tick(core: &mut MetronomeCore, haptic: &mut RecordingHaptic) -> Wakeup {
    let pending = core.pending_wakeup().expect("wakeup armed");
    core.on_wakeup(pending.token, pending.deadline_ms, haptic)
        .expect("pending token is current")
}

#[test]
fn test_threshold_pulse_switches_at_256() {
    let mut core = MetronomeCore::new(PolicyKind::Threshold);
    let mut haptic = RecordingHaptic::default();
    core.startup(&SettingsSnapshot::new(), 0);
    assert_eq!(core.pattern(), &VibePattern::single(96));

    for step in 1..=64 {
        assert!(core.handle_intent(Intent::Increase, &mut haptic));
        let expected = if step == 64 { 64 } else { 96 };
        assert_eq!(core.pattern().pulse_ms(), Some(expected), "step {}", step);
    }
    assert_eq!(core.tempo().bpm(), 256);

    core.handle_intent(Intent::Increase, &mut haptic);
    assert_eq!(core.tempo().bpm(), 258);
    assert_eq!(core.pattern(), &VibePattern::single(64));

    tick(&mut core, &mut haptic);
    assert_eq!(haptic.pulses, vec![64]);
}

#[test]
fn test_beats_follow_tempo_interval() {
    let mut core = MetronomeCore::new(PolicyKind::Configured);
    let mut haptic = RecordingHaptic::default();
    let first = core.startup(&SettingsSnapshot::new(), 1_000).unwrap();
    assert_eq!(first.deadline_ms, 1_468);

    let second = tick(&mut core, &mut haptic);
    assert_eq!(second.deadline_ms, 1_936);

    // Slow down to 60 BPM: one beat per second from the next re-arm
    for _ in 0..34 {
        core.handle_intent(Intent::Decrease, &mut haptic);
    }
    assert_eq!(core.tempo().bpm(), 60);
    let third = tick(&mut core, &mut haptic);
    assert_eq!(third.deadline_ms, 2_936);
    assert_eq!(haptic.pulses, vec![48, 48]);
    assert_eq!(core.beat_count(), 2);
}

#[test]
fn test_late_wakeup_rearms_from_actual_time() {
    let mut core = MetronomeCore::new(PolicyKind::Configured);
    let mut haptic = RecordingHaptic::default();
    let first = core.startup(&SettingsSnapshot::new(), 0).unwrap();

    let next = core.on_wakeup(first.token, 500, &mut haptic).unwrap();
    assert_eq!(next.deadline_ms, 968);
}

#[test]
fn test_settings_survive_restart() {
    let mut store = SettingsSnapshot::new();
    let mut haptic = RecordingHaptic::default();

    let mut core = MetronomeCore::new(PolicyKind::Configured);
    core.startup(&store, 0);
    for _ in 0..6 {
        core.handle_intent(Intent::Increase, &mut haptic);
    }
    core.apply_config(
        ConfigUpdate {
            vibe_duration: Some(" 150 "),
        },
        &mut store,
    );
    core.handle_intent(Intent::ToggleRun, &mut haptic);
    core.shutdown(&mut store, &mut haptic);

    assert_eq!(store.read_int(SettingKey::Tempo), 140);
    assert_eq!(store.read_int(SettingKey::VibeDuration), 150);

    let mut restarted = MetronomeCore::new(PolicyKind::Configured);
    restarted.startup(&store, 0);
    assert_eq!(restarted.tempo().bpm(), 140);
    assert_eq!(restarted.vibe_duration_ms(), Some(150));
    // Run state is not persisted
    assert_eq!(restarted.run_state(), RunState::On);
}

#[test]
fn test_first_boot_uses_defaults() {
    let mut core = MetronomeCore::new(PolicyKind::Configured);
    core.startup(&SettingsSnapshot::new(), 0);
    assert_eq!(core.tempo().bpm(), 128);
    assert_eq!(core.vibe_duration_ms(), Some(48));

    let render = core.render();
    assert_eq!(render.tempo_text.as_str(), "128");
    assert_eq!(render.run_label, "ON");
    assert_eq!(render.run_color, ColorHint::Positive);
}

#[test]
fn test_out_of_range_store_is_clamped() {
    let store = SettingsSnapshot::new()
        .with(SettingKey::Tempo, 9_000)
        .with(SettingKey::VibeDuration, -5);
    let mut core = MetronomeCore::new(PolicyKind::Configured);
    core.startup(&store, 0);
    assert_eq!(core.tempo().bpm(), 512);
    assert_eq!(core.vibe_duration_ms(), Some(1));
}

#[test]
fn test_toggle_twice_restores_pulses() {
    let mut core = MetronomeCore::new(PolicyKind::Threshold);
    let mut haptic = RecordingHaptic::default();
    core.startup(&SettingsSnapshot::new(), 0);

    core.handle_intent(Intent::ToggleRun, &mut haptic);
    tick(&mut core, &mut haptic);
    assert!(haptic.pulses.is_empty());
    assert_eq!(core.render().run_color, ColorHint::Negative);

    core.handle_intent(Intent::ToggleRun, &mut haptic);
    tick(&mut core, &mut haptic);
    assert_eq!(haptic.pulses, vec![96]);
    assert_eq!(haptic.cancels, 1);
}

#[test]
fn test_config_edge_cases() {
    let mut store = SettingsSnapshot::new();
    let mut core = MetronomeCore::new(PolicyKind::Configured);
    core.startup(&store, 0);

    let cases = [
        ("0", ConfigOutcome::Applied(1), Some(1)),
        ("5000", ConfigOutcome::Applied(1000), Some(1000)),
        ("12abc", ConfigOutcome::Malformed, Some(1000)),
        ("", ConfigOutcome::Malformed, Some(1000)),
        ("99999999999", ConfigOutcome::Malformed, Some(1000)),
        ("-3", ConfigOutcome::Applied(1), Some(1)),
    ];
    for (raw, outcome, duration) in cases {
        assert_eq!(
            core.apply_config(ConfigUpdate { vibe_duration: Some(raw) }, &mut store),
            outcome,
            "input {:?}",
            raw
        );
        assert_eq!(core.vibe_duration_ms(), duration, "input {:?}", raw);
    }
}

#[test]
fn test_threshold_build_ignores_config() {
    let mut core = MetronomeCore::new(PolicyKind::Threshold);
    core.startup(&SettingsSnapshot::new(), 0);
    assert_eq!(
        core.apply_config(
            ConfigUpdate {
                vibe_duration: Some("200")
            },
            &mut SettingsSnapshot::new()
        ),
        ConfigOutcome::Ignored
    );
    assert_eq!(core.pattern(), &VibePattern::single(96));
}

#[test]
fn test_shutdown_before_startup_keeps_store() {
    let mut store = SettingsSnapshot::new().with(SettingKey::Tempo, 300);
    let mut haptic = RecordingHaptic::default();
    let mut core = MetronomeCore::new(PolicyKind::Threshold);
    core.shutdown(&mut store, &mut haptic);
    assert!(store.pending_writes().is_empty());
    assert_eq!(store.read_int(SettingKey::Tempo), 300);
}

#[test]
fn test_config_between_exit_and_restart_is_kept() {
    let mut store = SettingsSnapshot::new();
    let mut haptic = RecordingHaptic::default();
    let mut core = MetronomeCore::new(PolicyKind::Configured);

    core.startup(&store, 0);
    core.shutdown(&mut store, &mut haptic);

    let outcome = core.apply_config(
        ConfigUpdate {
            vibe_duration: Some("200"),
        },
        &mut store,
    );
    assert_eq!(outcome, ConfigOutcome::Applied(200));

    core.startup(&store, 5_000);
    assert_eq!(core.vibe_duration_ms(), Some(200));
    tick(&mut core, &mut haptic);
    assert_eq!(haptic.pulses, vec![200]);
}
