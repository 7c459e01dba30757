//! Metronome core
//!
//! [`MetronomeCore`] owns tempo, vibration policy, run state and the beat
//! scheduler. The host constructs exactly one and drives it from a single
//! event loop:
//!
//! ```text
//! startup(store, now)          -> first Wakeup
//! handle_intent(intent)        -> state changed?
//! apply_config(update, store)  -> ConfigOutcome
//! on_wakeup(token, now)        -> next Wakeup (pulse enqueued if ON)
//! shutdown(store)              -> timer cancelled, pulse cancelled, settings written
//! ```
//!
//! Changes made between two wakeups take effect on the next one; a wakeup
//! already being handled is never affected.
//!
//! Entering OFF cancels the pulse that may still be playing, so the wrist
//! goes quiet the moment the user stops the metronome.

use crate::render::RenderState;
use crate::scheduler::{BeatScheduler, Wakeup, WakeupToken};
use crate::state::{Intent, RunState};
use crate::tempo::{ConfigOutcome, Tempo, TempoController};
use crate::traits::{HapticOutput, PersistentStore, SettingKey};
use crate::vibe::{PolicyKind, VibePattern};

/// Configuration message from the companion link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigUpdate<'a> {
    /// Pulse length as delivered (decimal string), if present
    pub vibe_duration: Option<&'a str>,
}

/// Beat scheduler and tempo/vibration state machine
#[derive(Debug, Clone)]
pub struct MetronomeCore {
    tempo: TempoController,
    run: RunState,
    scheduler: BeatScheduler,
    started: bool,
}

impl MetronomeCore {
    /// Create a stopped core for the given policy
    pub fn new(kind: PolicyKind) -> Self {
        Self {
            tempo: TempoController::new(kind),
            run: RunState::On,
            scheduler: BeatScheduler::new(),
            started: false,
        }
    }

    /// Load settings, reset the run state to ON and arm the first beat
    ///
    /// Calling this while already started changes nothing and returns
    /// `None`.
    pub fn startup<S: PersistentStore>(&mut self, store: &S, now_ms: u64) -> Option<Wakeup> {
        if self.started {
            return None;
        }
        self.tempo.load_from_store(store);
        self.run = RunState::On;
        self.started = true;
        self.scheduler
            .start(now_ms, self.tempo.tempo().beat_interval_ms())
    }

    /// Cancel the beat and any pulse, then persist settings
    ///
    /// A core that was never started (or already shut down) is left
    /// untouched and nothing is written, so stored values are never
    /// clobbered by defaults.
    pub fn shutdown<S: PersistentStore, H: HapticOutput>(&mut self, store: &mut S, haptic: &mut H) {
        if !self.started {
            return;
        }
        self.scheduler.cancel();
        haptic.cancel();
        self.tempo.save_to_store(store);
        self.started = false;
    }

    /// Apply one user intent
    ///
    /// Returns `true` if visible state changed. Intents before startup are
    /// dropped.
    pub fn handle_intent<H: HapticOutput>(&mut self, intent: Intent, haptic: &mut H) -> bool {
        if !self.started {
            return false;
        }
        match intent {
            Intent::Increase => self.tempo.increase(),
            Intent::Decrease => self.tempo.decrease(),
            Intent::ToggleRun => {
                self.run = self.run.toggle();
                if !self.run.is_running() {
                    haptic.cancel();
                }
                true
            }
        }
    }

    /// Apply a configuration message
    ///
    /// While stopped an applied pulse length is also written to `store`,
    /// so the next [`startup`](Self::startup) keeps it instead of reloading
    /// the old value. While running the value reaches the store at
    /// shutdown.
    pub fn apply_config<S: PersistentStore>(
        &mut self,
        update: ConfigUpdate<'_>,
        store: &mut S,
    ) -> ConfigOutcome {
        let outcome = match update.vibe_duration {
            Some(raw) => self.tempo.set_configured_vibe_duration(raw),
            None => ConfigOutcome::Absent,
        };
        if let (ConfigOutcome::Applied(duration_ms), false) = (outcome, self.started) {
            store.write_int(SettingKey::VibeDuration, duration_ms as i32);
        }
        outcome
    }

    /// Handle the pending wakeup firing at `now_ms`
    ///
    /// Re-arms with the current tempo first, then enqueues one pulse with
    /// the current pattern if running. Returns the next wakeup, or `None`
    /// if `token` is stale (cancelled or replaced), in which case nothing
    /// happens.
    pub fn on_wakeup<H: HapticOutput>(
        &mut self,
        token: WakeupToken,
        now_ms: u64,
        haptic: &mut H,
    ) -> Option<Wakeup> {
        let interval_ms = self.tempo.tempo().beat_interval_ms();
        let next = self.scheduler.fire(token, now_ms, interval_ms)?;
        if self.run.is_running() {
            haptic.enqueue(self.tempo.pattern());
        }
        Some(next)
    }

    /// Wakeup the host should currently be waiting for
    pub fn pending_wakeup(&self) -> Option<Wakeup> {
        self.scheduler.pending()
    }

    /// Current render model
    pub fn render(&self) -> RenderState {
        RenderState::new(self.tempo.tempo(), self.run)
    }

    /// Current tempo
    pub fn tempo(&self) -> Tempo {
        self.tempo.tempo()
    }

    /// Current run state
    pub fn run_state(&self) -> RunState {
        self.run
    }

    /// Pattern played on the next beat
    pub fn pattern(&self) -> &VibePattern {
        self.tempo.pattern()
    }

    /// Configured pulse length (configured policy only)
    pub fn vibe_duration_ms(&self) -> Option<u32> {
        self.tempo.vibe_duration_ms()
    }

    /// Policy this core was built with
    pub fn policy_kind(&self) -> PolicyKind {
        self.tempo.policy().kind()
    }

    /// Beats fired since startup
    pub fn beat_count(&self) -> u32 {
        self.scheduler.beat_count()
    }

    /// Check if the core has been started and not shut down
    pub fn is_started(&self) -> bool {
        self.started
    }
}
