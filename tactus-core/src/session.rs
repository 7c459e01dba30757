//! Controller session
//!
//! [`MetronomeSession`] pairs the [`MetronomeCore`] with the settings
//! snapshot it loads from and saves to, and makes the decisions the host
//! loop would otherwise make inline: when Select restarts a stopped
//! metronome, where a configuration update is stored, and when settings
//! must go to flash.
//!
//! Flash is written after Back and after a configuration update that
//! arrives while stopped. While running, changes stay in RAM until Back.

use crate::metronome::{ConfigUpdate, MetronomeCore};
use crate::persist::SettingsSnapshot;
use crate::scheduler::{Wakeup, WakeupToken};
use crate::state::Intent;
use crate::tempo::ConfigOutcome;
use crate::traits::{HapticOutput, SettingsSink};
use crate::vibe::PolicyKind;

/// What an intent did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntentReaction {
    /// Select while stopped: started again from the settings
    Restarted,
    /// Visible state changed
    Changed,
    /// Accepted but nothing changed (tempo at a bound)
    Unchanged,
    /// Up/Down while stopped
    Dropped,
}

/// Metronome core plus its settings
#[derive(Debug, Clone)]
pub struct MetronomeSession {
    core: MetronomeCore,
    settings: SettingsSnapshot,
}

impl MetronomeSession {
    /// Create a stopped session over settings read at boot
    pub fn new(kind: PolicyKind, settings: SettingsSnapshot) -> Self {
        Self {
            core: MetronomeCore::new(kind),
            settings,
        }
    }

    /// Start the core from the settings
    pub fn start(&mut self, now_ms: u64) -> Option<Wakeup> {
        self.core.startup(&self.settings, now_ms)
    }

    /// Route a button intent
    pub fn on_intent<H: HapticOutput>(
        &mut self,
        intent: Intent,
        now_ms: u64,
        haptic: &mut H,
    ) -> IntentReaction {
        if !self.core.is_started() {
            if intent == Intent::ToggleRun {
                self.start(now_ms);
                return IntentReaction::Restarted;
            }
            return IntentReaction::Dropped;
        }
        if self.core.handle_intent(intent, haptic) {
            IntentReaction::Changed
        } else {
            IntentReaction::Unchanged
        }
    }

    /// Apply a configuration update
    ///
    /// Check [`needs_flush`](Self::needs_flush) afterwards: an update while
    /// stopped is only in RAM until flushed.
    pub fn on_config(&mut self, update: ConfigUpdate<'_>) -> ConfigOutcome {
        self.core.apply_config(update, &mut self.settings)
    }

    /// Back button: stop and save into the snapshot
    ///
    /// Returns `false` if already stopped.
    pub fn on_exit<H: HapticOutput>(&mut self, haptic: &mut H) -> bool {
        if !self.core.is_started() {
            return false;
        }
        self.core.shutdown(&mut self.settings, haptic);
        true
    }

    /// Fire the pending wakeup
    pub fn on_wakeup<H: HapticOutput>(
        &mut self,
        token: WakeupToken,
        now_ms: u64,
        haptic: &mut H,
    ) -> Option<Wakeup> {
        self.core.on_wakeup(token, now_ms, haptic)
    }

    /// True when stopped with settings not yet on flash
    pub fn needs_flush(&self) -> bool {
        !self.core.is_started() && self.settings.is_dirty()
    }

    /// Write pending settings to `sink`
    ///
    /// Keys that fail stay pending for the next flush.
    pub async fn flush<W: SettingsSink>(&mut self, sink: &mut W) -> Result<usize, W::Error> {
        self.settings.flush_to(sink).await
    }

    /// The metronome core
    pub fn core(&self) -> &MetronomeCore {
        &self.core
    }

    /// The settings snapshot
    pub fn settings(&self) -> &SettingsSnapshot {
        &self.settings
    }
}
