//! Main controller task
//!
//! Owns the [`MetronomeSession`] and is the only place it is touched. Every
//! input (button intents, companion configuration, the Back button and the
//! pending beat) is handled here one at a time, so a beat never observes a
//! half-applied change.

use defmt::*;
use embassy_futures::select::{select4, Either4};
use embassy_time::{Instant, Timer};

use tactus_core::persist::SettingsSnapshot;
use tactus_core::scheduler::{Wakeup, WakeupToken};
use tactus_core::state::Intent;
use tactus_core::tempo::ConfigOutcome;
use tactus_core::{ConfigUpdate, IntentReaction, MetronomeSession};
use tactus_protocol::DeviceMessage;

use crate::channels::{ConfigRequest, CONFIG_CHANNEL, EXIT_REQUEST, INTENT_CHANNEL, TX_CHANNEL};
use crate::config::POLICY;
use crate::haptic::HapticLink;
use crate::storage::SettingsStore;

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Resolve when `wakeup` is due, or never if nothing is armed
async fn beat(wakeup: Option<Wakeup>) -> WakeupToken {
    match wakeup {
        Some(wakeup) => {
            Timer::at(Instant::from_millis(wakeup.deadline_ms)).await;
            wakeup.token
        }
        None => core::future::pending().await,
    }
}

/// Controller task - serialized metronome event loop
#[embassy_executor::task]
pub async fn controller_task(mut store: SettingsStore<'static>, snapshot: SettingsSnapshot) {
    info!("Controller task started ({:?} policy)", POLICY);

    let mut session = MetronomeSession::new(POLICY, snapshot);
    let mut haptic = HapticLink;

    session.start(now_ms());
    announce_start(&session);

    loop {
        match select4(
            INTENT_CHANNEL.receive(),
            CONFIG_CHANNEL.receive(),
            EXIT_REQUEST.wait(),
            beat(session.core().pending_wakeup()),
        )
        .await
        {
            Either4::First(intent) => handle_intent(&mut session, &mut haptic, intent),

            Either4::Second(request) => {
                apply_config(&mut session, &request);
                if session.needs_flush() {
                    flush(&mut session, &mut store).await;
                }
            }

            Either4::Third(()) => {
                if session.on_exit(&mut haptic) {
                    info!("Metronome stopped after {} beats", session.core().beat_count());
                    flush(&mut session, &mut store).await;
                    publish(&session);
                }
            }

            Either4::Fourth(token) => {
                if session.on_wakeup(token, now_ms(), &mut haptic).is_none() {
                    trace!("Stale wakeup {}", token.generation());
                }
            }
        }
    }
}

fn handle_intent(session: &mut MetronomeSession, haptic: &mut HapticLink, intent: Intent) {
    let bpm = session.core().tempo().bpm();

    match session.on_intent(intent, now_ms(), haptic) {
        IntentReaction::Restarted => announce_start(session),
        IntentReaction::Changed => {
            let core = session.core();
            debug!("Intent {:?}: {} BPM, {}", intent, core.tempo().bpm(), core.run_state().label());
            if intent == Intent::ToggleRun {
                info!("Metronome {}", core.run_state().label());
            }
            publish(session);
        }
        IntentReaction::Unchanged => debug!("Intent {:?} ignored at {} BPM", intent, bpm),
        IntentReaction::Dropped => trace!("Intent {:?} while stopped", intent),
    }
}

fn announce_start(session: &MetronomeSession) {
    let core = session.core();
    info!(
        "Metronome started: {} BPM, pulse {} ms",
        core.tempo().bpm(),
        core.pattern().total_duration_ms()
    );
    publish(session);
}

/// Persist what the session has pending
async fn flush(session: &mut MetronomeSession, store: &mut SettingsStore<'static>) {
    match session.flush(store).await {
        Ok(written) => info!("Settings saved ({} keys)", written),
        // Values stay pending and are retried on the next flush
        Err(e) => error!("Failed to save settings: {:?}", e),
    }
}

/// Apply a companion configuration update
fn apply_config(session: &mut MetronomeSession, request: &ConfigRequest) {
    let update = ConfigUpdate {
        vibe_duration: request.vibe_duration.as_deref(),
    };
    match session.on_config(update) {
        ConfigOutcome::Applied(ms) => {
            info!("Pulse length set to {} ms", ms);
            publish(session);
        }
        ConfigOutcome::Malformed => {
            warn!("Rejected pulse length {:?}", update.vibe_duration);
        }
        ConfigOutcome::Ignored => {
            debug!("Pulse length is fixed by the threshold policy");
        }
        ConfigOutcome::Absent => {
            trace!("Config without pulse length");
        }
    }
}

/// Report the current state to the companion
fn publish(session: &MetronomeSession) {
    let core = session.core();
    let render = core.render();
    trace!("Render: {} {}", render.tempo_text.as_str(), render.run_label);

    let status = DeviceMessage::Status {
        tempo: core.tempo().bpm(),
        running: core.is_started() && core.run_state().is_running(),
        pattern_ms: core.pattern().total_duration_ms(),
    };
    if TX_CHANNEL.try_send(status).is_err() {
        warn!("TX channel full, dropping status");
    }
}
