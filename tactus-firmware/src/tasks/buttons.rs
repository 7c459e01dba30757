//! Button tasks
//!
//! Buttons pull their GPIO low when pressed. Up and Down repeat their
//! intent while held; Select toggles the metronome; Back leaves it.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{with_timeout, Timer};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use tactus_core::state::Intent;

use crate::channels::{EXIT_REQUEST, INTENT_CHANNEL};
use crate::config::ButtonTiming;

/// Wait for a debounced press
///
/// Returns once the pin went low and is still low after the debounce time.
async fn wait_for_press<B: Wait + InputPin>(button: &mut B, timing: &ButtonTiming) {
    loop {
        if button.wait_for_falling_edge().await.is_err() {
            continue;
        }
        Timer::after(timing.debounce).await;
        if button.is_low().unwrap_or(false) {
            return;
        }
    }
}

/// Wait for release, then let the contact settle
async fn wait_for_release<B: Wait>(button: &mut B, timing: &ButtonTiming) {
    let _ = button.wait_for_high().await;
    Timer::after(timing.debounce).await;
}

fn send_intent(intent: Intent) {
    if INTENT_CHANNEL.try_send(intent).is_err() {
        warn!("Intent channel full, dropping {:?}", intent);
    }
}

/// Emit `intent` once per press and repeatedly while the button is held
///
/// The first repeat follows after the hold delay, later ones every repeat
/// interval until release.
pub async fn run_repeat_button<B: Wait + InputPin>(
    button: &mut B,
    intent: Intent,
    timing: ButtonTiming,
) -> ! {
    loop {
        wait_for_press(button, &timing).await;
        send_intent(intent);

        let mut wait = timing.hold_delay;
        // Timeout means still held
        while with_timeout(wait, button.wait_for_high()).await.is_err() {
            trace!("Repeat {:?}", intent);
            send_intent(intent);
            wait = timing.repeat;
        }
        Timer::after(timing.debounce).await;
    }
}

/// Up or Down button
#[embassy_executor::task(pool_size = 2)]
pub async fn repeat_button_task(mut button: Input<'static>, intent: Intent, timing: ButtonTiming) {
    info!("Button task started for {:?}", intent);
    run_repeat_button(&mut button, intent, timing).await
}

/// Select button: toggle ON/OFF, or restart after Back
#[embassy_executor::task]
pub async fn select_button_task(mut button: Input<'static>, timing: ButtonTiming) {
    info!("Select button task started");
    loop {
        wait_for_press(&mut button, &timing).await;
        debug!("Select pressed");
        send_intent(Intent::ToggleRun);
        wait_for_release(&mut button, &timing).await;
    }
}

/// Back button: leave the metronome
#[embassy_executor::task]
pub async fn back_button_task(mut button: Input<'static>, timing: ButtonTiming) {
    info!("Back button task started");
    loop {
        wait_for_press(&mut button, &timing).await;
        debug!("Back pressed");
        EXIT_REQUEST.signal(());
        wait_for_release(&mut button, &timing).await;
    }
}
