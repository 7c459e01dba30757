//! Inter-task communication channels
//!
//! Static embassy-sync primitives connecting the tasks. The controller task
//! is the only consumer of user input and configuration, so every change
//! to the metronome goes through one serialized loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::String;

use tactus_core::state::Intent;
use tactus_core::vibe::VibePattern;
use tactus_protocol::DeviceMessage;

/// Channel capacity for button intents
const INTENT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for configuration updates
const CONFIG_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outgoing companion messages
const TX_CHANNEL_SIZE: usize = 8;

/// Longest pulse-length text forwarded to the controller
pub const CONFIG_TEXT_LEN: usize = 16;

/// Configuration received from the companion
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigRequest {
    /// Pulse length text, if the message carried one
    pub vibe_duration: Option<String<CONFIG_TEXT_LEN>>,
}

/// Haptic task commands
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HapticCommand {
    /// Play a pattern, replacing whatever is playing
    Play(VibePattern),
    /// Motor off now
    Stop,
}

/// Intents from the buttons (Up, Down, Select)
pub static INTENT_CHANNEL: Channel<CriticalSectionRawMutex, Intent, INTENT_CHANNEL_SIZE> =
    Channel::new();

/// Configuration updates from the companion link
pub static CONFIG_CHANNEL: Channel<CriticalSectionRawMutex, ConfigRequest, CONFIG_CHANNEL_SIZE> =
    Channel::new();

/// Back button: leave the metronome
pub static EXIT_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Latest haptic command (a newer command supersedes an unread one)
pub static HAPTIC_CMD: Signal<CriticalSectionRawMutex, HapticCommand> = Signal::new();

/// Messages to send to the companion
pub static TX_CHANNEL: Channel<CriticalSectionRawMutex, DeviceMessage, TX_CHANNEL_SIZE> =
    Channel::new();
