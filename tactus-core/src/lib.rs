//! Board-agnostic core logic for the haptic metronome
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Tempo bounds and stepping
//! - Vibration pattern derivation (threshold or configured policy)
//! - Run state machine (ON/OFF)
//! - Beat scheduler (single re-arming wakeup)
//! - Persistence glue and render model
//! - [`MetronomeCore`], which owns all of the above
//! - [`MetronomeSession`], the host loop's decisions around the core
//!
//! The host drives the core from one serialized event loop: it delivers
//! input intents and configuration updates, fires the wakeup the core asks
//! for, and provides the persistent store and haptic output.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod metronome;
pub mod persist;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod tempo;
pub mod traits;
pub mod vibe;

pub use metronome::{ConfigUpdate, MetronomeCore};
pub use session::{IntentReaction, MetronomeSession};
