//! Beat scheduler
//!
//! Owns the single pending wakeup and re-arms it on every beat.

pub mod beat;

pub use beat::{BeatScheduler, Wakeup, WakeupToken};
