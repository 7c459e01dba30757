//! Haptic output drivers
//!
//! The motor is driven by a single GPIO. Patterns are played by a
//! non-blocking state machine that the owning task polls at the deadlines
//! it hands back.

pub mod motor;

pub use motor::{Polarity, VibeMotor};
