//! Tempo value and validated tempo mutation
//!
//! The controller is the only place tempo changes, and it keeps the
//! vibration pattern in step with the active policy.

pub mod controller;
pub mod value;

pub use controller::{ConfigOutcome, TempoController};
pub use value::Tempo;
