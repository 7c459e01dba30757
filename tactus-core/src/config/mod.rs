//! Compiled-in metronome parameters
//!
//! Bounds, defaults and pulse lengths shared by every board.

pub mod defaults;

pub use defaults::*;
