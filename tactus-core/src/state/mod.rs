//! Run state machine and input intents
//!
//! The run state gates haptic output; intents are the only way the user
//! changes anything.

pub mod intent;
pub mod run;

pub use intent::Intent;
pub use run::RunState;
