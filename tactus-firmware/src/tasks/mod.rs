//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod buttons;
pub mod companion_rx;
pub mod companion_tx;
pub mod controller;
pub mod haptic;

pub use buttons::{back_button_task, repeat_button_task, select_button_task};
pub use companion_rx::companion_rx_task;
pub use companion_tx::companion_tx_task;
pub use controller::controller_task;
pub use haptic::haptic_task;
