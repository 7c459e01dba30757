//! Device configuration
//!
//! Generated at build time from `device.toml` (see `build.rs`). Pin
//! assignments are macros taking the peripherals struct, so the pin type
//! is still checked by the compiler:
//!
//! ```ignore
//! let motor = Output::new(haptic_pin!(p), Level::Low);
//! ```

use embassy_time::Duration;
use tactus_drivers::haptic::Polarity;

include!(concat!(env!("OUT_DIR"), "/device_config.rs"));

/// Motor polarity from `HAPTIC_ACTIVE_LOW`
pub const fn haptic_polarity() -> Polarity {
    if HAPTIC_ACTIVE_LOW {
        Polarity::ActiveLow
    } else {
        Polarity::ActiveHigh
    }
}

/// Button timings from `device.toml`
#[derive(Debug, Clone, Copy)]
pub struct ButtonTiming {
    pub debounce: Duration,
    pub hold_delay: Duration,
    pub repeat: Duration,
}

impl ButtonTiming {
    pub const fn from_config() -> Self {
        Self {
            debounce: Duration::from_millis(BUTTON_DEBOUNCE_MS),
            hold_delay: Duration::from_millis(BUTTON_HOLD_DELAY_MS),
            repeat: Duration::from_millis(BUTTON_REPEAT_MS),
        }
    }
}
