//! Input intents delivered by the host input layer
//!
//! Debouncing and repeat rate are handled upstream; every intent that
//! arrives here is applied.

/// User intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Intent {
    /// Raise tempo by one step
    Increase,
    /// Lower tempo by one step
    Decrease,
    /// Flip the run state
    ToggleRun,
}
