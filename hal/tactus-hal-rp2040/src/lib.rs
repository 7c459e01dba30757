//! RP2040-specific HAL for the metronome firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `tactus-hal` traits:
//!
//! - GPIO output adapter for the haptic motor (implements `tactus_hal::OutputPin`)
//! - Flash storage driver (implements `tactus_hal::FlashStorage`)

#![no_std]

pub mod flash;
pub mod gpio;

// Re-export shared traits from tactus-hal for convenience
pub use tactus_hal::{FlashStorage as FlashStorageTrait, OutputPin as OutputPinTrait, StorageKey};
