//! Hardware driver implementations
//!
//! Concrete drivers over the `tactus-hal` traits:
//!
//! - Haptic motor (ERM/LRA on a GPIO, switched directly or via a MOSFET)

#![no_std]
#![deny(unsafe_code)]

pub mod haptic;
