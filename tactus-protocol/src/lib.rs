//! Companion Link Protocol
//!
//! UART protocol between the wearable and its companion (phone bridge or
//! desktop tool). The companion delivers configuration; the wearable
//! acknowledges it and reports its state.
//!
//! # Protocol Overview
//!
//! Every message travels in one frame:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 0xAA  │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! Configuration payloads are small dictionaries keyed by integers, see
//! [`dictionary`].

#![no_std]
#![deny(unsafe_code)]

pub mod dictionary;
pub mod frame;
pub mod messages;

pub use dictionary::{ConfigValue, DictEntry, DictReader, DictWriter};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{CompanionMessage, ConfigMessage, DeviceMessage, MessageError};
