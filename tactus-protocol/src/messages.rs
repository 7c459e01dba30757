//! Message types for the companion link
//!
//! - Companion → device: configuration, heartbeat
//! - Device → companion: acknowledgements, status, heartbeat response

use crate::dictionary::{ConfigValue, DictReader, KEY_VIBE_DURATION};
use crate::frame::Frame;

// Message type IDs: companion → device
pub const MSG_CONFIG: u8 = 0x01;
pub const MSG_PING: u8 = 0x02;

// Message type IDs: device → companion
pub const MSG_ACK: u8 = 0x20;
pub const MSG_NACK: u8 = 0x21;
pub const MSG_STATUS: u8 = 0x22;
pub const MSG_PONG: u8 = 0x23;

/// STATUS payload size: tempo (2) + running (1) + pattern duration (4)
pub const STATUS_PAYLOAD_LEN: usize = 7;

/// Errors decoding or building a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Type byte not part of this direction
    UnknownType(u8),
    /// Payload ends inside a field
    Truncated,
    /// Dictionary value kind not understood
    InvalidKind(u8),
    /// Field length does not match its kind
    InvalidLength,
    /// String value is not UTF-8
    InvalidUtf8,
    /// Message does not fit in one frame
    TooLarge,
}

impl MessageError {
    /// Reason code carried in a NACK
    pub fn code(&self) -> u8 {
        match self {
            MessageError::UnknownType(_) => 1,
            MessageError::Truncated => 2,
            MessageError::InvalidKind(_) => 3,
            MessageError::InvalidLength => 4,
            MessageError::InvalidUtf8 => 5,
            MessageError::TooLarge => 6,
        }
    }
}

/// Settings carried by a CONFIG message
///
/// Keys the device does not use are skipped. A message without any known
/// key is valid and changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigMessage<'a> {
    /// Requested pulse length
    pub vibe_duration: Option<ConfigValue<'a>>,
}

impl<'a> ConfigMessage<'a> {
    /// Decode a dictionary payload
    ///
    /// A repeated key keeps its last value.
    pub fn decode(payload: &'a [u8]) -> Result<Self, MessageError> {
        let mut message = Self::default();
        for entry in DictReader::new(payload)? {
            let entry = entry?;
            if entry.key == KEY_VIBE_DURATION {
                message.vibe_duration = Some(entry.value);
            }
        }
        Ok(message)
    }

    /// Check if the message carries no known key
    pub fn is_empty(&self) -> bool {
        self.vibe_duration.is_none()
    }
}

/// Messages from the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompanionMessage<'a> {
    /// Configuration update
    Config(ConfigMessage<'a>),
    /// Heartbeat request
    Ping,
}

impl<'a> CompanionMessage<'a> {
    /// Parse a message from a received frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, MessageError> {
        match frame.msg_type {
            MSG_CONFIG => Ok(CompanionMessage::Config(ConfigMessage::decode(&frame.payload)?)),
            MSG_PING => Ok(CompanionMessage::Ping),
            other => Err(MessageError::UnknownType(other)),
        }
    }
}

/// Messages to the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// CONFIG frame accepted
    Ack,
    /// CONFIG frame rejected, with [`MessageError::code`]
    Nack { reason: u8 },
    /// Current metronome state
    Status {
        tempo: u16,
        running: bool,
        pattern_ms: u32,
    },
    /// Heartbeat response
    Pong,
}

impl DeviceMessage {
    /// Encode into a frame
    pub fn to_frame(&self) -> Frame {
        match *self {
            DeviceMessage::Ack => Frame::empty(MSG_ACK),
            DeviceMessage::Nack { reason } => frame_with(MSG_NACK, &[reason]),
            DeviceMessage::Status {
                tempo,
                running,
                pattern_ms,
            } => {
                let mut payload = [0u8; STATUS_PAYLOAD_LEN];
                payload[..2].copy_from_slice(&tempo.to_le_bytes());
                payload[2] = u8::from(running);
                payload[3..].copy_from_slice(&pattern_ms.to_le_bytes());
                frame_with(MSG_STATUS, &payload)
            }
            DeviceMessage::Pong => Frame::empty(MSG_PONG),
        }
    }

    /// Parse a device frame (companion side)
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_ACK => Ok(DeviceMessage::Ack),
            MSG_NACK => {
                let reason = *payload.first().ok_or(MessageError::Truncated)?;
                Ok(DeviceMessage::Nack { reason })
            }
            MSG_STATUS => {
                let raw: &[u8; STATUS_PAYLOAD_LEN] =
                    payload.try_into().map_err(|_| MessageError::InvalidLength)?;
                Ok(DeviceMessage::Status {
                    tempo: u16::from_le_bytes([raw[0], raw[1]]),
                    running: raw[2] != 0,
                    pattern_ms: u32::from_le_bytes([raw[3], raw[4], raw[5], raw[6]]),
                })
            }
            MSG_PONG => Ok(DeviceMessage::Pong),
            other => Err(MessageError::UnknownType(other)),
        }
    }
}

/// Frame for a payload known to fit
fn frame_with(msg_type: u8, payload: &[u8]) -> Frame {
    Frame::new(msg_type, payload).unwrap_or_else(|_| Frame::empty(msg_type))
}
