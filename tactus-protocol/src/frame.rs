//! Frame encoding and byte-wise decoding
//!
//! - START: 0xAA
//! - LENGTH: payload length, at most [`MAX_PAYLOAD_SIZE`]
//! - TYPE: message type
//! - PAYLOAD
//! - CHECKSUM: XOR of LENGTH, TYPE and every PAYLOAD byte

use heapless::Vec;

/// Synchronization byte opening every frame
pub const FRAME_START: u8 = 0xAA;

/// Largest payload a frame can carry
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Bytes a frame adds around its payload
pub const FRAME_OVERHEAD: usize = 4;

/// Largest encoded frame
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

/// Frame encoding and decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload longer than [`MAX_PAYLOAD_SIZE`]
    PayloadTooLarge,
    /// Received checksum does not match
    InvalidChecksum,
    /// LENGTH byte out of range
    InvalidLength,
    /// Output buffer cannot hold the frame
    BufferTooSmall,
}

/// One message on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Message type
    pub msg_type: u8,
    /// Message body
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Build a frame, copying `payload`
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Build a frame without payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    /// Size of the encoded frame
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    /// Encode into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len();
        let out = buffer.get_mut(..len).ok_or(FrameError::BufferTooSmall)?;
        let length = self.payload.len() as u8;

        let (header, rest) = out.split_at_mut(3);
        header.copy_from_slice(&[FRAME_START, length, self.msg_type]);
        let (body, tail) = rest.split_at_mut(self.payload.len());
        body.copy_from_slice(&self.payload);
        tail[0] = checksum(length, self.msg_type, &self.payload);

        Ok(len)
    }

    /// Encode into an owned buffer
    pub fn encode_to_vec(&self) -> Vec<u8, MAX_FRAME_SIZE> {
        let mut out = Vec::new();
        // Payload length is bounded, so every push fits
        let length = self.payload.len() as u8;
        let _ = out.extend_from_slice(&[FRAME_START, length, self.msg_type]);
        let _ = out.extend_from_slice(&self.payload);
        let _ = out.push(checksum(length, self.msg_type, &self.payload));
        out
    }
}

/// XOR checksum over LENGTH, TYPE and PAYLOAD
pub fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
    payload.iter().fold(length ^ msg_type, |acc, byte| acc ^ byte)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    Length,
    Type { length: u8 },
    Payload { length: u8, msg_type: u8 },
    Checksum { length: u8, msg_type: u8 },
}

/// Resynchronizing frame decoder
///
/// Bytes are fed one at a time as they arrive from the UART. Noise before
/// a START byte is skipped. A bad LENGTH or checksum drops the frame and
/// the parser hunts for the next START.
#[derive(Debug, Clone)]
pub struct FrameParser {
    stage: Stage,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a parser waiting for START
    pub const fn new() -> Self {
        Self {
            stage: Stage::Start,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.stage = Stage::Start;
        self.payload.clear();
    }

    /// Check if the parser is between frames
    pub fn is_idle(&self) -> bool {
        self.stage == Stage::Start
    }

    /// Feed one byte
    ///
    /// Returns `Ok(Some(frame))` when `byte` completes a valid frame and
    /// `Ok(None)` while more bytes are needed. Errors reset the parser.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        self.stage = match self.stage {
            Stage::Start => {
                if byte == FRAME_START {
                    Stage::Length
                } else {
                    Stage::Start
                }
            }
            Stage::Length => {
                if usize::from(byte) > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidLength);
                }
                Stage::Type { length: byte }
            }
            Stage::Type { length } => {
                self.payload.clear();
                if length == 0 {
                    Stage::Checksum { length, msg_type: byte }
                } else {
                    Stage::Payload { length, msg_type: byte }
                }
            }
            Stage::Payload { length, msg_type } => {
                // Bounded by the LENGTH check
                let _ = self.payload.push(byte);
                if self.payload.len() == usize::from(length) {
                    Stage::Checksum { length, msg_type }
                } else {
                    Stage::Payload { length, msg_type }
                }
            }
            Stage::Checksum { length, msg_type } => {
                let valid = byte == checksum(length, msg_type, &self.payload);
                let payload = core::mem::take(&mut self.payload);
                self.reset();
                if !valid {
                    return Err(FrameError::InvalidChecksum);
                }
                return Ok(Some(Frame { msg_type, payload }));
            }
        };
        Ok(None)
    }

    /// Feed bytes until a frame completes
    ///
    /// Returns the frame (if any) and the number of bytes consumed, so the
    /// caller can continue with the rest of `bytes`.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Result<Option<Frame>, FrameError>, usize) {
        for (idx, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                done => return (done, idx + 1),
            }
        }
        (Ok(None), bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        let mut parser = FrameParser::new();
        parser.feed_bytes(bytes).0
    }

    #[test]
    fn test_encode_empty_frame() {
        let mut buffer = [0u8; 8];
        let len = Frame::empty(0x23).encode(&mut buffer).unwrap();
        assert_eq!(len, 4);
        assert_eq!(&buffer[..4], &[0xAA, 0x00, 0x23, 0x23]);
    }

    #[test]
    fn test_encode_payload_checksum() {
        let frame = Frame::new(0x22, &[0x80, 0x00, 0x01]).unwrap();
        let bytes = frame.encode_to_vec();
        assert_eq!(bytes.as_slice(), &[0xAA, 0x03, 0x22, 0x80, 0x00, 0x01, 0x03 ^ 0x22 ^ 0x80 ^ 0x01]);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(0x01, &[1, 2, 3]).unwrap();
        let mut buffer = [0u8; 6];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_parse_encoded_frame() {
        let frame = Frame::new(0x01, b"hello").unwrap();
        assert_eq!(parse_all(&frame.encode_to_vec()), Ok(Some(frame)));
    }

    #[test]
    fn test_parser_skips_noise() {
        let mut data = heapless::Vec::<u8, 16>::new();
        data.extend_from_slice(&[0x00, 0x13, 0x37]).unwrap();
        data.extend_from_slice(&Frame::empty(0x02).encode_to_vec()).unwrap();

        let parsed = parse_all(&data).unwrap().unwrap();
        assert_eq!(parsed.msg_type, 0x02);
    }

    #[test]
    fn test_bad_checksum_resets() {
        let mut parser = FrameParser::new();
        let mut bytes = Frame::empty(0x02).encode_to_vec();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x55;

        assert_eq!(parser.feed_bytes(&bytes).0, Err(FrameError::InvalidChecksum));
        assert!(parser.is_idle());

        let good = Frame::empty(0x02).encode_to_vec();
        assert!(parser.feed_bytes(&good).0.unwrap().is_some());
    }

    #[test]
    fn test_bad_length_rejected() {
        assert_eq!(parse_all(&[0xAA, 251]), Err(FrameError::InvalidLength));
    }

    #[test]
    fn test_feed_bytes_reports_consumed() {
        let mut data = heapless::Vec::<u8, 16>::new();
        data.extend_from_slice(&Frame::empty(0x02).encode_to_vec()).unwrap();
        data.extend_from_slice(&Frame::empty(0x01).encode_to_vec()).unwrap();

        let mut parser = FrameParser::new();
        let (first, used) = parser.feed_bytes(&data);
        assert_eq!(first.unwrap().unwrap().msg_type, 0x02);
        assert_eq!(used, 4);

        let (second, _) = parser.feed_bytes(&data[used..]);
        assert_eq!(second.unwrap().unwrap().msg_type, 0x01);
    }

    #[test]
    fn test_payload_too_large() {
        let payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(Frame::new(0x01, &payload), Err(FrameError::PayloadTooLarge));
    }
}
