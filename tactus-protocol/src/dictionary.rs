//! Integer-keyed configuration dictionary
//!
//! The payload of a CONFIG frame:
//! ```text
//! COUNT  { KEY  KIND  LEN  DATA[LEN] } × COUNT
//!  1B      1B   1B    1B
//! ```
//!
//! | KIND | Meaning                                    |
//! |------|--------------------------------------------|
//! | 0x01 | UTF-8 string, trailing NUL bytes ignored   |
//! | 0x02 | `i32`, little-endian, LEN must be 4        |
//!
//! Entries the device does not know are skipped, which lets newer
//! companions talk to older firmware.

use core::fmt::Write;

use heapless::String;

use crate::frame::MAX_PAYLOAD_SIZE;
use crate::messages::MessageError;

/// String value
pub const KIND_CSTRING: u8 = 0x01;
/// Little-endian `i32` value
pub const KIND_INT: u8 = 0x02;

/// Reserved for a future tempo preset
pub const KEY_TEMPO: u8 = 0;
/// Motor pulse length in milliseconds
pub const KEY_VIBE_DURATION: u8 = 1;

/// Longest decimal rendering of an `i32` ("-2147483648")
pub const INT_TEXT_LEN: usize = 11;

/// A dictionary value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigValue<'a> {
    /// String as typed on the companion
    Text(&'a str),
    /// Integer
    Int(i32),
}

impl<'a> ConfigValue<'a> {
    /// Decimal text of the value
    ///
    /// Strings are returned as-is; integers are rendered into `scratch`.
    pub fn as_text<'b>(&'b self, scratch: &'b mut String<INT_TEXT_LEN>) -> &'b str
    where
        'a: 'b,
    {
        match self {
            ConfigValue::Text(text) => *text,
            ConfigValue::Int(value) => {
                scratch.clear();
                // Any i32 fits in INT_TEXT_LEN
                let _ = write!(scratch, "{}", value);
                scratch.as_str()
            }
        }
    }
}

/// One decoded entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DictEntry<'a> {
    pub key: u8,
    pub value: ConfigValue<'a>,
}

/// Iterator over the entries of a dictionary payload
///
/// Yields `Err` once and then stops if the payload is malformed.
#[derive(Debug, Clone)]
pub struct DictReader<'a> {
    data: &'a [u8],
    remaining: u8,
    failed: bool,
}

impl<'a> DictReader<'a> {
    /// Start reading `payload`
    pub fn new(payload: &'a [u8]) -> Result<Self, MessageError> {
        let (&count, data) = payload.split_first().ok_or(MessageError::Truncated)?;
        Ok(Self {
            data,
            remaining: count,
            failed: false,
        })
    }

    /// Entries announced by the COUNT byte and not yet read
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    fn read_entry(&mut self) -> Result<DictEntry<'a>, MessageError> {
        let data = self.data;
        let [key, kind, len, rest @ ..] = data else {
            return Err(MessageError::Truncated);
        };
        let len = usize::from(*len);
        if rest.len() < len {
            return Err(MessageError::Truncated);
        }
        let (bytes, rest) = rest.split_at(len);

        let value = match *kind {
            KIND_CSTRING => {
                let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |idx| idx + 1);
                let text = core::str::from_utf8(&bytes[..end])
                    .map_err(|_| MessageError::InvalidUtf8)?;
                ConfigValue::Text(text)
            }
            KIND_INT => {
                let raw: [u8; 4] = bytes.try_into().map_err(|_| MessageError::InvalidLength)?;
                ConfigValue::Int(i32::from_le_bytes(raw))
            }
            other => return Err(MessageError::InvalidKind(other)),
        };

        self.data = rest;
        Ok(DictEntry { key: *key, value })
    }
}

impl<'a> Iterator for DictReader<'a> {
    type Item = Result<DictEntry<'a>, MessageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let entry = self.read_entry();
        self.failed = entry.is_err();
        Some(entry)
    }
}

/// Builds a dictionary payload
///
/// Used by host tools and tests to speak the companion side.
#[derive(Debug, Clone)]
pub struct DictWriter {
    payload: heapless::Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for DictWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DictWriter {
    /// Start an empty dictionary
    pub fn new() -> Self {
        let mut payload = heapless::Vec::new();
        let _ = payload.push(0);
        Self { payload }
    }

    /// Append a string entry
    pub fn text(mut self, key: u8, text: &str) -> Result<Self, MessageError> {
        self.push_entry(key, KIND_CSTRING, text.as_bytes())?;
        Ok(self)
    }

    /// Append an integer entry
    pub fn int(mut self, key: u8, value: i32) -> Result<Self, MessageError> {
        self.push_entry(key, KIND_INT, &value.to_le_bytes())?;
        Ok(self)
    }

    /// Finished payload
    pub fn finish(self) -> heapless::Vec<u8, MAX_PAYLOAD_SIZE> {
        self.payload
    }

    fn push_entry(&mut self, key: u8, kind: u8, data: &[u8]) -> Result<(), MessageError> {
        let len = u8::try_from(data.len()).map_err(|_| MessageError::InvalidLength)?;
        if self.payload.len() + 3 + data.len() > MAX_PAYLOAD_SIZE
            || self.payload.first() == Some(&u8::MAX)
        {
            return Err(MessageError::TooLarge);
        }
        // Capacity checked above
        let _ = self.payload.extend_from_slice(&[key, kind, len]);
        let _ = self.payload.extend_from_slice(data);
        self.payload[0] += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_string_and_int() {
        let payload = DictWriter::new()
            .text(KEY_VIBE_DURATION, "120")
            .unwrap()
            .int(7, -4)
            .unwrap()
            .finish();

        let mut reader = DictReader::new(&payload).unwrap();
        assert_eq!(reader.remaining(), 2);
        assert_eq!(
            reader.next(),
            Some(Ok(DictEntry {
                key: KEY_VIBE_DURATION,
                value: ConfigValue::Text("120")
            }))
        );
        assert_eq!(
            reader.next(),
            Some(Ok(DictEntry {
                key: 7,
                value: ConfigValue::Int(-4)
            }))
        );
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn test_trailing_nul_is_dropped() {
        let payload = [1, KEY_VIBE_DURATION, KIND_CSTRING, 3, b'6', b'4', 0];
        let entry = DictReader::new(&payload).unwrap().next().unwrap().unwrap();
        assert_eq!(entry.value, ConfigValue::Text("64"));
    }

    #[test]
    fn test_empty_payload_is_truncated() {
        assert_eq!(DictReader::new(&[]).err(), Some(MessageError::Truncated));
    }

    #[test]
    fn test_short_entry_stops_iteration() {
        // Announces two entries, second one is cut off
        let payload = [2, 1, KIND_INT, 4, 1, 0, 0, 0, 2, KIND_INT];
        let mut reader = DictReader::new(&payload).unwrap();
        assert!(reader.next().unwrap().is_ok());
        assert_eq!(reader.next(), Some(Err(MessageError::Truncated)));
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn test_int_needs_four_bytes() {
        let payload = [1, 1, KIND_INT, 2, 0x10, 0x00];
        let mut reader = DictReader::new(&payload).unwrap();
        assert_eq!(reader.next(), Some(Err(MessageError::InvalidLength)));
    }

    #[test]
    fn test_unknown_kind() {
        let payload = [1, 1, 0x09, 0];
        let mut reader = DictReader::new(&payload).unwrap();
        assert_eq!(reader.next(), Some(Err(MessageError::InvalidKind(0x09))));
    }

    #[test]
    fn test_invalid_utf8() {
        let payload = [1, 1, KIND_CSTRING, 2, 0xC3, 0x28];
        let mut reader = DictReader::new(&payload).unwrap();
        assert_eq!(reader.next(), Some(Err(MessageError::InvalidUtf8)));
    }

    #[test]
    fn test_int_as_text() {
        let mut scratch = String::new();
        assert_eq!(ConfigValue::Int(i32::MIN).as_text(&mut scratch), "-2147483648");
        assert_eq!(ConfigValue::Text(" 48 ").as_text(&mut scratch), " 48 ");
    }
}
