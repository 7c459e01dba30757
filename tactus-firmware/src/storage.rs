//! Settings persistence
//!
//! Bridges the core's synchronous [`SettingsSnapshot`] to async flash.
//! Each setting is a postcard-encoded `i32` under its [`StorageKey`].
//! Read failures leave the key absent so the core falls back to its
//! defaults; write failures are reported and the values stay pending in
//! the snapshot.

use defmt::*;

use tactus_core::persist::SettingsSnapshot;
use tactus_core::traits::{SettingKey, SettingsSink};
use tactus_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey};
// Import the FlashStorage trait to bring methods into scope
use tactus_hal_rp2040::FlashStorageTrait;

/// Largest postcard encoding of an `i32` (zig-zag varint)
const MAX_VALUE_SIZE: usize = 5;

/// Settings persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Flash operation failed
    Flash(FlashError),
    /// Stored bytes are not a valid value
    Deserialize,
    /// Value could not be encoded
    Serialize,
}

impl From<FlashError> for PersistError {
    fn from(e: FlashError) -> Self {
        PersistError::Flash(e)
    }
}

/// Flash key for a core setting
fn storage_key(key: SettingKey) -> StorageKey {
    match key {
        SettingKey::Tempo => StorageKey::Tempo,
        SettingKey::VibeDuration => StorageKey::VibeDuration,
    }
}

/// Settings store in the flash settings partition
pub struct SettingsStore<'d> {
    flash: FlashStorage<'d>,
}

impl<'d> SettingsStore<'d> {
    /// Create a store over the flash driver
    pub fn new(flash: FlashStorage<'d>) -> Self {
        Self { flash }
    }

    /// Read every setting into a clean snapshot
    pub async fn load(&mut self) -> SettingsSnapshot {
        let mut snapshot = SettingsSnapshot::new();
        for key in SettingKey::ALL {
            match self.read_value(key).await {
                Ok(value) => {
                    debug!("Loaded {:?} = {}", key, value);
                    snapshot.load(key, value);
                }
                Err(PersistError::Flash(FlashError::NotFound)) => {
                    debug!("No stored {:?}, using default", key);
                }
                Err(e) => {
                    warn!("Failed to load {:?}: {:?}, using default", key, e);
                }
            }
        }
        snapshot
    }

    async fn read_value(&mut self, key: SettingKey) -> Result<i32, PersistError> {
        let mut buffer = [0u8; MAX_VALUE_SIZE];
        let len = self.flash.read(storage_key(key), &mut buffer).await?;
        postcard::from_bytes(&buffer[..len]).map_err(|_| PersistError::Deserialize)
    }

    async fn write_value(&mut self, key: SettingKey, value: i32) -> Result<(), PersistError> {
        let mut buffer = [0u8; MAX_VALUE_SIZE];
        let encoded =
            postcard::to_slice(&value, &mut buffer).map_err(|_| PersistError::Serialize)?;
        self.flash.write(storage_key(key), encoded).await?;
        Ok(())
    }
}

impl SettingsSink for SettingsStore<'_> {
    type Error = PersistError;

    async fn write_setting(&mut self, key: SettingKey, value: i32) -> Result<(), PersistError> {
        trace!("Writing {:?} = {}", key, value);
        self.write_value(key, value).await
    }
}
