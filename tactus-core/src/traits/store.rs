//! Persistent settings store trait

/// Keys of persisted integers
///
/// The numeric ids match the flash storage keys and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SettingKey {
    /// Tempo in BPM
    Tempo = 0,
    /// Configured pulse length in milliseconds
    VibeDuration = 1,
}

impl SettingKey {
    /// Every key
    pub const ALL: [SettingKey; 2] = [SettingKey::Tempo, SettingKey::VibeDuration];

    /// Numeric id of the key
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// Synchronous integer key/value store that survives restarts
///
/// The absence of a key is the only "no prior value" signal.
pub trait PersistentStore {
    /// Check whether a value was ever written for `key`
    fn exists(&self, key: SettingKey) -> bool;

    /// Read the value for `key`
    ///
    /// Only meaningful if [`exists`](Self::exists) returned true;
    /// implementations return 0 for missing keys.
    fn read_int(&self, key: SettingKey) -> i32;

    /// Write the value for `key`
    fn write_int(&mut self, key: SettingKey, value: i32);
}

/// Backing storage that settings are flushed to
///
/// Implemented by the firmware over flash. Writes may fail; a failed key
/// stays pending in the snapshot and is retried on the next flush.
pub trait SettingsSink {
    /// Write failure
    type Error;

    /// Persist one value
    fn write_setting(
        &mut self,
        key: SettingKey,
        value: i32,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}
