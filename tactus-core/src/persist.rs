//! In-RAM settings snapshot
//!
//! Flash access on the target is asynchronous, while the core's store
//! contract is synchronous. The firmware therefore reads every key from
//! flash into a [`SettingsSnapshot`] before startup, lets the core read and
//! write the snapshot, and flushes the written keys back after shutdown.

use heapless::Vec;

use crate::traits::{PersistentStore, SettingKey, SettingsSink};

const KEY_COUNT: usize = SettingKey::ALL.len();

/// Snapshot of persisted settings, one optional value per key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsSnapshot {
    values: [Option<i32>; KEY_COUNT],
    written: [bool; KEY_COUNT],
}

impl SettingsSnapshot {
    /// Empty snapshot: every key absent
    pub const fn new() -> Self {
        Self {
            values: [None; KEY_COUNT],
            written: [false; KEY_COUNT],
        }
    }

    /// Record a value read from backing storage
    ///
    /// Unlike [`PersistentStore::write_int`] this does not mark the key as
    /// needing a flush.
    pub fn load(&mut self, key: SettingKey, value: i32) {
        self.values[key.id() as usize] = Some(value);
    }

    /// Builder form of [`load`](Self::load)
    pub fn with(mut self, key: SettingKey, value: i32) -> Self {
        self.load(key, value);
        self
    }

    /// Current value for `key`
    pub fn get(&self, key: SettingKey) -> Option<i32> {
        self.values[key.id() as usize]
    }

    /// Keys written since the last flush, with their values
    pub fn pending_writes(&self) -> Vec<(SettingKey, i32), KEY_COUNT> {
        let mut out = Vec::new();
        for key in SettingKey::ALL {
            let idx = key.id() as usize;
            if let (true, Some(value)) = (self.written[idx], self.values[idx]) {
                // Capacity equals the key count
                let _ = out.push((key, value));
            }
        }
        out
    }

    /// Mark one key as persisted
    pub fn mark_flushed(&mut self, key: SettingKey) {
        self.written[key.id() as usize] = false;
    }

    /// True if any key is waiting to be flushed
    pub fn is_dirty(&self) -> bool {
        self.written.iter().any(|w| *w)
    }

    /// Write pending keys to `sink`
    ///
    /// Returns the number of keys written. Stops at the first failure;
    /// that key and the ones after it stay pending.
    pub async fn flush_to<W: SettingsSink>(&mut self, sink: &mut W) -> Result<usize, W::Error> {
        let pending = self.pending_writes();
        for &(key, value) in pending.iter() {
            sink.write_setting(key, value).await?;
            self.mark_flushed(key);
        }
        Ok(pending.len())
    }
}

impl PersistentStore for SettingsSnapshot {
    fn exists(&self, key: SettingKey) -> bool {
        self.get(key).is_some()
    }

    fn read_int(&self, key: SettingKey) -> i32 {
        self.get(key).unwrap_or(0)
    }

    fn write_int(&mut self, key: SettingKey, value: i32) {
        let idx = key.id() as usize;
        self.values[idx] = Some(value);
        self.written[idx] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    /// Sink that fails on one key
    #[derive(Default)]
    struct MockSink {
        written: Vec<(SettingKey, i32), 4>,
        fail_on: Option<SettingKey>,
    }

    impl SettingsSink for MockSink {
        type Error = SettingKey;

        async fn write_setting(&mut self, key: SettingKey, value: i32) -> Result<(), SettingKey> {
            if self.fail_on == Some(key) {
                return Err(key);
            }
            let _ = self.written.push((key, value));
            Ok(())
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = SettingsSnapshot::new();
        assert!(!snapshot.exists(SettingKey::Tempo));
        assert_eq!(snapshot.read_int(SettingKey::Tempo), 0);
        assert!(!snapshot.is_dirty());
        assert!(snapshot.pending_writes().is_empty());
    }

    #[test]
    fn test_loaded_values_are_clean() {
        let snapshot = SettingsSnapshot::new().with(SettingKey::Tempo, 140);
        assert!(snapshot.exists(SettingKey::Tempo));
        assert_eq!(snapshot.read_int(SettingKey::Tempo), 140);
        assert!(!snapshot.exists(SettingKey::VibeDuration));
        assert!(!snapshot.is_dirty());
    }

    #[test]
    fn test_writes_are_tracked_until_flushed() {
        let mut snapshot = SettingsSnapshot::new().with(SettingKey::Tempo, 140);
        snapshot.write_int(SettingKey::VibeDuration, 60);

        let pending = snapshot.pending_writes();
        assert_eq!(pending.as_slice(), &[(SettingKey::VibeDuration, 60)]);

        snapshot.mark_flushed(SettingKey::VibeDuration);
        assert!(!snapshot.is_dirty());
        assert_eq!(snapshot.read_int(SettingKey::VibeDuration), 60);
    }

    #[test]
    fn test_flush_writes_only_pending_keys() {
        let mut snapshot = SettingsSnapshot::new().with(SettingKey::Tempo, 140);
        snapshot.write_int(SettingKey::VibeDuration, 60);
        let mut sink = MockSink::default();

        assert_eq!(block_on(snapshot.flush_to(&mut sink)), Ok(1));
        assert_eq!(sink.written.as_slice(), &[(SettingKey::VibeDuration, 60)]);
        assert!(!snapshot.is_dirty());

        // Nothing left to write
        assert_eq!(block_on(snapshot.flush_to(&mut sink)), Ok(0));
    }

    #[test]
    fn test_failed_flush_keeps_pending() {
        let mut snapshot = SettingsSnapshot::new();
        snapshot.write_int(SettingKey::Tempo, 150);
        snapshot.write_int(SettingKey::VibeDuration, 70);
        let mut sink = MockSink {
            fail_on: Some(SettingKey::VibeDuration),
            ..Default::default()
        };

        assert_eq!(
            block_on(snapshot.flush_to(&mut sink)),
            Err(SettingKey::VibeDuration)
        );
        assert_eq!(
            snapshot.pending_writes().as_slice(),
            &[(SettingKey::VibeDuration, 70)]
        );

        sink.fail_on = None;
        assert_eq!(block_on(snapshot.flush_to(&mut sink)), Ok(1));
        assert!(!snapshot.is_dirty());
    }
}
