//! Flash storage driver for RP2040
//!
//! The metronome persists two small integers (tempo and pulse length) in a
//! sequential-storage map at the end of flash. A key-pointer cache remembers
//! where each key was last written, so loading settings at boot and saving
//! them after Back does not rescan the partition.
//!
//! Implements the `FlashStorage` trait from `tactus-hal`.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::KeyPointerCache;
use sequential_storage::map;

// Re-export shared types from tactus-hal
pub use tactus_hal::flash::{FlashError, StorageKey};

/// 2MB flash on the Pico-class boards
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Settings partition at the top of flash, excluded from the program in `memory.x`
pub const SETTINGS_PARTITION_SIZE: usize = 64 * 1024;
pub const SETTINGS_PARTITION_START: usize = FLASH_SIZE - SETTINGS_PARTITION_SIZE;

/// Flash range for the settings partition
pub const SETTINGS_RANGE: core::ops::Range<u32> =
    (SETTINGS_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Erase pages in the settings partition
const SETTINGS_PAGES: usize = SETTINGS_PARTITION_SIZE / ERASE_SIZE;

/// Number of distinct settings keys
const SETTINGS_KEYS: usize = StorageKey::ALL.len();

/// Item buffer: one key byte, item header and a postcard `i32` with room to spare
const ITEM_BUFFER_SIZE: usize = 32;

type SettingsCache = KeyPointerCache<SETTINGS_PAGES, StorageKey, SETTINGS_KEYS>;

/// Translate a sequential-storage failure
fn storage_error<E>(e: sequential_storage::Error<E>) -> FlashError {
    match e {
        sequential_storage::Error::FullStorage => FlashError::Full,
        sequential_storage::Error::Corrupted { .. } => FlashError::Corrupted,
        _ => FlashError::Storage,
    }
}

/// RP2040 settings partition
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    cache: SettingsCache,
    item: [u8; ITEM_BUFFER_SIZE],
}

impl<'d> Rp2040FlashStorage<'d> {
    /// Create a new flash storage instance
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
            cache: SettingsCache::new(),
            item: [0u8; ITEM_BUFFER_SIZE],
        }
    }
}

impl<'d> tactus_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let value = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut self.cache,
            &mut self.item,
            &key,
        )
        .await
        .map_err(storage_error)?
        .ok_or(FlashError::NotFound)?;

        let out = buffer
            .get_mut(..value.len())
            .ok_or(FlashError::BufferTooSmall)?;
        out.copy_from_slice(value);
        Ok(value.len())
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        map::store_item(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut self.cache,
            &mut self.item,
            &key,
            &data,
        )
        .await
        .map_err(storage_error)
    }
}

/// Type alias used by the firmware
pub type FlashStorage<'d> = Rp2040FlashStorage<'d>;
