//! Flash-backed filesystem for RP2040
//!
//! Uses sequential-storage for wear-leveled key-value storage in the last
//! 64KB of flash. Each file is one map item keyed by the [`FileKey`] of its
//! path. A removed file is written as an empty item, so `exists` treats
//! empty items as absent.
//!
//! The store is synchronous: the async sequential-storage calls are driven
//! to completion with `embassy_futures::block_on`, blocking the caller for
//! the duration of the flash operation.

use embassy_futures::block_on;
use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use airsense_hal::fs::validate_path;
pub use airsense_hal::fs::{FileKey, Filesystem, FsError};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const FS_PARTITION_SIZE: usize = 64 * 1024; // 64KB for files
pub const FS_PARTITION_START: usize = FLASH_SIZE - FS_PARTITION_SIZE;

/// Flash erase size for RP2040
pub const FLASH_ERASE_SIZE: usize = ERASE_SIZE;

/// Flash range for the filesystem partition
pub const FS_RANGE: core::ops::Range<u32> = (FS_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Largest file the flash filesystem stores
pub const MAX_FILE_SIZE: usize = 2048;

/// Scratch buffer size for sequential-storage (item header + key + value)
const DATA_BUFFER_SIZE: usize = MAX_FILE_SIZE + 64;

/// Key probed when mounting; never written
const PROBE_KEY: FileKey = FileKey::from_path("/.mount");

/// RP2040 flash filesystem
pub struct Rp2040FlashFs<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    mounted: bool,
}

impl<'d> Rp2040FlashFs<'d> {
    /// Create a new flash filesystem instance
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
            mounted: false,
        }
    }

    /// Erase the whole partition, discarding every file
    ///
    /// Use this to recover from a partition that no longer mounts.
    pub fn format(&mut self) -> Result<(), FsError> {
        block_on(self.flash.erase(FS_RANGE.start, FS_RANGE.end)).map_err(|_| FsError::Io)?;
        self.mounted = false;
        Ok(())
    }

    fn check_mounted(&self) -> Result<(), FsError> {
        if self.mounted {
            Ok(())
        } else {
            Err(FsError::NotMounted)
        }
    }

    /// Fetch the raw item for a path into `data_buffer`
    ///
    /// Returns `Ok(None)` for missing files and tombstones.
    fn fetch<'b>(
        &mut self,
        key: FileKey,
        data_buffer: &'b mut [u8],
    ) -> Result<Option<&'b [u8]>, FsError> {
        let result = block_on(map::fetch_item::<FileKey, &[u8], _>(
            &mut self.flash,
            FS_RANGE,
            &mut NoCache::new(),
            data_buffer,
            &key,
        ));

        match result {
            Ok(Some(data)) if !data.is_empty() => Ok(Some(data)),
            Ok(_) => Ok(None),
            Err(_) => Err(FsError::Corrupted),
        }
    }

    fn store(&mut self, key: FileKey, data: &[u8]) -> Result<(), FsError> {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        block_on(map::store_item(
            &mut self.flash,
            FS_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        ))
        .map_err(|e| match e {
            sequential_storage::Error::FullStorage => FsError::Full,
            _ => FsError::Io,
        })
    }
}

impl<'d> Filesystem for Rp2040FlashFs<'d> {
    fn mount(&mut self) -> Result<(), FsError> {
        if self.mounted {
            return Ok(());
        }

        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];
        self.fetch(PROBE_KEY, &mut data_buffer)
            .map_err(|_| FsError::MountFailed)?;

        self.mounted = true;
        Ok(())
    }

    fn exists(&mut self, path: &str) -> Result<bool, FsError> {
        self.check_mounted()?;
        validate_path(path)?;

        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];
        Ok(self
            .fetch(FileKey::from_path(path), &mut data_buffer)?
            .is_some())
    }

    fn file_size(&mut self, path: &str) -> Result<usize, FsError> {
        self.check_mounted()?;
        validate_path(path)?;

        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];
        self.fetch(FileKey::from_path(path), &mut data_buffer)?
            .map(|data| data.len())
            .ok_or(FsError::NotFound)
    }

    fn read(&mut self, path: &str, buffer: &mut [u8]) -> Result<usize, FsError> {
        self.check_mounted()?;
        validate_path(path)?;

        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];
        let data = self
            .fetch(FileKey::from_path(path), &mut data_buffer)?
            .ok_or(FsError::NotFound)?;

        let len = data.len();
        if buffer.len() < len {
            return Err(FsError::BufferTooSmall);
        }
        buffer[..len].copy_from_slice(data);
        Ok(len)
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        self.check_mounted()?;
        validate_path(path)?;
        if data.len() > MAX_FILE_SIZE {
            return Err(FsError::Full);
        }
        // Empty items are tombstones
        if data.is_empty() {
            return Err(FsError::OpenFailed);
        }

        self.store(FileKey::from_path(path), data)
    }

    fn remove(&mut self, path: &str) -> Result<(), FsError> {
        self.check_mounted()?;
        validate_path(path)?;

        if !self.exists(path)? {
            return Ok(());
        }
        self.store(FileKey::from_path(path), &[])
    }
}
