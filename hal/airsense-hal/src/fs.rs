//! Filesystem abstractions
//!
//! A deliberately small, synchronous view of a device filesystem. Files are
//! read and written whole: `write` opens for writing (creating the file if
//! absent and truncating prior contents), writes the data and closes the
//! handle in one call.

use core::fmt;

/// Errors from filesystem operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FsError {
    /// The storage volume could not be mounted
    MountFailed,
    /// Operation attempted before a successful mount
    NotMounted,
    /// File does not exist
    NotFound,
    /// File could not be opened
    OpenFailed,
    /// Buffer too small for the file contents
    BufferTooSmall,
    /// No space left on the volume
    Full,
    /// Underlying device I/O failed
    Io,
    /// Stored data is corrupted
    Corrupted,
    /// Path is empty or not absolute
    InvalidPath,
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FsError::MountFailed => "storage volume could not be mounted",
            FsError::NotMounted => "storage volume is not mounted",
            FsError::NotFound => "file not found",
            FsError::OpenFailed => "file could not be opened",
            FsError::BufferTooSmall => "buffer too small for file",
            FsError::Full => "storage volume is full",
            FsError::Io => "storage I/O error",
            FsError::Corrupted => "stored data is corrupted",
            FsError::InvalidPath => "invalid path",
        };
        f.write_str(msg)
    }
}

/// Filesystem trait
///
/// Implementations must reject every operation except [`mount`] with
/// [`FsError::NotMounted`] until a mount has succeeded. Mounting an already
/// mounted volume is a no-op.
///
/// [`mount`]: Filesystem::mount
pub trait Filesystem {
    /// Mount the storage volume
    fn mount(&mut self) -> Result<(), FsError>;

    /// Check whether a file exists
    fn exists(&mut self, path: &str) -> Result<bool, FsError>;

    /// Size of a file in bytes
    fn file_size(&mut self, path: &str) -> Result<usize, FsError>;

    /// Read a whole file into the provided buffer
    ///
    /// # Returns
    /// The number of bytes read, [`FsError::NotFound`] if the file does not
    /// exist, or [`FsError::BufferTooSmall`] if it does not fit.
    fn read(&mut self, path: &str, buffer: &mut [u8]) -> Result<usize, FsError>;

    /// Replace the contents of a file, creating it if absent
    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError>;

    /// Remove a file. Removing a missing file succeeds.
    fn remove(&mut self, path: &str) -> Result<(), FsError>;
}

impl<T: Filesystem + ?Sized> Filesystem for &mut T {
    fn mount(&mut self) -> Result<(), FsError> {
        (**self).mount()
    }

    fn exists(&mut self, path: &str) -> Result<bool, FsError> {
        (**self).exists(path)
    }

    fn file_size(&mut self, path: &str) -> Result<usize, FsError> {
        (**self).file_size(path)
    }

    fn read(&mut self, path: &str, buffer: &mut [u8]) -> Result<usize, FsError> {
        (**self).read(path, buffer)
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        (**self).write(path, data)
    }

    fn remove(&mut self, path: &str) -> Result<(), FsError> {
        (**self).remove(path)
    }
}

/// Check that a path is absolute and non-empty
pub fn validate_path(path: &str) -> Result<(), FsError> {
    if path.len() < 2 || !path.starts_with('/') {
        return Err(FsError::InvalidPath);
    }
    Ok(())
}

/// Stable key for a path on key-value storage backends
///
/// Flash backends store each file as one map item; the key is the 32-bit
/// FNV-1a hash of the path bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FileKey(u32);

impl FileKey {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;

    /// Derive the key for a path
    pub const fn from_path(path: &str) -> Self {
        let bytes = path.as_bytes();
        let mut hash = Self::FNV_OFFSET;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        FileKey(hash)
    }

    /// Get the raw key value
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Create a key from a raw value
    pub const fn from_u32(value: u32) -> Self {
        FileKey(value)
    }
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for FileKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.len() < 4 {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[..4].copy_from_slice(&self.0.to_le_bytes());
        Ok(4)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.len() < 4 {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&buffer[..4]);
        Ok((FileKey(u32::from_le_bytes(raw)), 4))
    }
}
