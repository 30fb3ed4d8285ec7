//! RAM-backed filesystem
//!
//! Keeps a fixed number of small files in memory. Contents are lost on
//! reset, so on hardware this only serves as a volatile fallback; on the
//! host it stands in for flash in tests. Mount and open failures can be
//! injected to exercise error paths.

use heapless::{String, Vec};

use crate::fs::{validate_path, Filesystem, FsError};

/// Maximum path length in bytes
pub const MAX_PATH_LEN: usize = 32;

#[derive(Debug, Clone)]
struct RamFile<const SIZE: usize> {
    path: String<MAX_PATH_LEN>,
    data: Vec<u8, SIZE>,
}

/// In-memory filesystem holding up to `FILES` files of `SIZE` bytes each
#[derive(Debug, Clone)]
pub struct RamFs<const FILES: usize, const SIZE: usize> {
    files: Vec<RamFile<SIZE>, FILES>,
    mounted: bool,
    mountable: bool,
    fail_next_open: bool,
    writes: u32,
}

impl<const FILES: usize, const SIZE: usize> Default for RamFs<FILES, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const FILES: usize, const SIZE: usize> RamFs<FILES, SIZE> {
    /// Create an empty, mountable filesystem
    pub const fn new() -> Self {
        Self {
            files: Vec::new(),
            mounted: false,
            mountable: true,
            fail_next_open: false,
            writes: 0,
        }
    }

    /// Create a filesystem whose volume can never be mounted
    pub const fn unmountable() -> Self {
        Self {
            files: Vec::new(),
            mounted: false,
            mountable: false,
            fail_next_open: false,
            writes: 0,
        }
    }

    /// Make the next `read` or `write` fail with [`FsError::OpenFailed`]
    pub fn fail_next_open(&mut self) {
        self.fail_next_open = true;
    }

    /// Whether the volume is currently mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Raw contents of a file, regardless of mount state
    pub fn contents(&self, path: &str) -> Option<&[u8]> {
        self.position(path).map(|i| self.files[i].data.as_slice())
    }

    fn position(&self, path: &str) -> Option<usize> {
        self.files.iter().position(|f| f.path.as_str() == path)
    }

    fn check_mounted(&self) -> Result<(), FsError> {
        if self.mounted {
            Ok(())
        } else {
            Err(FsError::NotMounted)
        }
    }

    fn take_open_failure(&mut self) -> Result<(), FsError> {
        if core::mem::take(&mut self.fail_next_open) {
            return Err(FsError::OpenFailed);
        }
        Ok(())
    }
}

impl<const FILES: usize, const SIZE: usize> Filesystem for RamFs<FILES, SIZE> {
    fn mount(&mut self) -> Result<(), FsError> {
        if !self.mountable {
            return Err(FsError::MountFailed);
        }
        self.mounted = true;
        Ok(())
    }

    fn exists(&mut self, path: &str) -> Result<bool, FsError> {
        self.check_mounted()?;
        validate_path(path)?;
        Ok(self.position(path).is_some())
    }

    fn file_size(&mut self, path: &str) -> Result<usize, FsError> {
        self.check_mounted()?;
        validate_path(path)?;
        self.position(path)
            .map(|i| self.files[i].data.len())
            .ok_or(FsError::NotFound)
    }

    fn read(&mut self, path: &str, buffer: &mut [u8]) -> Result<usize, FsError> {
        self.check_mounted()?;
        validate_path(path)?;
        let index = self.position(path).ok_or(FsError::NotFound)?;
        self.take_open_failure()?;

        let data = &self.files[index].data;
        if buffer.len() < data.len() {
            return Err(FsError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        self.check_mounted()?;
        validate_path(path)?;
        self.take_open_failure()?;

        if data.len() > SIZE {
            return Err(FsError::Full);
        }

        let mut contents = Vec::new();
        contents
            .extend_from_slice(data)
            .map_err(|_| FsError::Full)?;

        match self.position(path) {
            Some(index) => self.files[index].data = contents,
            None => {
                let mut name = String::new();
                name.push_str(path).map_err(|_| FsError::InvalidPath)?;
                self.files
                    .push(RamFile {
                        path: name,
                        data: contents,
                    })
                    .map_err(|_| FsError::Full)?;
            }
        }

        self.writes = self.writes.wrapping_add(1);
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), FsError> {
        self.check_mounted()?;
        validate_path(path)?;
        if let Some(index) = self.position(path) {
            self.files.swap_remove(index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestFs = RamFs<2, 64>;

    #[test]
    fn test_operations_require_mount() {
        let mut fs = TestFs::new();
        assert_eq!(fs.exists("/a"), Err(FsError::NotMounted));
        assert_eq!(fs.write("/a", b"x"), Err(FsError::NotMounted));
        assert_eq!(fs.read("/a", &mut [0u8; 4]), Err(FsError::NotMounted));

        fs.mount().unwrap();
        assert!(fs.is_mounted());
        assert_eq!(fs.exists("/a"), Ok(false));
    }

    #[test]
    fn test_unmountable_volume() {
        let mut fs = TestFs::unmountable();
        assert_eq!(fs.mount(), Err(FsError::MountFailed));
        assert!(!fs.is_mounted());
    }

    #[test]
    fn test_write_truncates_previous_contents() {
        let mut fs = TestFs::new();
        fs.mount().unwrap();

        fs.write("/conf.json", b"a longer first version").unwrap();
        fs.write("/conf.json", b"short").unwrap();

        let mut buf = [0u8; 64];
        let len = fs.read("/conf.json", &mut buf).unwrap();
        assert_eq!(&buf[..len], b"short");
        assert_eq!(fs.file_size("/conf.json"), Ok(5));
        assert_eq!(fs.write_count(), 2);
    }

    #[test]
    fn test_read_missing_and_small_buffer() {
        let mut fs = TestFs::new();
        fs.mount().unwrap();
        assert_eq!(fs.read("/nope", &mut [0u8; 4]), Err(FsError::NotFound));
        assert_eq!(fs.file_size("/nope"), Err(FsError::NotFound));

        fs.write("/f", b"12345").unwrap();
        assert_eq!(fs.read("/f", &mut [0u8; 4]), Err(FsError::BufferTooSmall));
    }

    #[test]
    fn test_capacity_limits() {
        let mut fs = TestFs::new();
        fs.mount().unwrap();
        assert_eq!(fs.write("/big", &[0u8; 65]), Err(FsError::Full));

        fs.write("/one", b"1").unwrap();
        fs.write("/two", b"2").unwrap();
        assert_eq!(fs.write("/three", b"3"), Err(FsError::Full));
    }

    #[test]
    fn test_injected_open_failure_is_one_shot() {
        let mut fs = TestFs::new();
        fs.mount().unwrap();
        fs.fail_next_open();
        assert_eq!(fs.write("/f", b"x"), Err(FsError::OpenFailed));
        assert_eq!(fs.exists("/f"), Ok(false));
        assert!(fs.write("/f", b"x").is_ok());
    }

    #[test]
    fn test_remove() {
        let mut fs = TestFs::new();
        fs.mount().unwrap();
        fs.write("/f", b"x").unwrap();
        fs.remove("/f").unwrap();
        assert_eq!(fs.exists("/f"), Ok(false));
        assert!(fs.contents("/f").is_none());
        // Removing again is fine
        assert!(fs.remove("/f").is_ok());
    }
}
