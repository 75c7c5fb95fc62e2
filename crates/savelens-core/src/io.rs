//! File access seam.
//!
//! The engine never touches storage directly; it reads and writes through a
//! [`FileAccess`] implementation supplied by the host.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};

pub trait FileAccess {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;
    fn can_read(&self, path: &Path) -> bool;
    fn can_write(&self, path: &Path) -> bool;
    /// Replace the whole file. Implementations must not leave a partial write behind.
    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Local filesystem access
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAccess;

impl FileAccess for FsAccess {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path)?)
    }

    fn can_read(&self, path: &Path) -> bool {
        fs::File::open(path).is_ok()
    }

    fn can_write(&self, path: &Path) -> bool {
        fs::metadata(path)
            .map(|m| m.is_file() && !m.permissions().readonly())
            .unwrap_or(false)
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut staging = path.as_os_str().to_owned();
        staging.push(".savelens-tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, bytes)?;
        if let Err(e) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }
}

/// In-memory file store, mainly for tests and embedding hosts
#[derive(Debug, Default)]
pub struct MemoryAccess {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    read_only: Mutex<HashSet<PathBuf>>,
}

impl MemoryAccess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), bytes.into());
        }
    }

    pub fn set_read_only(&self, path: impl Into<PathBuf>) {
        if let Ok(mut read_only) = self.read_only.lock() {
            read_only.insert(path.into());
        }
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(path).cloned()
    }
}

impl FileAccess for MemoryAccess {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        self.get(path)
            .ok_or_else(|| Error::NotReadable(path.display().to_string()))
    }

    fn can_read(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    fn can_write(&self, path: &Path) -> bool {
        let read_only = self
            .read_only
            .lock()
            .map(|set| set.contains(path))
            .unwrap_or(true);
        self.can_read(path) && !read_only
    }

    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if !self.can_write(path) {
            return Err(Error::NotWritable(path.display().to_string()));
        }
        self.insert(path, bytes.to_vec());
        Ok(())
    }
}
