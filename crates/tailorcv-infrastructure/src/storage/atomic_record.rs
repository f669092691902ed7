//! Atomic single-record TOML files.
//!
//! A thin layer for durable whole-record state: the file holds exactly one
//! serialized record, and every mutation replaces or removes the whole
//! record. Readers can never observe a torn write.

use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tailorcv_core::error::{Result, TailorCvError};

/// A handle to a TOML file holding at most one record of type `T`.
///
/// - writes go to a temporary file, are fsynced, then renamed into place
/// - save and clear take an exclusive lock so concurrent processes cannot
///   interleave partial state
/// - a missing or empty file reads as `None`
pub struct AtomicRecordFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

// PhantomData blocks the derive; T itself is never stored.
impl<T> Clone for AtomicRecordFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> AtomicRecordFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the record, if one is present.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: a complete record was read
    /// - `Ok(None)`: the file doesn't exist or is empty
    /// - `Err`: the file exists but could not be read or parsed
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let record: T = toml::from_str(&content)?;
        Ok(Some(record))
    }

    /// Replaces the stored record atomically.
    pub fn save(&self, record: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let _lock = FileLock::acquire(&self.path)?;

        let toml_string = toml::to_string_pretty(record)?;

        // Write to a temporary file in the same directory, then rename over
        // the destination so readers see the old record or the new one,
        // never a prefix.
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Removes the stored record. Clearing an absent record is a no-op.
    pub fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let _lock = FileLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| TailorCvError::io("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| TailorCvError::io("Path has no file name"))?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| TailorCvError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        // Non-Unix platforms run without locking; acceptable for a
        // single-user client.

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped.
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestRecord {
        token: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicRecordFile::<TestRecord>::new(temp_dir.path().join("record.toml"));

        let record = TestRecord {
            token: "abc".to_string(),
            count: 3,
        };
        file.save(&record).unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicRecordFile::<TestRecord>::new(temp_dir.path().join("missing.toml"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_clear_removes_record() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicRecordFile::<TestRecord>::new(temp_dir.path().join("record.toml"));

        file.save(&TestRecord {
            token: "abc".to_string(),
            count: 1,
        })
        .unwrap();
        file.clear().unwrap();

        assert!(file.load().unwrap().is_none());
        // clearing again is a no-op
        file.clear().unwrap();
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("record.toml");
        let file = AtomicRecordFile::<TestRecord>::new(path.clone());

        file.save(&TestRecord {
            token: "abc".to_string(),
            count: 1,
        })
        .unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join(".record.toml.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("record.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let file = AtomicRecordFile::<TestRecord>::new(path);
        assert!(file.load().is_err());
    }
}
