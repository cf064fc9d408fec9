use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::atomic_write::{AtomicWriteOptions, atomic_write_with_options, recover_bak_file};
use crate::{CredentialStore, StoreError, validate_key};

/// Directory-backed store: the value for `key` lives in `<dir>/<key>`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    options: AtomicWriteOptions,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            action: "create",
            path: dir.clone(),
            source,
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&dir, fs::Permissions::from_mode(0o700)) {
                tracing::warn!(path = %dir.display(), "Failed to restrict store directory: {e}");
            }
        }
        Ok(Self {
            dir,
            options: AtomicWriteOptions::default(),
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: AtomicWriteOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        recover_bak_file(&path);
        match fs::read(&path) {
            Ok(bytes) => {
                let value = String::from_utf8(bytes).map_err(|_| StoreError::NotUtf8(path))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                action: "read",
                path,
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        atomic_write_with_options(&path, value.as_bytes(), self.options).map_err(|source| {
            StoreError::Io {
                action: "write",
                path: path.clone(),
                source,
            }
        })?;
        debug!(key, "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let _ = fs::remove_file(path.with_extension("bak"));
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "Removed value");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                action: "remove",
                path,
                source,
            }),
        }
    }
}
