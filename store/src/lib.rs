//! Durable client-side key-value storage for Latchkey.
//!
//! The session layer only needs three operations against a string-keyed store,
//! expressed by [`CredentialStore`]. Two implementations are provided:
//!
//! - [`FileStore`]: one file per key inside a directory, written with
//!   [`atomic_write_with_options`] so a crash never leaves a half-written token behind
//! - [`MemoryStore`]: process-local map for tests and `ephemeral` runs

pub mod atomic_write;
mod file;
mod memory;

pub use atomic_write::{
    AtomicWriteOptions, PersistMode, atomic_write_with_options, recover_bak_file,
};
pub use file::FileStore;
pub use memory::MemoryStore;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key `{0}` (use ASCII letters, digits, `-` or `_`)")]
    InvalidKey(String),
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stored value at {0} is not valid UTF-8")]
    NotUtf8(PathBuf),
}

/// Synchronous string key-value capability.
///
/// Implementations must be cheap enough to call from the UI task.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
