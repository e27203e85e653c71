//! Local file-based storage.
//!
//! Each key is stored as one file in a configurable directory:
//!
//! ```text
//! ~/.lightstack/storage/
//! ├── token.json
//! ├── principal.json
//! └── current_tenant.json
//! ```

use super::{DurableStorage, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed [`DurableStorage`].
///
/// # Features
///
/// - Atomic writes (write to temp, then rename)
/// - Automatic directory creation
/// - Keys restricted to `[A-Za-z0-9_-]` so they cannot escape the directory
///
/// # Example
///
/// ```no_run
/// use lightstack_runtime::storage::{DurableStorage, LocalFileStorage};
/// use std::path::PathBuf;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = LocalFileStorage::new(PathBuf::from("~/.lightstack/storage"))?;
/// storage.set("token", "\"abc\"")?;
/// assert!(storage.get("token")?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    /// Creates a new local file storage rooted at `base_path`.
    ///
    /// The directory will be created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DirectoryCreation` if the directory cannot be created.
    pub fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        let expanded = expand_tilde(&base_path);

        if !expanded.exists() {
            fs::create_dir_all(&expanded)
                .map_err(|e| StorageError::directory_creation(&expanded, e))?;
        }

        Ok(Self {
            base_path: expanded,
        })
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!(".{key}.json.tmp"))
    }
}

impl DurableStorage for LocalFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key)?;
        let temp_path = self.temp_path(key);

        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::invalid_key(key))
    }
}

/// Expands `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.to_path_buf()
}

/// Returns the default storage directory.
#[must_use]
pub fn default_storage_path() -> PathBuf {
    crate::config::default_config_dir().join("storage")
}
