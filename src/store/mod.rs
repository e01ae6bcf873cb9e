//! Local device storage.
//!
//! A synchronous keyed string store, the Rust counterpart of browser local
//! storage. Two implementations:
//! - [`MemoryStore`] for tests and sessions without persistence
//! - [`FileStore`] writing one JSON file per key under a directory
//!
//! Typed helpers ([`load_json`], [`save_json`]) sit on top so callers deal in
//! serde types and a single [`StoreError`].

use crate::model::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Key under which a template's grid-size record is stored.
pub fn grid_sizes_key(template_id: &str) -> String {
    format!("grid-sizes.{template_id}")
}

/// Key under which a template's floating-widget list is stored.
pub fn floating_widgets_key(template_id: &str) -> String {
    format!("floating-widgets.{template_id}")
}

/// Synchronous keyed string storage.
pub trait LocalStore {
    /// Read the value stored under `key`, `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read and deserialize a JSON value.
///
/// # Errors
///
/// Returns `StoreError::Serde` if the stored text is not valid JSON for `T`,
/// or any error from the store itself.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn LocalStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Serde {
            key: key.to_string(),
            source,
        })
}

/// Serialize and store a JSON value.
///
/// # Errors
///
/// Returns `StoreError::Serde` if `value` cannot be serialized, or any error
/// from the store itself.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn LocalStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serde {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// In-memory store.
///
/// Clones share the same entries, so a test can hand one clone to the code
/// under test and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Bytes outside `[A-Za-z0-9._-]` are written as
    /// `%XX`, so distinct keys never share a file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
                file_name.push(char::from(byte));
            } else {
                file_name.push_str(&format!("%{byte:02X}"));
            }
        }
        self.dir.join(format!("{file_name}.json"))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        std::fs::write(&path, value).map_err(io_err)
    }
}
