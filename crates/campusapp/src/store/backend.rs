use crate::error::{CampusError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Abstract interface for raw document I/O.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// [`super::Repository`] handles the "what" (identity, timestamps, not-found).
/// Implementors only move whole documents; they know nothing about entities.
pub trait StorageBackend {
    /// Whether a document exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the full text of the document at `path`.
    /// Returns `CampusError::Missing` if there is nothing there.
    fn read_raw(&self, path: &Path) -> Result<String>;

    /// Overwrite the document at `path` with `raw`.
    fn write_raw(&self, path: &Path, raw: &str) -> Result<()>;

    /// Read and parse a JSON document. The shape of `T` is not checked beyond
    /// what deserialization itself requires.
    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T>
    where
        Self: Sized,
    {
        let raw = self.read_raw(path)?;
        serde_json::from_str(&raw).map_err(|e| CampusError::serialization(path, e))
    }

    /// Serialize `document` as pretty-printed JSON and overwrite `path` with it.
    fn write<T: Serialize + ?Sized>(&self, document: &T, path: &Path) -> Result<()>
    where
        Self: Sized,
    {
        let raw =
            serde_json::to_string_pretty(document).map_err(|e| CampusError::serialization(path, e))?;
        self.write_raw(path, &raw)
    }
}

impl<B: StorageBackend> StorageBackend for &B {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read_raw(&self, path: &Path) -> Result<String> {
        (**self).read_raw(path)
    }

    fn write_raw(&self, path: &Path, raw: &str) -> Result<()> {
        (**self).write_raw(path, raw)
    }
}
