use super::backend::StorageBackend;
use crate::error::{CampusError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since tests drive it from a single thread.
/// This keeps the `StorageBackend` trait on `&self` for every method.
#[derive(Default)]
pub struct MemBackend {
    documents: RefCell<HashMap<PathBuf, String>>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Raw text currently stored at `path`.
    pub fn document(&self, path: &Path) -> Option<String> {
        self.documents.borrow().get(path).cloned()
    }

    /// Remove a document, as if the file was deleted behind our back.
    pub fn remove(&self, path: &Path) {
        self.documents.borrow_mut().remove(path);
    }
}

impl StorageBackend for MemBackend {
    fn exists(&self, path: &Path) -> bool {
        self.documents.borrow().contains_key(path)
    }

    fn read_raw(&self, path: &Path) -> Result<String> {
        self.documents
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| CampusError::Missing {
                path: path.to_path_buf(),
            })
    }

    fn write_raw(&self, path: &Path, raw: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(CampusError::Store("Simulated write error".to_string()));
        }
        self.documents
            .borrow_mut()
            .insert(path.to_path_buf(), raw.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
