use super::backend::StorageBackend;
use crate::error::{CampusError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use uuid::Uuid;

/// Filesystem backend. Stateless: every call goes straight to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsBackend;

impl FsBackend {
    pub fn new() -> Self {
        Self
    }

    fn ensure_parent(&self, path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                fs::create_dir_all(parent).map_err(|e| CampusError::io(parent, e))
            }
            _ => Ok(()),
        }
    }
}

impl StorageBackend for FsBackend {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_raw(&self, path: &Path) -> Result<String> {
        tracing::debug!(path = %path.display(), "reading document");
        fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CampusError::Missing {
                path: path.to_path_buf(),
            },
            _ => CampusError::io(path, e),
        })
    }

    fn write_raw(&self, path: &Path, raw: &str) -> Result<()> {
        self.ensure_parent(path)?;
        tracing::debug!(path = %path.display(), bytes = raw.len(), "writing document");

        // Atomic write: readers see either the old document or the new one.
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        let tmp_path = path.with_file_name(format!(".{}-{}.tmp", file_name, Uuid::new_v4()));
        fs::write(&tmp_path, raw).map_err(|e| CampusError::io(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(CampusError::io(path, e));
        }

        Ok(())
    }
}
