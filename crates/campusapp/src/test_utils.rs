use crate::api::{CampusApi, CampusPaths};
use crate::store::FsBackend;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

/// A campus data directory in a temp dir, removed on drop.
pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn paths(&self) -> CampusPaths {
        CampusPaths::in_dir(&self.root)
    }

    /// Opens an API over the real filesystem rooted at this env.
    pub fn api(&self) -> CampusApi<FsBackend> {
        CampusApi::open(FsBackend::new(), &self.paths()).expect("failed to open campus api")
    }

    /// Parsed contents of a file under the root.
    pub fn document(&self, name: &str) -> Value {
        let raw = std::fs::read_to_string(self.root.join(name)).expect("failed to read document");
        serde_json::from_str(&raw).expect("document is not JSON")
    }
}
