//! # Configuration
//!
//! Campus configuration is managed by [`confique`], which handles layered loading
//! from TOML files, environment variables, and compiled defaults.
//!
//! ## Resolution Order
//!
//! Highest priority first:
//! 1. **Environment variables**: `CAMPUS_DATA_DIR`, `CAMPUS_COURSES_FILE`, `CAMPUS_USERS_FILE`.
//! 2. **Data directory config**: `<data_dir>/campus.toml`.
//! 3. **User config**: `campus.toml` in the OS config directory (via `directories`),
//!    or in `CAMPUS_CONFIG_DIR` when set.
//! 4. **Compiled defaults**.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | `.` | Directory holding the collection files |
//! | `courses_file` | `courseData.json` | Course collection, relative to `data_dir` |
//! | `users_file` | `userData.json` | User collection, relative to `data_dir` |

use crate::api::CampusPaths;
use crate::error::{CampusError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "campus.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CampusConfig {
    /// Directory holding the collection files.
    #[config(env = "CAMPUS_DATA_DIR", default = ".")]
    pub data_dir: PathBuf,

    /// Course collection file, relative to `data_dir` unless absolute.
    #[config(env = "CAMPUS_COURSES_FILE", default = "courseData.json")]
    pub courses_file: PathBuf,

    /// User collection file, relative to `data_dir` unless absolute.
    #[config(env = "CAMPUS_USERS_FILE", default = "userData.json")]
    pub users_file: PathBuf,
}

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            courses_file: PathBuf::from("courseData.json"),
            users_file: PathBuf::from("userData.json"),
        }
    }
}

impl CampusConfig {
    /// Load from the environment and the given TOML files. Earlier files win
    /// over later ones; missing files are skipped.
    pub fn load(files: &[PathBuf]) -> Result<Self> {
        let mut builder = Self::builder().env();
        for file in files {
            builder = builder.file(file);
        }
        builder
            .load()
            .map_err(|e| CampusError::Config(e.to_string()))
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn paths(&self) -> CampusPaths {
        CampusPaths {
            courses: self.resolve(&self.courses_file),
            users: self.resolve(&self.users_file),
        }
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }
}
