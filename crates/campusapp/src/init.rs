//! # Context Initialization
//!
//! [`initialize`] is the one place where a process-facing client turns its
//! environment into a ready [`CampusApi`]. It resolves configuration, opens both
//! collections over [`FsBackend`], and hands back a [`CampusContext`].
//!
//! ## Data Directory
//!
//! 1. `data_override` (the CLI's `--data`), if given.
//! 2. Otherwise `data_dir` from the environment or the user config file.
//! 3. Otherwise the current directory.
//!
//! Once the data directory is known, `<data_dir>/campus.toml` is layered on top of
//! the user config file for the remaining settings.
//!
//! ## User Config Directory
//!
//! `CAMPUS_CONFIG_DIR` if set, else the OS config directory for `campus` as reported
//! by `directories`. Tests point `CAMPUS_CONFIG_DIR` at a temp dir to stay isolated
//! from the developer's own settings.

use crate::api::CampusApi;
use crate::config::{CampusConfig, CONFIG_FILE};
use crate::error::Result;
use crate::store::FsBackend;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub struct CampusContext {
    pub api: CampusApi<FsBackend>,
    pub config: CampusConfig,
}

/// Directory holding the user-level `campus.toml`, if one can be determined.
pub fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("CAMPUS_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| {
            ProjectDirs::from("org", "campus", "campus").map(|dirs| dirs.config_dir().to_path_buf())
        })
}

/// Resolves the effective configuration.
///
/// `user_dir` is the directory searched for the user-level config file.
pub fn resolve_config(data_override: Option<PathBuf>, user_dir: Option<&Path>) -> Result<CampusConfig> {
    let user_files: Vec<PathBuf> = user_dir.map(|d| d.join(CONFIG_FILE)).into_iter().collect();

    let data_dir = match data_override {
        Some(dir) => dir,
        None => CampusConfig::load(&user_files)?.data_dir,
    };

    let mut files = vec![data_dir.join(CONFIG_FILE)];
    files.extend(user_files);

    let config = CampusConfig::load(&files)?.with_data_dir(data_dir);
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        courses = %config.courses_file.display(),
        users = %config.users_file.display(),
        "configuration resolved"
    );
    Ok(config)
}

/// Builds the campus context over the filesystem.
///
/// Collection files that do not exist yet are created empty.
///
/// ```ignore
/// // Data in the current directory (or wherever config points)
/// let ctx = initialize(None)?;
///
/// // Data in an explicit directory
/// let ctx = initialize(Some(PathBuf::from("/srv/campus")))?;
/// ```
pub fn initialize(data_override: Option<PathBuf>) -> Result<CampusContext> {
    let user_dir = user_config_dir();
    let config = resolve_config(data_override, user_dir.as_deref())?;
    let api = CampusApi::open(FsBackend::new(), &config.paths())?;
    Ok(CampusContext { api, config })
}
