//! # Storage Layer
//!
//! Storage is split in two:
//!
//! 1. **Backend** ([`StorageBackend`]): moves whole JSON documents between memory and a
//!    path. It knows nothing about courses or users.
//! 2. **Repository** ([`Repository`]): owns one collection document and implements the
//!    entity semantics on top of a backend: identity assignment, timestamps,
//!    not-found handling.
//!
//! ## Read-Modify-Write
//!
//! Every repository operation reads the whole collection, changes it in memory, and
//! (for mutations) writes the whole collection back. There is no index, no cache and
//! no partial update format. Each mutation costs O(n) in the collection size, which
//! is fine for the small, human-readable files this store is meant for.
//!
//! ## Concurrency
//!
//! There is no locking and no version field. Two operations that overlap on the same
//! file both read the old state and both write; the last write wins and the other
//! change is lost. Run one process per data directory.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production backend. Writes go to a temp file in the
//!   same directory and are renamed into place.
//! - [`mem_backend::MemBackend`]: in-memory backend for tests, with write counting
//!   and write-failure simulation.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── courseData.json    # { "courses": [...] }
//! ├── userData.json      # { "users": [...] }
//! └── campus.toml        # optional configuration
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod repository;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use repository::{CourseRepository, Repository, UserRepository};
