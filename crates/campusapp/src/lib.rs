//! # Campus Architecture
//!
//! Campus is a **UI-agnostic record store** for two kinds of entities, courses and
//! users, persisted as flat JSON files. It is a library first; the `campus` binary is
//! one client of it, and an HTTP adapter would be another.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Boundary (the campus CLI, an HTTP adapter, tests)          │
//! │  - Parses requests, renders responses                       │
//! │  - Maps errors to status codes via `error::Exposure`        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Runs every body through the validation gate              │
//! │  - Dispatches to the matching repository                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Validation Gate (validation.rs, schemas in model.rs)       │
//! │  - Declarative per-field rules, whitelist of known fields   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Repository<E, B>: identity, timestamps, not-found        │
//! │  - StorageBackend: FsBackend (production), MemBackend       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout or stderr or exits the process. Diagnostics
//! go through `tracing`; installing a subscriber is the client's job.
//!
//! ## Testing Strategy
//!
//! 1. **Repository and validation**: unit tests against [`store::MemBackend`].
//! 2. **API**: unit tests of the full gate-then-repository path, also in memory.
//! 3. **Filesystem**: integration tests in `tests/` against [`store::FsBackend`] in a
//!    temporary directory.
//! 4. **CLI**: end-to-end tests in the `campus` crate.

pub mod api;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod store;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod validation;
