//! # Campus CLI Architecture
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this file only
//! invokes `cli::run()` and turns a failure into an exit code.
//!
//! ## Workspace Structure
//!
//! - `crates/campusapp/`: the library. Records, validation, storage, configuration.
//! - `crates/campus/`: this CLI, one client of the library.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/campus/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - JSON output and error reports (render.rs)                │
//! │  - tracing subscriber (logging.rs)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/campusapp/src/api.rs)                    │
//! │  - Validation gate, then repository                         │
//! │  - Returns typed records or a classified `CampusError`      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Output Contract
//!
//! - Success: pretty JSON on stdout, exit 0.
//! - Failure: the error exposure `{ error, status, code, details? }` on stderr.
//!   Exit 2 when the caller is at fault (4xx), 1 otherwise.
//! - Logs: stderr, filtered by `CAMPUS_LOG` or `-v`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        std::process::exit(cli::report(&e));
    }
}
