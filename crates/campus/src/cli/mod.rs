//! # CLI Behavior
//!
//! This is **one possible client** for campus records. It is the only place that
//! knows about terminal I/O and exit codes.
//!
//! ## Commands
//!
//! Every command addresses one collection, `course` or `user`:
//!
//! - `campus course list`
//! - `campus course get <id>`
//! - `campus course create '<json>'`
//! - `campus course update '<json with id>'`
//! - `campus course delete <id>`
//!
//! A body of `-` is read from stdin, so `cat course.json | campus course create -`
//! works.
//!
//! ## Data Location
//!
//! `--data <dir>` picks the directory holding `courseData.json` and `userData.json`.
//! Without it, configuration decides (see `campusapp::config`).
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: context wiring and dispatch to the API
//! - `render`: JSON output and error reports
//! - `logging`: tracing subscriber installation

mod commands;
mod logging;
mod render;
pub mod setup;

pub use commands::run;
pub use render::report;
