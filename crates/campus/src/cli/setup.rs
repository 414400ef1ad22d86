use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "campus",
    bin_name = "campus",
    version,
    disable_help_subcommand = true,
    after_help = "Bodies are JSON objects. Use '-' to read the body from stdin:\n  cat course.json | campus course create -"
)]
#[command(about = "Manage course and user records stored as JSON files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the collection files
    #[arg(short, long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Course records
    #[command(subcommand)]
    Course(RecordCommand),

    /// User records
    #[command(subcommand)]
    User(RecordCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum RecordCommand {
    /// List all records
    #[command(alias = "ls")]
    List,

    /// Show one record
    #[command(alias = "view")]
    Get {
        /// Record id
        id: String,
    },

    /// Create a record from a JSON body
    #[command(alias = "new")]
    Create {
        /// JSON object, or '-' for stdin
        body: String,
    },

    /// Update a record; the JSON body must carry its id
    Update {
        /// JSON object, or '-' for stdin
        body: String,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: String,
    },
}
