//! # Errors and Their Classification
//!
//! Every fallible operation in campusapp returns [`Result<T>`], whose error side is
//! [`CampusError`]. Callers match on the variant when they care about the detail, and
//! ask for its [`ErrorKind`] when they only need to know which *class* of failure
//! occurred.
//!
//! ## The Taxonomy
//!
//! | Kind | Code | Status | Exposed to clients |
//! |------|------|--------|--------------------|
//! | [`ErrorKind::ValidationFailure`] | `validation_failure` | 400 | message + every violation |
//! | [`ErrorKind::NotFound`] | `not_found` | 404 | generic "<kind> not found" |
//! | [`ErrorKind::StorageFailure`] | `storage_failure` | 500 | generic message only |
//! | [`ErrorKind::Internal`] | `internal` | 500 | "Internal Server Error" |
//!
//! Boundary layers (the CLI, or an HTTP adapter) never format a `CampusError`
//! themselves. They call [`CampusError::exposure`] (or [`classify`] for errors of
//! unknown origin) and render the resulting [`Exposure`]. Storage errors carry the
//! failing path in their `Display` output for logs, but the exposure never does.

use crate::validation::Violation;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CampusError {
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{collection} collection not found at {path}")]
    CollectionNotFound {
        collection: &'static str,
        path: PathBuf,
    },

    #[error("{}", ValidationSummary(.0))]
    Validation(Vec<Violation>),

    #[error("no document at {path}")]
    Missing { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error at {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CampusError>;

impl CampusError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn serialization(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Serialization {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CampusError::Validation(_) => ErrorKind::ValidationFailure,
            CampusError::NotFound { .. } | CampusError::CollectionNotFound { .. } => {
                ErrorKind::NotFound
            }
            CampusError::Missing { .. }
            | CampusError::Io { .. }
            | CampusError::Serialization { .. }
            | CampusError::Store(_) => ErrorKind::StorageFailure,
            CampusError::Config(_) => ErrorKind::Internal,
        }
    }

    /// The violations behind a validation failure, empty for every other variant.
    pub fn violations(&self) -> &[Violation] {
        match self {
            CampusError::Validation(violations) => violations,
            _ => &[],
        }
    }

    /// Builds the client-facing view of this error.
    pub fn exposure(&self) -> Exposure {
        let kind = self.kind();
        let message = match self {
            CampusError::Validation(_) => "Data is invalid".to_string(),
            CampusError::NotFound { kind, id } => format!("{kind} with id {id} not found"),
            CampusError::CollectionNotFound { collection, .. } => {
                format!("{collection} not found")
            }
            _ => kind.default_message().to_string(),
        };
        let details = match self {
            CampusError::Validation(violations) => Some(violations.clone()),
            _ => None,
        };
        Exposure {
            error: message,
            status: kind.status(),
            code: kind.code(),
            details,
        }
    }
}

/// Class of a failure, as seen by a boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationFailure,
    NotFound,
    StorageFailure,
    Internal,
}

impl ErrorKind {
    /// Stable discriminant, safe to match on across releases.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::ValidationFailure => "validation_failure",
            ErrorKind::NotFound => "not_found",
            ErrorKind::StorageFailure => "storage_failure",
            ErrorKind::Internal => "internal",
        }
    }

    /// Default HTTP-style status for this class.
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::ValidationFailure => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::StorageFailure | ErrorKind::Internal => 500,
        }
    }

    pub fn is_client_error(self) -> bool {
        (400..500).contains(&self.status())
    }

    fn default_message(self) -> &'static str {
        match self {
            ErrorKind::ValidationFailure => "Data is invalid",
            ErrorKind::NotFound => "not found",
            ErrorKind::StorageFailure => "Storage unavailable",
            ErrorKind::Internal => "Internal Server Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What a client is allowed to see about a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exposure {
    pub error: String,
    pub status: u16,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Violation>>,
}

/// Classifies an error of any origin. Anything that is not a [`CampusError`] is
/// reported as [`ErrorKind::Internal`] with a generic message.
pub fn classify(err: &(dyn std::error::Error + 'static)) -> Exposure {
    match err.downcast_ref::<CampusError>() {
        Some(campus) => campus.exposure(),
        None => {
            let kind = ErrorKind::Internal;
            Exposure {
                error: kind.default_message().to_string(),
                status: kind.status(),
                code: kind.code(),
                details: None,
            }
        }
    }
}

struct ValidationSummary<'a>(&'a [Violation]);

impl fmt::Display for ValidationSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}
