use anyhow::Result;
use campusapp::error::{classify, CampusError, Exposure};
use serde::Serialize;

/// Pretty JSON for stdout.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// What the user gets to see about `err`.
pub fn exposure(err: &anyhow::Error) -> Exposure {
    match err.downcast_ref::<CampusError>() {
        Some(campus) => campus.exposure(),
        None => {
            let source: &(dyn std::error::Error + 'static) = err.as_ref();
            classify(source)
        }
    }
}

pub fn exit_code(exposure: &Exposure) -> i32 {
    if (400..500).contains(&exposure.status) {
        2
    } else {
        1
    }
}

/// Prints the error report to stderr and returns the exit code.
pub fn report(err: &anyhow::Error) -> i32 {
    tracing::debug!(error = ?err, "command failed");
    let exposure = exposure(err);
    match json(&exposure) {
        Ok(body) => eprintln!("{}", body),
        Err(_) => eprintln!("Error: {}", exposure.error),
    }
    exit_code(&exposure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusapp::validation::{Constraint, Violation};

    #[test]
    fn test_not_found_is_client_error() {
        let err = anyhow::Error::new(CampusError::not_found("course", "abc"));
        let exposure = exposure(&err);
        assert_eq!(exposure.status, 404);
        assert_eq!(exposure.error, "course with id abc not found");
        assert_eq!(exit_code(&exposure), 2);
    }

    #[test]
    fn test_validation_lists_violations() {
        let err = anyhow::Error::new(CampusError::Validation(vec![Violation::new(
            "price",
            Constraint::Number,
        )]));
        let body = json(&exposure(&err)).unwrap();
        assert!(body.contains("\"details\""));
        assert!(body.contains("\"price\""));
    }

    #[test]
    fn test_foreign_errors_are_internal() {
        let err = anyhow::anyhow!("disk on fire");
        let exposure = exposure(&err);
        assert_eq!(exposure.status, 500);
        assert_eq!(exposure.code, "internal");
        assert!(!exposure.error.contains("disk"));
        assert_eq!(exit_code(&exposure), 1);
    }

    #[test]
    fn test_storage_errors_exit_one() {
        let err = anyhow::Error::new(CampusError::Store("boom".into()));
        assert_eq!(exit_code(&exposure(&err)), 1);
    }
}
