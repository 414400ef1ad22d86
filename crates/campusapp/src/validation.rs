//! # Validation Gate
//!
//! Untyped input (a decoded request body, a CLI argument) must pass through this gate
//! before it can become a candidate for a repository. Repositories perform no schema
//! checks of their own and trust whatever reaches them.
//!
//! ## Schemas Are Data
//!
//! A [`Schema`] is a plain table: for each field, whether it must be present and which
//! [`Constraint`]s its value has to satisfy. The per-entity tables live next to the
//! entities in [`crate::model`], so the complete rule set for a kind can be read (and
//! tested) in one place.
//!
//! ## Evaluation Rules
//!
//! - The input must be a JSON object; anything else yields a single violation on `$`.
//! - Every rule is evaluated. All violations are collected and returned together, so
//!   a client sees every problem with its input at once.
//! - Within a field, constraints are checked in order and the first failure is
//!   reported. `price: "ten"` is reported as "not a number", not also as "negative".
//! - `null` on an optional field is treated as absent. `null` on a required field is
//!   a `required` violation.
//! - Unknown fields are dropped, never rejected (whitelist semantics).

use crate::error::{CampusError, Result};
use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Whether a field has to be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// A single predicate on a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Field is missing or null but the schema requires it.
    Required,
    String,
    /// A string with at least one non-whitespace character.
    NonEmpty,
    /// An RFC 3339 timestamp string.
    Date,
    Number,
    NonNegative,
    OneOf(&'static [&'static str]),
    Email,
    /// An array whose every element is a string.
    EachString,
    /// The whole input is not a JSON object.
    Object,
}

impl Constraint {
    /// Stable identifier reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::String => "is_string",
            Constraint::NonEmpty => "is_not_empty",
            Constraint::Date => "is_date",
            Constraint::Number => "is_number",
            Constraint::NonNegative => "is_non_negative",
            Constraint::OneOf(_) => "is_enum",
            Constraint::Email => "is_email",
            Constraint::EachString => "each_is_string",
            Constraint::Object => "is_object",
        }
    }

    fn describe(&self) -> String {
        match self {
            Constraint::Required => "is required".to_string(),
            Constraint::String => "must be a string".to_string(),
            Constraint::NonEmpty => "must not be empty".to_string(),
            Constraint::Date => "must be an RFC 3339 date".to_string(),
            Constraint::Number => "must be a number".to_string(),
            Constraint::NonNegative => "must not be negative".to_string(),
            Constraint::OneOf(values) => format!("must be one of: {}", values.join(", ")),
            Constraint::Email => "must be a valid email address".to_string(),
            Constraint::EachString => "must be an array of strings".to_string(),
            Constraint::Object => "must be a JSON object".to_string(),
        }
    }

    /// Returns true if `value` satisfies the constraint.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Constraint::Required => !value.is_null(),
            Constraint::String => value.is_string(),
            Constraint::NonEmpty => value.as_str().is_some_and(|s| !s.trim().is_empty()),
            Constraint::Date => value
                .as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok()),
            Constraint::Number => value.is_number(),
            Constraint::NonNegative => value.as_f64().is_some_and(|n| n >= 0.0),
            Constraint::OneOf(values) => value.as_str().is_some_and(|s| values.contains(&s)),
            Constraint::Email => value.as_str().is_some_and(is_valid_email),
            Constraint::EachString => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Constraint::Object => value.is_object(),
        }
    }
}

/// One rule of a [`Schema`].
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub presence: Presence,
    pub constraints: &'static [Constraint],
}

impl FieldRule {
    pub const fn required(field: &'static str, constraints: &'static [Constraint]) -> Self {
        Self {
            field,
            presence: Presence::Required,
            constraints,
        }
    }

    pub const fn optional(field: &'static str, constraints: &'static [Constraint]) -> Self {
        Self {
            field,
            presence: Presence::Optional,
            constraints,
        }
    }
}

/// A named, ordered list of field rules.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub rules: &'static [FieldRule],
}

impl Schema {
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }
}

/// A violated constraint on a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub constraint: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        let field = field.into();
        let message = format!("{} {}", field, constraint.describe());
        Self {
            field,
            constraint: constraint.code(),
            message,
        }
    }
}

/// Runs `schema` against `input` and returns the whitelisted object.
pub fn validate(input: &Value, schema: &Schema) -> Result<Map<String, Value>> {
    let Some(object) = input.as_object() else {
        return Err(CampusError::Validation(vec![Violation::new(
            "$",
            Constraint::Object,
        )]));
    };

    let mut violations = Vec::new();
    let mut accepted = Map::new();

    for rule in schema.rules {
        let value = object.get(rule.field).filter(|v| !v.is_null());
        let Some(value) = value else {
            if rule.presence == Presence::Required {
                violations.push(Violation::new(rule.field, Constraint::Required));
            }
            continue;
        };

        match rule.constraints.iter().find(|c| !c.check(value)) {
            Some(failed) => violations.push(Violation::new(rule.field, *failed)),
            None => {
                accepted.insert(rule.field.to_string(), value.clone());
            }
        }
    }

    if violations.is_empty() {
        Ok(accepted)
    } else {
        tracing::debug!(
            schema = schema.name,
            count = violations.len(),
            "input rejected by validation gate"
        );
        Err(CampusError::Validation(violations))
    }
}

/// Validates `input` and decodes the surviving fields into a typed candidate.
pub fn decode<T: DeserializeOwned>(input: &Value, schema: &Schema) -> Result<T> {
    let accepted = validate(input, schema)?;
    serde_json::from_value(Value::Object(accepted)).map_err(|e| {
        // A schema that admits values its candidate type cannot hold is a bug in
        // the schema table; still report it as a validation failure on `$`.
        tracing::warn!(schema = schema.name, error = %e, "candidate decoding failed");
        CampusError::Validation(vec![Violation {
            field: "$".to_string(),
            constraint: "decodes",
            message: e.to_string(),
        }])
    })
}

/// Parses a raw request body. Malformed JSON is a validation failure on `$`.
pub fn parse_body(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| {
        CampusError::Validation(vec![Violation {
            field: "$".to_string(),
            constraint: "is_json",
            message: format!("body is not valid JSON: {}", e),
        }])
    })
}

/// Syntactic email check: `local@domain.tld`, no whitespace, a single `@`,
/// non-empty dot-separated domain labels.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain
        .split('.')
        .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}
