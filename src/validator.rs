//! Pluggable validation of decoded documents.
//!
//! The environment only stores a validator; what it checks is up to the
//! application. Two small implementations are provided.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintViolation {
    /// JSON-pointer-like location of the offending value (`""` for the root).
    pub path: String,
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} {}", self.path, self.message)
        }
    }
}

/// Validates a JSON value, returning every violation found.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value) -> Vec<ConstraintViolation>;
}

/// Accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopValidator;

impl Validator for NoopValidator {
    fn validate(&self, _value: &Value) -> Vec<ConstraintViolation> {
        Vec::new()
    }
}

/// Requires the root to be an object with the listed members present and non-null.
#[derive(Debug, Clone, Default)]
pub struct RequiredFields {
    fields: Vec<String>,
}

impl RequiredFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for RequiredFields {
    fn validate(&self, value: &Value) -> Vec<ConstraintViolation> {
        let Some(object) = value.as_object() else {
            return vec![ConstraintViolation::new("", "must be an object")];
        };

        self.fields
            .iter()
            .filter(|field| object.get(field.as_str()).map_or(true, Value::is_null))
            .map(|field| ConstraintViolation::new(format!("/{}", field), "may not be null"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_noop_accepts_anything() {
        assert!(NoopValidator.validate(&json!(null)).is_empty());
    }

    #[test]
    fn test_required_fields() {
        let validator = RequiredFields::new(["id", "name"]);

        assert!(validator.validate(&json!({"id": 1, "name": "a"})).is_empty());

        let violations = validator.validate(&json!({"id": 1, "name": null}));
        assert_eq!(violations, vec![ConstraintViolation::new("/name", "may not be null")]);
        assert_eq!(violations[0].to_string(), "/name may not be null");

        let violations = validator.validate(&json!([1, 2]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].to_string(), "must be an object");
    }
}
