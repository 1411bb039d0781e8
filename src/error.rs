//! Error types shared by the environment and its runtime.

use crate::config::loader::ConfigError;
use crate::validator::ConstraintViolation;

/// Boxed error returned by application-supplied collaborators
/// (managed objects, health checks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced while composing or running a service environment.
///
/// `Configuration` and `InvalidArgument` are raised during setup and are
/// never retried: they abort bootstrap immediately.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    /// A required construction argument is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A registration or setter call received an unusable value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A decoded document failed validation.
    #[error("validation failed: {}", join_violations(.0))]
    Validation(Vec<ConstraintViolation>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A managed object failed to start.
    #[error("managed object '{object}' failed to start: {source}")]
    Lifecycle {
        object: String,
        #[source]
        source: BoxError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for EnvironmentError {
    fn from(err: ConfigError) -> Self {
        EnvironmentError::Configuration(err.to_string())
    }
}

fn join_violations(violations: &[ConstraintViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl EnvironmentError {
    pub(crate) fn missing(argument: &str) -> Self {
        EnvironmentError::Configuration(format!("missing required argument '{}'", argument))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_config;
    use crate::config::ServiceConfig;

    #[test]
    fn test_missing_argument_message() {
        let err = EnvironmentError::missing("metrics");
        assert_eq!(
            err.to_string(),
            "configuration error: missing required argument 'metrics'"
        );
    }

    #[test]
    fn test_config_error_becomes_configuration() {
        let mut config = ServiceConfig::default();
        config.name = String::new();
        let errors = validate_config(&config).unwrap_err();

        let err: EnvironmentError = ConfigError::Validation(errors).into();
        match err {
            EnvironmentError::Configuration(message) => {
                assert_eq!(message, "Validation failed: name: must not be empty")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validation_message_lists_violations() {
        let err = EnvironmentError::Validation(vec![
            ConstraintViolation::new("/id", "may not be null"),
            ConstraintViolation::new("", "must be an object"),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: /id may not be null; must be an object"
        );
    }
}
