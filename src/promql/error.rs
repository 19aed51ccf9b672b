//! Expression error types
//!
//! Builders only ever fail on empty required strings. Everything else (durations,
//! timestamps, modifier combinations) is passed through to the query text as-is.

use thiserror::Error;

/// Rejection of an empty required string at a builder setter
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Vector selector without a metric name
    #[error("Validation error: metric name must not be empty")]
    EmptyMetric,

    /// Label matcher without a label name
    #[error("Validation error: label name must not be empty")]
    EmptyLabelName,

    /// Function call without a function name
    #[error("Validation error: function name must not be empty")]
    EmptyFunction,
}

/// Errors raised while decoding or encoding expression trees
#[derive(Error, Debug)]
pub enum ExprError {
    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A decoded tree breaks a builder invariant
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type for expression encoding operations
pub type ExprResult<T> = Result<T, ExprError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ValidationError::EmptyMetric.to_string(),
            "Validation error: metric name must not be empty"
        );

        let err: ExprError = ValidationError::EmptyLabelName.into();
        assert_eq!(
            err.to_string(),
            "Validation error: label name must not be empty"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: ExprError = json_err.into();
        assert!(matches!(err, ExprError::Json(_)));
    }
}
