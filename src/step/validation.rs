//! Validation and execution results for steps.

use crate::core::{ErrorMap, FormData};
use crate::field::FieldError;

/// Key used for errors that do not belong to a single field.
pub const GENERAL_ERROR_KEY: &str = "general";

/// Outcome of validating a step's data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Summary message, present when invalid
    pub error: Option<String>,
    /// Failures keyed by field name
    pub field_errors: ErrorMap,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
            field_errors: ErrorMap::new(),
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            field_errors: ErrorMap::new(),
        }
    }

    /// Build a failed result from accumulated field failures.
    ///
    /// The summary joins every message with `", "`; the first failure per
    /// field is kept in `field_errors`.
    pub fn from_field_errors<I>(errors: I) -> Self
    where
        I: IntoIterator<Item = FieldError>,
    {
        let mut messages = Vec::new();
        let mut field_errors = ErrorMap::new();
        for error in errors {
            messages.push(error.message.clone());
            field_errors.entry(error.field).or_insert(error.message);
        }

        Self {
            is_valid: false,
            error: Some(messages.join(", ")),
            field_errors,
        }
    }

    /// Error map stored on the step state, if any.
    pub fn error_map(&self) -> Option<ErrorMap> {
        if self.is_valid {
            return None;
        }
        if !self.field_errors.is_empty() {
            return Some(self.field_errors.clone());
        }
        let message = self
            .error
            .clone()
            .unwrap_or_else(|| "Validation failed".to_string());
        Some(ErrorMap::from([(GENERAL_ERROR_KEY.to_string(), message)]))
    }
}

/// Outcome of executing a step against submitted data.
#[derive(Clone, Debug, PartialEq)]
pub enum StepResult {
    /// Data passed validation and both hooks ran
    Accepted(FormData),

    /// Data failed validation, the step should be asked again
    Retry { error: String },

    /// A hook failed, retrying the same input will not help
    Failed { error: String },
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn should_retry(&self) -> bool {
        matches!(self, Self::Retry { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Accepted(_) => None,
            Self::Retry { error } | Self::Failed { error } => Some(error),
        }
    }

    pub fn data(&self) -> Option<&FormData> {
        match self {
            Self::Accepted(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_error(field: &str, message: &str) -> FieldError {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }

    #[test]
    fn field_errors_are_joined_and_keyed() {
        let result = ValidationResult::from_field_errors(vec![
            field_error("name", "Name is required"),
            field_error("age", "Must be a valid number"),
        ]);

        assert!(!result.is_valid);
        assert_eq!(
            result.error.as_deref(),
            Some("Name is required, Must be a valid number")
        );
        assert_eq!(result.field_errors["age"], "Must be a valid number");
    }

    #[test]
    fn step_level_errors_use_general_key() {
        let result = ValidationResult::invalid("Dates overlap");
        let map = result.error_map().unwrap();
        assert_eq!(map[GENERAL_ERROR_KEY], "Dates overlap");
    }

    #[test]
    fn valid_result_has_no_error_map() {
        assert!(ValidationResult::valid().error_map().is_none());
    }

    #[test]
    fn step_result_accessors() {
        let retry = StepResult::Retry {
            error: "bad".into(),
        };
        assert!(retry.should_retry());
        assert!(!retry.is_success());
        assert_eq!(retry.error(), Some("bad"));

        let failed = StepResult::Failed {
            error: "hook".into(),
        };
        assert!(!failed.should_retry());

        let accepted = StepResult::Accepted(FormData::new());
        assert!(accepted.is_success());
        assert!(accepted.data().is_some());
        assert!(accepted.error().is_none());
    }
}
