//! Result types produced by the form facade.

use crate::core::{ErrorMap, FormData};
use serde::{Deserialize, Serialize};

/// Key used for form-level errors.
pub const FORM_ERROR_KEY: &str = "form";

/// Verdict returned by an `on_complete` hook.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub success: bool,
    #[serde(default)]
    pub errors: ErrorMap,
}

impl SubmitResult {
    pub fn accepted() -> Self {
        Self {
            success: true,
            errors: ErrorMap::new(),
        }
    }

    pub fn rejected(errors: ErrorMap) -> Self {
        Self {
            success: false,
            errors,
        }
    }
}

/// Outcome of [`MultiStepForm::complete`](super::MultiStepForm::complete).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormCompletionResult {
    pub success: bool,
    /// Aggregated form data, returned on success and failure alike
    pub data: FormData,
    pub errors: ErrorMap,
    pub message: String,
}

impl FormCompletionResult {
    pub(crate) fn succeeded(data: FormData) -> Self {
        Self {
            success: true,
            data,
            errors: ErrorMap::new(),
            message: "Form completed successfully".to_string(),
        }
    }

    pub(crate) fn failed(data: FormData, errors: ErrorMap, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            errors,
            message: message.into(),
        }
    }

    pub(crate) fn form_error(data: FormData, error: impl Into<String>, message: impl Into<String>) -> Self {
        let errors = ErrorMap::from([(FORM_ERROR_KEY.to_string(), error.into())]);
        Self::failed(data, errors, message)
    }
}

/// Outcome of a whole-form audit, keyed by step id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormValidation {
    pub is_valid: bool,
    pub errors: ErrorMap,
}

impl FormValidation {
    pub(crate) fn from_errors(errors: ErrorMap) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}
