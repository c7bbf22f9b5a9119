//! Errors raised when a state does not fit the form it is used with.

use thiserror::Error;

/// A [`FormState`](crate::core::FormState) that was not produced by this form.
///
/// Navigation and validation failures are never reported this way; they are
/// ordinary result values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("State belongs to form '{found}', expected '{expected}'")]
    FormMismatch { expected: String, found: String },

    #[error("State has {found} steps, form defines {expected}")]
    StepCountMismatch { expected: usize, found: usize },

    #[error("Current step {index} not found (form has {total} steps)")]
    StepOutOfRange { index: usize, total: usize },
}
