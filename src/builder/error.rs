//! Build errors for form and step builders.

use thiserror::Error;

/// Errors that can occur when building forms and steps.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Form id is empty. Pass a non-empty id to FormBuilder::new")]
    MissingId,

    #[error("Form title is empty. Pass a non-empty title to FormBuilder::new")]
    MissingTitle,

    #[error("No steps defined. Add at least one step")]
    NoSteps,

    #[error("Step id is empty. Every step needs an id")]
    EmptyStepId,

    #[error("Step id '{0}' is used more than once")]
    DuplicateStepId(String),
}
