//! Lifecycle hooks and the adapter that runs them.
//!
//! Hooks are plain closures returning `Result<_, HookError>`. Every hook call
//! goes through [`invoke`], which also turns a panic inside the hook into a
//! [`HookError::Panicked`], so no hook failure crosses the engine boundary.

use crate::core::FormData;
use crate::form::SubmitResult;
use crate::step::ValidationResult;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by lifecycle hooks.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HookError {
    #[error("{0}")]
    Failed(String),

    #[error("{hook} hook panicked: {message}")]
    Panicked { hook: &'static str, message: String },
}

impl HookError {
    /// Convenience constructor for hook implementations.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Information handed to step enter/exit hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepContext<'a> {
    pub step_id: &'a str,
    pub title: &'a str,
}

/// Hook run when a step is entered or left.
pub type StepAction = Arc<dyn Fn(&FormData, &StepContext<'_>) -> Result<(), HookError> + Send + Sync>;

/// Step-level validator, run after every field passed.
pub type StepValidator = Arc<dyn Fn(&FormData) -> ValidationResult + Send + Sync>;

/// Hook observing a move from one step index to another.
pub type StepChangeHook = Arc<dyn Fn(usize, usize, &FormData) -> Result<(), HookError> + Send + Sync>;

/// Hook receiving the aggregated data when the form completes.
pub type CompleteHook = Arc<dyn Fn(&FormData) -> Result<SubmitResult, HookError> + Send + Sync>;

/// Hook receiving the aggregated data when the form is abandoned.
pub type CancelHook = Arc<dyn Fn(&FormData) -> Result<(), HookError> + Send + Sync>;

/// Run a hook, converting panics into [`HookError::Panicked`].
///
/// Failures are logged at `warn` level before being returned.
pub(crate) fn invoke<T, F>(hook: &'static str, call: F) -> Result<T, HookError>
where
    F: FnOnce() -> Result<T, HookError>,
{
    let result = match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(HookError::Panicked {
            hook,
            message: panic_message(payload.as_ref()),
        }),
    };

    if let Err(error) = &result {
        tracing::warn!(hook, %error, "lifecycle hook failed");
    }
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
