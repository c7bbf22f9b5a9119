//! Multi-step form orchestration.
//!
//! [`MultiStepForm`] ties step definitions, navigation rules and progress
//! tracking together behind one lifecycle API: create a session, commit data,
//! move between steps, then complete or cancel.

mod config;
mod engine;
mod error;
mod result;

pub use crate::navigation::FormOptions;
pub use config::FormConfig;
pub use engine::MultiStepForm;
pub use error::FormError;
pub use result::{FormCompletionResult, FormValidation, SubmitResult, FORM_ERROR_KEY};
