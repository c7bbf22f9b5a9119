//! Builder API for ergonomic form construction.
//!
//! This module provides fluent builders and the [`form_data!`](crate::form_data)
//! macro for creating forms and their input with minimal boilerplate. Builders
//! check structural problems up front so a built form is always well formed.

pub mod error;
pub mod form;
pub mod macros;
pub mod step;

pub use error::BuildError;
pub use form::FormBuilder;
pub use step::StepBuilder;
