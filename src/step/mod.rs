//! Step definitions.
//!
//! A step bundles a set of fields with an optional visibility condition,
//! an optional step-level validator and optional enter/exit hooks.

mod definition;
mod validation;

pub use definition::{StepConfig, StepDefinition};
pub use validation::{StepResult, ValidationResult, GENERAL_ERROR_KEY};
