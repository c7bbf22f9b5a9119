//! Core form types.
//!
//! This module contains the pure data layer of the engine:
//! - Form data maps and merge rules
//! - Visibility conditions for steps
//! - Per-step and per-session state
//! - Immutable navigation history
//!
//! Nothing in this module performs I/O or mutates its inputs.

mod condition;
mod data;
mod history;
mod state;

pub use condition::Condition;
pub use data::{is_empty_value, merge_data, FormData};
pub use history::{NavigationDirection, NavigationHistory, StepTransition};
pub use state::{ErrorMap, FormState, StepState};
