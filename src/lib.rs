//! Stepwise: a pure functional multi-step form engine
//!
//! Stepwise drives conversational wizards such as chat-bot sign-up flows.
//! A form is immutable configuration; every session lives in a plain
//! [`FormState`] value, and each operation takes a state and returns a new one.
//! Side effects are confined to lifecycle hooks supplied by the caller.
//!
//! # Core Concepts
//!
//! - **Steps**: Fields, an optional visibility condition and optional hooks
//! - **Navigation**: One authority for next, previous and jump moves
//! - **Progress**: Completion counts, percentages and time statistics
//! - **Forms**: The lifecycle facade tying it all together
//!
//! # Example
//!
//! ```rust
//! use stepwise::builder::{FormBuilder, StepBuilder};
//! use stepwise::field::FieldSchema;
//! use stepwise::form_data;
//!
//! let form = FormBuilder::new("order", "Pizza order")
//!     .step(StepBuilder::new("size", "Size").field(
//!         FieldSchema::select("size", "Size", ["small", "large"]).required(),
//!     ))
//!     .unwrap()
//!     .step(StepBuilder::new("address", "Address").field(
//!         FieldSchema::text("address", "Address").required().min_length(5),
//!     ))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let state = form.create_initial_state(1, 1);
//! let state = form.update_current_step(&state, &form_data! { "size" => "large" }).unwrap();
//! let state = form.move_to_next_step(&state).unwrap();
//! let state = form
//!     .update_current_step(&state, &form_data! { "address" => "12 Elm Street" })
//!     .unwrap();
//!
//! assert!(form.can_complete(&state));
//! let result = form.complete(&state);
//! assert!(result.success);
//! assert_eq!(result.data["size"], "large");
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod field;
pub mod form;
pub mod hooks;
pub mod navigation;
pub mod progress;
pub mod session;
pub mod step;

#[doc(hidden)]
pub use serde_json as __serde_json;

// Re-export commonly used types
pub use builder::{BuildError, FormBuilder, StepBuilder};
pub use core::{Condition, FormData, FormState, StepState};
pub use field::{Field, FieldSchema};
pub use form::{FormCompletionResult, FormConfig, FormOptions, MultiStepForm, SubmitResult};
pub use hooks::HookError;
pub use navigation::StepNavigation;
pub use progress::{ProgressInfo, ProgressTracker};
pub use session::{InMemorySessionStore, SessionKey, SessionStore};
pub use step::{StepConfig, StepDefinition, ValidationResult};
