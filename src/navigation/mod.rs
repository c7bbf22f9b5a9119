//! Step navigation.
//!
//! [`StepNavigation`] is the single authority for every move between steps:
//! next, previous and jumps. It honors visibility conditions, per-step skip
//! flags and the form-wide [`FormOptions`].
//!
//! Rejections are values, not errors: a refused move yields a
//! [`NavigationResult`] with a [`RejectionReason`], or `None` from the
//! `navigate_*` wrappers.

mod options;
mod rules;

pub use crate::core::NavigationDirection;
pub use options::{FormOptions, NavigationOptions, NavigationResult, RejectionReason};
pub use rules::StepNavigation;
