//! Navigation requests, policies and decisions.

use crate::core::NavigationDirection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Form-wide navigation policies.
///
/// Deserializable so the policies can live in a configuration file; missing
/// keys take the defaults (back navigation on, skipping off).
///
/// # Example
///
/// ```rust
/// use stepwise::navigation::FormOptions;
///
/// let options: FormOptions = serde_json::from_str(r#"{ "allow_skip_steps": true }"#).unwrap();
/// assert!(options.allow_back_navigation);
/// assert!(options.allow_skip_steps);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    pub allow_back_navigation: bool,
    pub allow_skip_steps: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            allow_back_navigation: true,
            allow_skip_steps: false,
        }
    }
}

/// A navigation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationOptions {
    pub direction: NavigationDirection,
    /// Explicit jump target; takes precedence over `target_step_id`
    pub target_step_index: Option<usize>,
    pub target_step_id: Option<String>,
    /// Let `next` leave an invalid step
    pub skip_validation: bool,
}

impl NavigationOptions {
    fn new(direction: NavigationDirection) -> Self {
        Self {
            direction,
            target_step_index: None,
            target_step_id: None,
            skip_validation: false,
        }
    }

    pub fn next() -> Self {
        Self::new(NavigationDirection::Next)
    }

    pub fn previous() -> Self {
        Self::new(NavigationDirection::Previous)
    }

    pub fn jump_to_id(step_id: impl Into<String>) -> Self {
        Self {
            target_step_id: Some(step_id.into()),
            ..Self::new(NavigationDirection::Jump)
        }
    }

    pub fn jump_to_index(index: usize) -> Self {
        Self {
            target_step_index: Some(index),
            ..Self::new(NavigationDirection::Jump)
        }
    }

    pub fn skip_validation(mut self) -> Self {
        self.skip_validation = true;
        self
    }
}

/// Why a navigation request was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("Form is already complete")]
    FormAlreadyComplete,

    #[error("Current step not found")]
    CurrentStepNotFound,

    #[error("Current step is not valid")]
    CurrentStepInvalid,

    #[error("No more steps available")]
    NoNextStep,

    #[error("No previous step available")]
    NoPreviousStep,

    #[error("Back navigation is disabled")]
    BackNavigationDisabled,

    #[error("No target step specified")]
    NoTarget,

    #[error("Target step '{id}' not found")]
    UnknownStep { id: String },

    #[error("Invalid target step index {index} (form has {total} steps)")]
    IndexOutOfRange { index: usize, total: usize },

    #[error("Target step '{id}' is not visible")]
    TargetHidden { id: String },

    #[error("Step {position} ({id}) must be completed first")]
    StepIncomplete { position: usize, id: String },
}

/// Decision returned by [`StepNavigation::can_navigate`](super::StepNavigation::can_navigate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationResult {
    pub allowed: bool,
    pub target_step_index: Option<usize>,
    pub reason: Option<RejectionReason>,
}

impl NavigationResult {
    pub fn allowed(target_step_index: usize) -> Self {
        Self {
            allowed: true,
            target_step_index: Some(target_step_index),
            reason: None,
        }
    }

    pub fn rejected(reason: RejectionReason) -> Self {
        Self {
            allowed: false,
            target_step_index: None,
            reason: Some(reason),
        }
    }

    /// Target index when the move is allowed.
    pub fn target(&self) -> Option<usize> {
        self.target_step_index.filter(|_| self.allowed)
    }
}
