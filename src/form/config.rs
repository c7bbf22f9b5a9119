//! Form configuration.

use crate::hooks::{CancelHook, CompleteHook, StepChangeHook};
use crate::navigation::FormOptions;
use crate::step::StepConfig;
use std::fmt;

/// Everything a [`MultiStepForm`](super::MultiStepForm) needs, supplied once.
///
/// Usually produced by [`FormBuilder`](crate::builder::FormBuilder).
#[derive(Clone)]
pub struct FormConfig {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub steps: Vec<StepConfig>,
    pub options: FormOptions,
    /// Observes moves; never affects the navigation outcome
    pub on_step_change: Option<StepChangeHook>,
    pub on_complete: Option<CompleteHook>,
    pub on_cancel: Option<CancelHook>,
}

impl FormConfig {
    pub fn new(id: impl Into<String>, title: impl Into<String>, steps: Vec<StepConfig>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            steps,
            options: FormOptions::default(),
            on_step_change: None,
            on_complete: None,
            on_cancel: None,
        }
    }
}

impl fmt::Debug for FormConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormConfig")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("steps", &self.steps)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
