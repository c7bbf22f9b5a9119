//! Step configuration and behavior.

use super::validation::{StepResult, ValidationResult};
use crate::core::{merge_data, Condition, FormData, StepState};
use crate::field::{Field, FieldError};
use crate::hooks::{self, StepAction, StepContext, StepValidator};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Static configuration of one step.
///
/// Usually produced by [`StepBuilder`](crate::builder::StepBuilder).
#[derive(Clone)]
pub struct StepConfig {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<Arc<dyn Field>>,
    /// Visibility condition; the step is always shown when absent
    pub condition: Option<Condition>,
    pub can_skip: bool,
    pub validator: Option<StepValidator>,
    pub on_enter: Option<StepAction>,
    pub on_exit: Option<StepAction>,
}

impl StepConfig {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            fields: Vec::new(),
            condition: None,
            can_skip: false,
            validator: None,
            on_enter: None,
            on_exit: None,
        }
    }
}

impl fmt::Debug for StepConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepConfig")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("fields", &self.fields.len())
            .field("conditional", &self.condition.is_some())
            .field("can_skip", &self.can_skip)
            .finish_non_exhaustive()
    }
}

/// One step of a multi-step form.
///
/// Wraps a [`StepConfig`] and produces or updates the per-session
/// [`StepState`] for it. Every method is pure apart from the configured
/// enter/exit hooks run by [`execute`](Self::execute).
#[derive(Clone, Debug)]
pub struct StepDefinition {
    config: StepConfig,
}

impl StepDefinition {
    pub fn new(config: StepConfig) -> Self {
        Self { config }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn description(&self) -> Option<&str> {
        self.config.description.as_deref()
    }

    pub fn can_skip(&self) -> bool {
        self.config.can_skip
    }

    pub fn fields(&self) -> &[Arc<dyn Field>] {
        &self.config.fields
    }

    /// Whether the step is part of the form for the given aggregated data.
    pub fn should_show(&self, all_data: &FormData) -> bool {
        self.config
            .condition
            .as_ref()
            .is_none_or(|condition| condition.check(all_data))
    }

    /// Validate the step's data.
    ///
    /// All field failures are collected. The custom validator only runs when
    /// every field passed.
    pub fn validate(&self, data: &FormData) -> ValidationResult {
        let checks: Vec<Validation<(), NonEmptyVec<FieldError>>> = self
            .config
            .fields
            .iter()
            .map(|field| match field.check(data) {
                Ok(()) => Validation::success(()),
                Err(error) => Validation::fail(error),
            })
            .collect();

        if let Validation::Failure(errors) = Validation::all_vec(checks) {
            return ValidationResult::from_field_errors(errors.iter().cloned());
        }

        match &self.config.validator {
            Some(validator) => validator(data),
            None => ValidationResult::valid(),
        }
    }

    /// Run enter hook, validation and exit hook against submitted data.
    pub fn execute(&self, data: &FormData) -> StepResult {
        let context = self.context();

        if let Some(on_enter) = &self.config.on_enter {
            if let Err(error) = hooks::invoke("on_enter", || on_enter(data, &context)) {
                return StepResult::Failed {
                    error: error.to_string(),
                };
            }
        }

        let validation = self.validate(data);
        if !validation.is_valid {
            return StepResult::Retry {
                error: validation
                    .error
                    .unwrap_or_else(|| "Validation failed".to_string()),
            };
        }

        if let Some(on_exit) = &self.config.on_exit {
            if let Err(error) = hooks::invoke("on_exit", || on_exit(data, &context)) {
                return StepResult::Failed {
                    error: error.to_string(),
                };
            }
        }

        StepResult::Accepted(data.clone())
    }

    /// Fresh state for this step, marked as visited now.
    pub fn create_initial_state(&self, step_index: usize) -> StepState {
        StepState {
            step_id: self.config.id.clone(),
            step_index,
            data: FormData::new(),
            is_valid: false,
            is_complete: false,
            visited_at: Some(Utc::now()),
            completed_at: None,
            errors: None,
        }
    }

    /// Merge new data into a step state and re-validate the merged data.
    pub fn update_state(&self, state: &StepState, data: &FormData) -> StepState {
        let merged = merge_data(&state.data, data);
        let validation = self.validate(&merged);

        StepState {
            data: merged,
            is_valid: validation.is_valid,
            is_complete: validation.is_valid,
            completed_at: validation.is_valid.then(Utc::now),
            errors: validation.error_map(),
            ..state.clone()
        }
    }

    pub fn field(&self, name: &str) -> Option<&Arc<dyn Field>> {
        self.config.fields.iter().find(|field| field.name() == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.config.fields.iter().map(|field| field.name()).collect()
    }

    /// One-line description such as `"Contact (3 fields, 2 required)"`.
    pub fn summary(&self) -> String {
        let required = self
            .config
            .fields
            .iter()
            .filter(|field| field.is_required())
            .count();
        format!(
            "{} ({} fields, {} required)",
            self.config.title,
            self.config.fields.len(),
            required
        )
    }

    fn context(&self) -> StepContext<'_> {
        StepContext {
            step_id: &self.config.id,
            title: &self.config.title,
        }
    }
}
