//! The multi-step form facade.

use super::config::FormConfig;
use super::error::FormError;
use super::result::{FormCompletionResult, FormValidation};
use crate::core::{merge_data, ErrorMap, FormData, FormState, NavigationHistory, StepState};
use crate::hooks::{self, CancelHook, CompleteHook, HookError, StepChangeHook};
use crate::navigation::StepNavigation;
use crate::progress::{format_duration, ProgressTracker};
use crate::step::StepDefinition;
use chrono::Utc;
use std::fmt;

/// Public lifecycle API of a multi-step form.
///
/// A form is immutable configuration; each session's progress lives in a
/// [`FormState`] owned by the caller. Every operation takes a state and
/// returns a new one, so a form can serve any number of sessions.
///
/// # Example
///
/// ```rust
/// use stepwise::builder::{FormBuilder, StepBuilder};
/// use stepwise::field::FieldSchema;
/// use stepwise::form_data;
///
/// let form = FormBuilder::new("signup", "Sign up")
///     .step(StepBuilder::new("name", "Your name").field(FieldSchema::text("name", "Name").required()))
///     .unwrap()
///     .step(StepBuilder::new("confirm", "Confirm"))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let state = form.create_initial_state(42, 42);
/// assert!(form.move_to_next_step(&state).is_none());
///
/// let state = form.update_current_step(&state, &form_data! { "name" => "Huda" }).unwrap();
/// let state = form.move_to_next_step(&state).unwrap();
/// assert_eq!(state.current_step_index, 1);
/// ```
pub struct MultiStepForm {
    id: String,
    title: String,
    description: Option<String>,
    navigation: StepNavigation,
    on_step_change: Option<StepChangeHook>,
    on_complete: Option<CompleteHook>,
    on_cancel: Option<CancelHook>,
}

impl MultiStepForm {
    /// Assemble a form from a configuration that already passed the builder
    /// checks. Outside the crate, use [`FormBuilder`](crate::builder::FormBuilder)
    /// or `MultiStepForm::try_from(config)`.
    pub(crate) fn new(config: FormConfig) -> Self {
        Self {
            navigation: StepNavigation::new(config.steps, config.options),
            id: config.id,
            title: config.title,
            description: config.description,
            on_step_change: config.on_step_change,
            on_complete: config.on_complete,
            on_cancel: config.on_cancel,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn navigation(&self) -> &StepNavigation {
        &self.navigation
    }

    pub fn progress_tracker(&self) -> ProgressTracker<'_> {
        ProgressTracker::new(&self.navigation)
    }

    /// Start a session on the first step.
    pub fn create_initial_state(&self, user_id: i64, chat_id: i64) -> FormState {
        let now = Utc::now();
        let steps = self
            .navigation
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| step.create_initial_state(index))
            .collect();

        tracing::debug!(form_id = %self.id, user_id, chat_id, "form session created");

        FormState {
            form_id: self.id.clone(),
            user_id,
            chat_id,
            current_step_index: 0,
            steps,
            all_data: FormData::new(),
            is_complete: false,
            started_at: now,
            last_updated_at: now,
            completed_at: None,
            history: NavigationHistory::new(),
        }
    }

    pub fn current_step(&self, state: &FormState) -> Option<&StepDefinition> {
        self.navigation.step(state.current_step_index)
    }

    pub fn current_step_state<'s>(&self, state: &'s FormState) -> Option<&'s StepState> {
        state.current_step_state()
    }

    /// Commit data to the current step.
    ///
    /// The step is re-validated against its merged data and `data` is merged
    /// into `all_data` (later writes win). Fails only for a state that was not
    /// created by this form.
    pub fn update_current_step(&self, state: &FormState, data: &FormData) -> Result<FormState, FormError> {
        self.check_state(state)?;
        let index = state.current_step_index;
        let (step, step_state) = match (self.navigation.step(index), state.steps.get(index)) {
            (Some(step), Some(step_state)) => (step, step_state),
            _ => {
                return Err(FormError::StepOutOfRange {
                    index,
                    total: self.navigation.total_steps(),
                })
            }
        };

        let updated = step.update_state(step_state, data);
        tracing::debug!(
            form_id = %self.id,
            step_id = step.id(),
            is_valid = updated.is_valid,
            "step data updated"
        );

        let mut steps = state.steps.clone();
        steps[index] = updated;

        Ok(FormState {
            steps,
            all_data: merge_data(&state.all_data, data),
            last_updated_at: Utc::now(),
            ..state.clone()
        })
    }

    /// Advance to the next visible step.
    ///
    /// Returns `None` when the current step is invalid or navigation refuses
    /// the move. A landed-on step without a visit marker gets a fresh state;
    /// `all_data` is left alone.
    pub fn move_to_next_step(&self, state: &FormState) -> Option<FormState> {
        if !state.current_step_state().is_some_and(|s| s.is_valid) {
            return None;
        }

        if let Some(next) = self
            .navigation
            .next_visible_index(state.current_step_index, &state.all_data)
        {
            self.notify_step_change(state.current_step_index, next, &state.all_data);
        }

        let mut moved = self.navigation.navigate_next(state)?;
        let index = moved.current_step_index;
        let unvisited = moved.steps.get(index).is_some_and(|s| s.visited_at.is_none());
        if unvisited {
            if let Some(step) = self.navigation.step(index) {
                moved.steps[index] = step.create_initial_state(index);
            }
        }
        Some(moved)
    }

    pub fn move_to_previous_step(&self, state: &FormState) -> Option<FormState> {
        if let Some(previous) = self
            .navigation
            .previous_visible_index(state.current_step_index, &state.all_data)
        {
            self.notify_step_change(state.current_step_index, previous, &state.all_data);
        }

        self.navigation.navigate_previous(state)
    }

    /// Jump to a step by id. Unknown ids return `None` without running hooks.
    pub fn jump_to_step(&self, state: &FormState, step_id: &str) -> Option<FormState> {
        let target = self.navigation.step_index(step_id)?;
        self.notify_step_change(state.current_step_index, target, &state.all_data);
        self.navigation.jump_to_step(state, step_id)
    }

    pub fn can_complete(&self, state: &FormState) -> bool {
        self.navigation.is_form_complete(state)
    }

    /// Finish the form, running the `on_complete` hook.
    ///
    /// Hook rejections, errors and panics all come back as a failed result.
    pub fn complete(&self, state: &FormState) -> FormCompletionResult {
        let data = state.all_data.clone();
        if !self.can_complete(state) {
            return FormCompletionResult::form_error(
                data,
                "Not all required steps are completed",
                "Please complete all required steps",
            );
        }

        if let Some(on_complete) = &self.on_complete {
            match hooks::invoke("on_complete", || on_complete(&state.all_data)) {
                Ok(result) if !result.success => {
                    return FormCompletionResult::failed(data, result.errors, "Form submission failed");
                }
                Ok(_) => {}
                Err(error) => {
                    return FormCompletionResult::form_error(
                        data,
                        error.to_string(),
                        "An error occurred while completing the form",
                    );
                }
            }
        }

        tracing::info!(form_id = %self.id, user_id = state.user_id, "form completed");
        FormCompletionResult::succeeded(data)
    }

    /// Abandon the form, running the `on_cancel` hook once.
    ///
    /// The state is left untouched; discarding the session is up to the caller.
    pub fn cancel(&self, state: &FormState) -> Result<(), HookError> {
        tracing::info!(form_id = %self.id, user_id = state.user_id, "form cancelled");
        match &self.on_cancel {
            Some(on_cancel) => hooks::invoke("on_cancel", || on_cancel(&state.all_data)),
            None => Ok(()),
        }
    }

    /// Audit every configured step, visible or not.
    pub fn validate_all(&self, state: &FormState) -> FormValidation {
        self.audit(state, 0..self.navigation.total_steps())
    }

    /// Audit only the steps visible for the current data.
    pub fn validate_visible(&self, state: &FormState) -> FormValidation {
        self.audit(state, self.navigation.visible_indices(&state.all_data))
    }

    fn audit(&self, state: &FormState, indices: impl IntoIterator<Item = usize>) -> FormValidation {
        let mut errors = ErrorMap::new();
        for index in indices {
            let Some(step) = self.navigation.step(index) else {
                continue;
            };
            let Some(step_state) = state.steps.get(index) else {
                errors.insert(step.id().to_string(), "Step not found".to_string());
                continue;
            };

            let result = step.validate(&step_state.data);
            if !result.is_valid {
                let message = result
                    .error
                    .unwrap_or_else(|| "Validation failed".to_string());
                errors.insert(step.id().to_string(), message);
            }
        }
        FormValidation::from_errors(errors)
    }

    /// Data committed to one step, or `None` for an unknown id.
    pub fn get_step_data<'s>(&self, state: &'s FormState, step_id: &str) -> Option<&'s FormData> {
        let index = self.navigation.step_index(step_id)?;
        state.steps.get(index).map(|s| &s.data)
    }

    pub fn get_all_data(&self, state: &FormState) -> FormData {
        state.all_data.clone()
    }

    /// Multi-line summary: title, progress and elapsed time.
    pub fn summary(&self, state: &FormState) -> String {
        let tracker = self.progress_tracker();
        let progress = tracker.progress(state);
        let stats = tracker.time_stats(state);

        format!(
            "{}\nProgress: {}/{} ({}%)\nTime: {}",
            self.title,
            progress.completed_steps,
            progress.total_steps,
            progress.percentage,
            format_duration(stats.total)
        )
    }

    /// Start over for the same user and chat.
    pub fn reset(&self, state: &FormState) -> FormState {
        self.create_initial_state(state.user_id, state.chat_id)
    }

    fn notify_step_change(&self, from: usize, to: usize, all_data: &FormData) {
        if let Some(on_step_change) = &self.on_step_change {
            // failures are logged by the adapter and never block the move
            let _ = hooks::invoke("on_step_change", || on_step_change(from, to, all_data));
        }
    }

    fn check_state(&self, state: &FormState) -> Result<(), FormError> {
        if state.form_id != self.id {
            return Err(FormError::FormMismatch {
                expected: self.id.clone(),
                found: state.form_id.clone(),
            });
        }
        if state.steps.len() != self.navigation.total_steps() {
            return Err(FormError::StepCountMismatch {
                expected: self.navigation.total_steps(),
                found: state.steps.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for MultiStepForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiStepForm")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("navigation", &self.navigation)
            .finish_non_exhaustive()
    }
}
