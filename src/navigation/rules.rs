//! Navigation rules engine.

use super::options::{FormOptions, NavigationOptions, NavigationResult, RejectionReason};
use crate::core::{FormData, FormState, NavigationDirection, StepTransition};
use crate::step::{StepConfig, StepDefinition};
use chrono::Utc;
use std::collections::HashMap;

/// Decides whether and where a session may move.
///
/// Holds the ordered steps, an id→index map for constant-time lookups and
/// the form-wide [`FormOptions`]. All decisions are pure functions of the
/// configuration and the state passed in.
#[derive(Clone, Debug)]
pub struct StepNavigation {
    steps: Vec<StepDefinition>,
    index_by_id: HashMap<String, usize>,
    options: FormOptions,
}

impl StepNavigation {
    pub fn new(steps: Vec<StepConfig>, options: FormOptions) -> Self {
        let steps: Vec<StepDefinition> = steps.into_iter().map(StepDefinition::new).collect();
        let mut index_by_id = HashMap::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            index_by_id.entry(step.id().to_string()).or_insert(index);
        }

        Self {
            steps,
            index_by_id,
            options,
        }
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn step_by_id(&self, id: &str) -> Option<&StepDefinition> {
        self.step_index(id).and_then(|index| self.steps.get(index))
    }

    pub fn step_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Indices of the steps visible for the given data, in order.
    ///
    /// This is the one definition of "required steps" shared by completion
    /// checks and progress tracking.
    pub fn visible_indices(&self, all_data: &FormData) -> Vec<usize> {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, step)| step.should_show(all_data))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn visible_steps(&self, all_data: &FormData) -> Vec<&StepDefinition> {
        self.steps
            .iter()
            .filter(|step| step.should_show(all_data))
            .collect()
    }

    pub fn next_visible_index(&self, current: usize, all_data: &FormData) -> Option<usize> {
        (current + 1..self.steps.len()).find(|&index| self.steps[index].should_show(all_data))
    }

    pub fn previous_visible_index(&self, current: usize, all_data: &FormData) -> Option<usize> {
        (0..current.min(self.steps.len()))
            .rev()
            .find(|&index| self.steps[index].should_show(all_data))
    }

    /// Decide whether a move is allowed and where it lands.
    pub fn can_navigate(&self, state: &FormState, options: &NavigationOptions) -> NavigationResult {
        let result = self.evaluate(state, options);
        tracing::debug!(
            form_id = %state.form_id,
            direction = %options.direction,
            from = state.current_step_index,
            to = ?result.target_step_index,
            reason = ?result.reason.as_ref().map(ToString::to_string),
            "navigation evaluated"
        );
        result
    }

    fn evaluate(&self, state: &FormState, options: &NavigationOptions) -> NavigationResult {
        if state.is_complete {
            return NavigationResult::rejected(RejectionReason::FormAlreadyComplete);
        }
        if self.steps.get(state.current_step_index).is_none() {
            return NavigationResult::rejected(RejectionReason::CurrentStepNotFound);
        }

        match options.direction {
            NavigationDirection::Next => self.evaluate_next(state, options),
            NavigationDirection::Previous => self.evaluate_previous(state),
            NavigationDirection::Jump => self.evaluate_jump(state, options),
        }
    }

    fn evaluate_next(&self, state: &FormState, options: &NavigationOptions) -> NavigationResult {
        let current_valid = state
            .current_step_state()
            .is_some_and(|step_state| step_state.is_valid);
        if !options.skip_validation && !current_valid {
            return NavigationResult::rejected(RejectionReason::CurrentStepInvalid);
        }

        match self.next_visible_index(state.current_step_index, &state.all_data) {
            Some(index) => NavigationResult::allowed(index),
            None => NavigationResult::rejected(RejectionReason::NoNextStep),
        }
    }

    fn evaluate_previous(&self, state: &FormState) -> NavigationResult {
        if !self.options.allow_back_navigation {
            return NavigationResult::rejected(RejectionReason::BackNavigationDisabled);
        }

        match self.previous_visible_index(state.current_step_index, &state.all_data) {
            Some(index) => NavigationResult::allowed(index),
            None => NavigationResult::rejected(RejectionReason::NoPreviousStep),
        }
    }

    fn evaluate_jump(&self, state: &FormState, options: &NavigationOptions) -> NavigationResult {
        let target = match (options.target_step_index, &options.target_step_id) {
            (Some(index), _) => index,
            (None, Some(id)) => match self.step_index(id) {
                Some(index) => index,
                None => {
                    return NavigationResult::rejected(RejectionReason::UnknownStep {
                        id: id.clone(),
                    })
                }
            },
            (None, None) => return NavigationResult::rejected(RejectionReason::NoTarget),
        };

        let Some(target_step) = self.steps.get(target) else {
            return NavigationResult::rejected(RejectionReason::IndexOutOfRange {
                index: target,
                total: self.steps.len(),
            });
        };

        if !target_step.should_show(&state.all_data) {
            return NavigationResult::rejected(RejectionReason::TargetHidden {
                id: target_step.id().to_string(),
            });
        }

        let current = state.current_step_index;
        if target > current && !self.options.allow_skip_steps {
            if let Some(blocking) = self.first_unmet_step(state, current, target) {
                return NavigationResult::rejected(RejectionReason::StepIncomplete {
                    position: blocking + 1,
                    id: self.steps[blocking].id().to_string(),
                });
            }
        } else if target < current && !self.options.allow_back_navigation {
            return NavigationResult::rejected(RejectionReason::BackNavigationDisabled);
        }

        NavigationResult::allowed(target)
    }

    /// First step in `from..to` that is neither valid nor skippable.
    ///
    /// Visibility does not exempt a step here; hidden steps still need to be
    /// valid or `can_skip` for a forward jump to pass over them.
    fn first_unmet_step(&self, state: &FormState, from: usize, to: usize) -> Option<usize> {
        (from..to).find(|&index| {
            let valid = state.steps.get(index).is_some_and(|s| s.is_valid);
            !valid && !self.steps[index].can_skip()
        })
    }

    pub fn navigate_next(&self, state: &FormState) -> Option<FormState> {
        self.navigate(state, &NavigationOptions::next())
    }

    pub fn navigate_previous(&self, state: &FormState) -> Option<FormState> {
        self.navigate(state, &NavigationOptions::previous())
    }

    pub fn jump_to_step(&self, state: &FormState, step_id: &str) -> Option<FormState> {
        self.navigate(state, &NavigationOptions::jump_to_id(step_id))
    }

    pub fn jump_to_index(&self, state: &FormState, index: usize) -> Option<FormState> {
        self.navigate(state, &NavigationOptions::jump_to_index(index))
    }

    /// Apply an arbitrary navigation request.
    ///
    /// Returns `None` when [`can_navigate`](Self::can_navigate) rejects it.
    pub fn navigate(&self, state: &FormState, options: &NavigationOptions) -> Option<FormState> {
        let target = self.can_navigate(state, options).target()?;
        Some(self.move_to(state, target, options.direction))
    }

    fn move_to(&self, state: &FormState, target: usize, direction: NavigationDirection) -> FormState {
        let now = Utc::now();
        let transition = StepTransition {
            from: state.current_step_index,
            to: target,
            direction,
            timestamp: now,
        };

        FormState {
            current_step_index: target,
            last_updated_at: now,
            history: state.history.record(transition),
            ..state.clone()
        }
    }

    /// Whether every currently visible step is complete.
    ///
    /// Visibility is evaluated against the state's current data, so a step
    /// hidden by later answers never blocks completion.
    pub fn is_form_complete(&self, state: &FormState) -> bool {
        self.visible_indices(&state.all_data).into_iter().all(|index| {
            state
                .steps
                .get(index)
                .is_some_and(|step_state| step_state.is_complete)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Condition, NavigationHistory, StepState};
    use serde_json::json;

    fn config(id: &str) -> StepConfig {
        StepConfig::new(id, id.to_uppercase())
    }

    fn navigation(configs: Vec<StepConfig>, options: FormOptions) -> StepNavigation {
        StepNavigation::new(configs, options)
    }

    fn linear(options: FormOptions) -> StepNavigation {
        navigation(vec![config("a"), config("b"), config("c")], options)
    }

    fn state_for(nav: &StepNavigation) -> FormState {
        let now = Utc::now();
        FormState {
            form_id: "test".into(),
            user_id: 1,
            chat_id: 1,
            current_step_index: 0,
            steps: nav
                .steps()
                .iter()
                .enumerate()
                .map(|(i, step)| step.create_initial_state(i))
                .collect(),
            all_data: FormData::new(),
            is_complete: false,
            started_at: now,
            last_updated_at: now,
            completed_at: None,
            history: NavigationHistory::new(),
        }
    }

    fn complete_step(state: &mut FormState, index: usize) {
        let step: &mut StepState = &mut state.steps[index];
        step.is_valid = true;
        step.is_complete = true;
        step.completed_at = Some(Utc::now());
    }

    #[test]
    fn next_requires_valid_current_step() {
        let nav = linear(FormOptions::default());
        let state = state_for(&nav);

        let result = nav.can_navigate(&state, &NavigationOptions::next());
        assert!(!result.allowed);
        assert_eq!(result.reason, Some(RejectionReason::CurrentStepInvalid));
        assert!(nav.navigate_next(&state).is_none());
    }

    #[test]
    fn next_with_skip_validation_ignores_validity() {
        let nav = linear(FormOptions::default());
        let state = state_for(&nav);

        let result = nav.can_navigate(&state, &NavigationOptions::next().skip_validation());
        assert_eq!(result.target(), Some(1));
    }

    #[test]
    fn next_moves_and_records_history() {
        let nav = linear(FormOptions::default());
        let mut state = state_for(&nav);
        complete_step(&mut state, 0);

        let moved = nav.navigate_next(&state).unwrap();
        assert_eq!(moved.current_step_index, 1);
        assert_eq!(moved.history.path(), vec![0, 1]);
        assert!(moved.last_updated_at >= state.last_updated_at);
        assert_eq!(state.current_step_index, 0);
    }

    #[test]
    fn next_skips_hidden_steps() {
        let mut hidden = config("b");
        hidden.condition = Some(Condition::equals("show_b", true));
        let nav = navigation(vec![config("a"), hidden, config("c")], FormOptions::default());
        let mut state = state_for(&nav);
        complete_step(&mut state, 0);

        assert_eq!(nav.navigate_next(&state).unwrap().current_step_index, 2);

        state.all_data.insert("show_b".into(), json!(true));
        assert_eq!(nav.navigate_next(&state).unwrap().current_step_index, 1);
    }

    #[test]
    fn next_on_last_step_is_rejected() {
        let nav = linear(FormOptions::default());
        let mut state = state_for(&nav);
        state.current_step_index = 2;
        complete_step(&mut state, 2);

        let result = nav.can_navigate(&state, &NavigationOptions::next());
        assert_eq!(result.reason, Some(RejectionReason::NoNextStep));
    }

    #[test]
    fn previous_finds_nearest_visible_step() {
        let mut hidden = config("b");
        hidden.condition = Some(Condition::new(|_| false));
        let nav = navigation(vec![config("a"), hidden, config("c")], FormOptions::default());
        let mut state = state_for(&nav);
        state.current_step_index = 2;

        assert_eq!(nav.navigate_previous(&state).unwrap().current_step_index, 0);
    }

    #[test]
    fn previous_on_first_step_is_rejected() {
        let nav = linear(FormOptions::default());
        let state = state_for(&nav);

        let result = nav.can_navigate(&state, &NavigationOptions::previous());
        assert_eq!(result.reason, Some(RejectionReason::NoPreviousStep));
    }

    #[test]
    fn back_navigation_can_be_disabled() {
        let nav = linear(FormOptions {
            allow_back_navigation: false,
            allow_skip_steps: false,
        });
        let mut state = state_for(&nav);
        state.current_step_index = 2;

        assert_eq!(
            nav.can_navigate(&state, &NavigationOptions::previous()).reason,
            Some(RejectionReason::BackNavigationDisabled)
        );
        assert_eq!(
            nav.can_navigate(&state, &NavigationOptions::jump_to_index(0)).reason,
            Some(RejectionReason::BackNavigationDisabled)
        );
    }

    #[test]
    fn jump_forward_over_incomplete_step_is_rejected() {
        let nav = linear(FormOptions::default());
        let mut state = state_for(&nav);
        complete_step(&mut state, 0);

        let result = nav.can_navigate(&state, &NavigationOptions::jump_to_id("c"));
        assert!(!result.allowed);
        let reason = result.reason.unwrap().to_string();
        assert!(reason.contains("must be completed first"));
        assert!(reason.contains("Step 2"));
        assert!(nav.jump_to_step(&state, "c").is_none());
    }

    #[test]
    fn jump_forward_over_hidden_incomplete_step_is_rejected() {
        let mut hidden = config("b");
        hidden.condition = Some(Condition::new(|_| false));
        let nav = navigation(vec![config("a"), hidden, config("c")], FormOptions::default());
        let mut state = state_for(&nav);
        complete_step(&mut state, 0);

        let result = nav.can_navigate(&state, &NavigationOptions::jump_to_id("c"));
        assert!(!result.allowed);
        assert_eq!(
            result.reason,
            Some(RejectionReason::StepIncomplete {
                position: 2,
                id: "b".to_string()
            })
        );
    }

    #[test]
    fn jump_forward_allowed_when_form_allows_skipping() {
        let nav = linear(FormOptions {
            allow_back_navigation: true,
            allow_skip_steps: true,
        });
        let state = state_for(&nav);

        let moved = nav.jump_to_step(&state, "c").unwrap();
        assert_eq!(moved.current_step_index, 2);
        assert_eq!(moved.history.transitions()[0].direction, NavigationDirection::Jump);
    }

    #[test]
    fn jump_forward_allowed_over_skippable_steps() {
        let mut a = config("a");
        a.can_skip = true;
        let mut b = config("b");
        b.can_skip = true;
        let nav = navigation(vec![a, b, config("c")], FormOptions::default());
        let state = state_for(&nav);

        assert_eq!(nav.jump_to_step(&state, "c").unwrap().current_step_index, 2);
    }

    #[test]
    fn jump_forward_allowed_over_completed_steps() {
        let nav = linear(FormOptions::default());
        let mut state = state_for(&nav);
        complete_step(&mut state, 0);
        complete_step(&mut state, 1);

        assert_eq!(nav.jump_to_index(&state, 2).unwrap().current_step_index, 2);
    }

    #[test]
    fn jump_rejects_unknown_or_hidden_targets() {
        let mut hidden = config("b");
        hidden.condition = Some(Condition::new(|_| false));
        let nav = navigation(vec![config("a"), hidden], FormOptions::default());
        let state = state_for(&nav);

        assert_eq!(
            nav.can_navigate(&state, &NavigationOptions::jump_to_id("zzz")).reason,
            Some(RejectionReason::UnknownStep { id: "zzz".into() })
        );
        assert_eq!(
            nav.can_navigate(&state, &NavigationOptions::jump_to_index(9)).reason,
            Some(RejectionReason::IndexOutOfRange { index: 9, total: 2 })
        );
        assert_eq!(
            nav.can_navigate(&state, &NavigationOptions::jump_to_id("b")).reason,
            Some(RejectionReason::TargetHidden { id: "b".into() })
        );

        let mut no_target = NavigationOptions::jump_to_index(0);
        no_target.target_step_index = None;
        assert_eq!(
            nav.can_navigate(&state, &no_target).reason,
            Some(RejectionReason::NoTarget)
        );
    }

    #[test]
    fn completed_form_rejects_navigation() {
        let nav = linear(FormOptions::default());
        let mut state = state_for(&nav);
        complete_step(&mut state, 0);
        let state = state.mark_complete();

        assert_eq!(
            nav.can_navigate(&state, &NavigationOptions::next()).reason,
            Some(RejectionReason::FormAlreadyComplete)
        );
    }

    #[test]
    fn out_of_range_current_index_is_rejected() {
        let nav = linear(FormOptions::default());
        let mut state = state_for(&nav);
        state.current_step_index = 10;

        assert_eq!(
            nav.can_navigate(&state, &NavigationOptions::previous()).reason,
            Some(RejectionReason::CurrentStepNotFound)
        );
    }

    #[test]
    fn form_completion_ignores_hidden_steps() {
        let mut conditional = config("b");
        conditional.condition = Some(Condition::equals("married", true));
        let nav = navigation(vec![config("a"), conditional], FormOptions::default());
        let mut state = state_for(&nav);
        complete_step(&mut state, 0);

        assert!(nav.is_form_complete(&state));

        state.all_data.insert("married".into(), json!(true));
        assert!(!nav.is_form_complete(&state));
    }

    #[test]
    fn lookups_by_id_are_stable() {
        let nav = linear(FormOptions::default());

        assert_eq!(nav.step_index("b"), Some(1));
        assert_eq!(nav.step_by_id("c").map(|s| s.id()), Some("c"));
        assert_eq!(nav.step_index("missing"), None);
        assert_eq!(nav.total_steps(), 3);
    }
}
