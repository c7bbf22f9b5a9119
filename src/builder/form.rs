//! Builder for constructing multi-step forms.

use crate::builder::error::BuildError;
use crate::builder::step::StepBuilder;
use crate::core::FormData;
use crate::form::{FormConfig, MultiStepForm, SubmitResult};
use crate::hooks::HookError;
use crate::navigation::FormOptions;
use crate::step::StepConfig;
use std::collections::HashSet;
use std::sync::Arc;

/// Builder for constructing forms with a fluent API.
pub struct FormBuilder {
    config: FormConfig,
}

impl FormBuilder {
    /// Create a builder for a form with the given id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            config: FormConfig::new(id, title, Vec::new()),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    /// Add a step using a builder.
    /// Returns an error if the builder fails validation.
    pub fn step(mut self, builder: StepBuilder) -> Result<Self, BuildError> {
        let step = builder.build()?;
        self.config.steps.push(step);
        Ok(self)
    }

    /// Add a pre-built step.
    pub fn add_step(mut self, step: StepConfig) -> Self {
        self.config.steps.push(step);
        self
    }

    /// Add multiple steps at once.
    pub fn steps(mut self, steps: Vec<StepConfig>) -> Self {
        self.config.steps.extend(steps);
        self
    }

    pub fn options(mut self, options: FormOptions) -> Self {
        self.config.options = options;
        self
    }

    pub fn allow_back_navigation(mut self, allow: bool) -> Self {
        self.config.options.allow_back_navigation = allow;
        self
    }

    pub fn allow_skip_steps(mut self, allow: bool) -> Self {
        self.config.options.allow_skip_steps = allow;
        self
    }

    pub fn on_step_change<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize, usize, &FormData) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.config.on_step_change = Some(Arc::new(hook));
        self
    }

    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FormData) -> Result<SubmitResult, HookError> + Send + Sync + 'static,
    {
        self.config.on_complete = Some(Arc::new(hook));
        self
    }

    pub fn on_cancel<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FormData) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.config.on_cancel = Some(Arc::new(hook));
        self
    }

    /// Validate and return the configuration without building the form.
    pub fn into_config(self) -> Result<FormConfig, BuildError> {
        check_config(&self.config)?;
        Ok(self.config)
    }

    /// Build the form.
    /// Returns an error if the configuration is incomplete or inconsistent.
    pub fn build(self) -> Result<MultiStepForm, BuildError> {
        let config = self.into_config()?;
        tracing::debug!(form_id = %config.id, steps = config.steps.len(), "form built");
        Ok(MultiStepForm::new(config))
    }
}

/// Structural checks every form configuration must pass.
pub(crate) fn check_config(config: &FormConfig) -> Result<(), BuildError> {
    if config.id.trim().is_empty() {
        return Err(BuildError::MissingId);
    }
    if config.title.trim().is_empty() {
        return Err(BuildError::MissingTitle);
    }
    if config.steps.is_empty() {
        return Err(BuildError::NoSteps);
    }

    let mut seen = HashSet::new();
    for step in &config.steps {
        if step.id.trim().is_empty() {
            return Err(BuildError::EmptyStepId);
        }
        if !seen.insert(step.id.as_str()) {
            return Err(BuildError::DuplicateStepId(step.id.clone()));
        }
    }
    Ok(())
}

impl TryFrom<FormConfig> for MultiStepForm {
    type Error = BuildError;

    fn try_from(config: FormConfig) -> Result<Self, Self::Error> {
        check_config(&config)?;
        Ok(MultiStepForm::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSchema;

    #[test]
    fn builder_validates_required_fields() {
        let result = FormBuilder::new("", "Title").build();
        assert!(matches!(result, Err(BuildError::MissingId)));

        let result = FormBuilder::new("id", " ").build();
        assert!(matches!(result, Err(BuildError::MissingTitle)));
    }

    #[test]
    fn builder_requires_steps() {
        let result = FormBuilder::new("survey", "Survey").build();

        assert!(matches!(result, Err(BuildError::NoSteps)));
    }

    #[test]
    fn builder_rejects_duplicate_step_ids() {
        let result = FormBuilder::new("survey", "Survey")
            .add_step(StepConfig::new("q1", "First"))
            .add_step(StepConfig::new("q1", "Again"))
            .build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::DuplicateStepId("q1".to_string())
        );
    }

    #[test]
    fn builder_rejects_empty_pre_built_step_id() {
        let result = FormBuilder::new("survey", "Survey")
            .add_step(StepConfig::new("", "Nameless"))
            .build();

        assert!(matches!(result, Err(BuildError::EmptyStepId)));
    }

    #[test]
    fn fluent_api_builds_form() {
        let form = FormBuilder::new("survey", "Survey")
            .description("Quick questions")
            .allow_back_navigation(false)
            .allow_skip_steps(true)
            .step(StepBuilder::new("q1", "First").field(FieldSchema::text("a", "A").required()))
            .unwrap()
            .steps(vec![StepConfig::new("q2", "Second"), StepConfig::new("q3", "Third")])
            .on_complete(|_| Ok(SubmitResult::accepted()))
            .build()
            .unwrap();

        assert_eq!(form.id(), "survey");
        assert_eq!(form.description(), Some("Quick questions"));
        assert_eq!(form.navigation().total_steps(), 3);
        assert!(!form.navigation().options().allow_back_navigation);
        assert!(form.navigation().options().allow_skip_steps);
    }

    #[test]
    fn hand_written_config_gets_the_same_checks() {
        let empty = FormConfig::new("survey", "Survey", Vec::new());
        assert!(matches!(
            MultiStepForm::try_from(empty),
            Err(BuildError::NoSteps)
        ));

        let duplicate = FormConfig::new(
            "survey",
            "Survey",
            vec![StepConfig::new("q1", "First"), StepConfig::new("q1", "Again")],
        );
        assert_eq!(
            MultiStepForm::try_from(duplicate).unwrap_err(),
            BuildError::DuplicateStepId("q1".to_string())
        );

        let form = MultiStepForm::try_from(FormConfig::new(
            "survey",
            "Survey",
            vec![StepConfig::new("q1", "First")],
        ))
        .unwrap();
        let state = form.create_initial_state(1, 1);
        assert!(state.current_step_index < state.steps.len());
    }

    #[test]
    fn step_builder_errors_propagate() {
        let result = FormBuilder::new("survey", "Survey").step(StepBuilder::new("", "Blank"));

        assert!(matches!(result, Err(BuildError::EmptyStepId)));
    }
}
