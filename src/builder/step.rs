//! Builder for constructing step configurations.

use crate::builder::error::BuildError;
use crate::core::{Condition, FormData};
use crate::field::Field;
use crate::hooks::{HookError, StepContext};
use crate::step::{StepConfig, ValidationResult};
use std::sync::Arc;

/// Builder for constructing steps with a fluent API.
pub struct StepBuilder {
    config: StepConfig,
}

impl StepBuilder {
    /// Create a builder for a step with the given id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            config: StepConfig::new(id, title),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    /// Add a field.
    pub fn field<F>(mut self, field: F) -> Self
    where
        F: Field + 'static,
    {
        self.config.fields.push(Arc::new(field));
        self
    }

    /// Add an already shared field.
    pub fn shared_field(mut self, field: Arc<dyn Field>) -> Self {
        self.config.fields.push(field);
        self
    }

    /// Show the step only when the condition holds (optional).
    pub fn condition(mut self, condition: Condition) -> Self {
        self.config.condition = Some(condition);
        self
    }

    /// Show the step only when the closure returns `true` (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&FormData) -> bool + Send + Sync + 'static,
    {
        self.config.condition = Some(Condition::new(predicate));
        self
    }

    /// Let forward jumps pass over this step while it is invalid.
    pub fn skippable(mut self) -> Self {
        self.config.can_skip = true;
        self
    }

    /// Step-level check, run after every field passed.
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&FormData) -> ValidationResult + Send + Sync + 'static,
    {
        self.config.validator = Some(Arc::new(validator));
        self
    }

    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FormData, &StepContext<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.config.on_enter = Some(Arc::new(hook));
        self
    }

    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FormData, &StepContext<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.config.on_exit = Some(Arc::new(hook));
        self
    }

    /// Build the step configuration.
    pub fn build(self) -> Result<StepConfig, BuildError> {
        if self.config.id.trim().is_empty() {
            return Err(BuildError::EmptyStepId);
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSchema;
    use crate::step::StepDefinition;
    use serde_json::json;

    #[test]
    fn builder_rejects_empty_id() {
        let result = StepBuilder::new("  ", "Blank").build();

        assert_eq!(result.unwrap_err(), BuildError::EmptyStepId);
    }

    #[test]
    fn fluent_api_builds_step() {
        let config = StepBuilder::new("contact", "Contact")
            .description("How to reach you")
            .field(FieldSchema::text("email", "Email").required())
            .field(FieldSchema::text("phone", "Phone"))
            .when(|data| data.contains_key("wants_contact"))
            .skippable()
            .build()
            .unwrap();

        assert_eq!(config.id, "contact");
        assert_eq!(config.description.as_deref(), Some("How to reach you"));
        assert_eq!(config.fields.len(), 2);
        assert!(config.can_skip);

        let step = StepDefinition::new(config);
        assert!(!step.should_show(&FormData::new()));
        assert_eq!(step.summary(), "Contact (2 fields, 1 required)");
    }

    #[test]
    fn validator_runs_after_fields() {
        let config = StepBuilder::new("age", "Age")
            .field(FieldSchema::number("age", "Age").required())
            .validator(|data| match data.get("age").and_then(|v| v.as_i64()) {
                Some(age) if age >= 18 => ValidationResult::valid(),
                _ => ValidationResult::invalid("Must be an adult"),
            })
            .build()
            .unwrap();
        let step = StepDefinition::new(config);

        let mut data = FormData::new();
        assert_eq!(step.validate(&data).error.as_deref(), Some("Age is required"));

        data.insert("age".into(), json!(12));
        assert_eq!(step.validate(&data).error.as_deref(), Some("Must be an adult"));

        data.insert("age".into(), json!(30));
        assert!(step.validate(&data).is_valid);
    }
}
