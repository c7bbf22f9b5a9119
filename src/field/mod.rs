//! Field collaborators.
//!
//! Steps delegate per-field validation to [`Field`] implementations. The
//! engine only needs a name, a label and a validation verdict; rendering and
//! input parsing stay with the caller.
//!
//! [`FieldSchema`] is a small reference implementation covering required
//! values, text length, numeric ranges and option lists.

use crate::core::{is_empty_value, FormData};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A single field failure, tied to the field that produced it.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Per-field validation used inside a step.
pub trait Field: Send + Sync {
    /// Key of the field inside the step data.
    fn name(&self) -> &str;

    /// Human readable label, used in default error messages.
    fn label(&self) -> &str;

    fn is_required(&self) -> bool {
        false
    }

    /// Validate the field's value. `None` means the key is absent.
    fn validate(&self, value: Option<&Value>) -> Result<(), String>;

    /// Validate this field against a whole step's data.
    fn check(&self, data: &FormData) -> Result<(), FieldError> {
        self.validate(data.get(self.name()))
            .map_err(|message| FieldError {
                field: self.name().to_string(),
                message,
            })
    }
}

/// Kind of value a [`FieldSchema`] expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Select,
    MultiSelect,
}

type FieldCheck = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Declarative field description with built-in checks.
///
/// # Example
///
/// ```rust
/// use stepwise::field::{Field, FieldSchema};
/// use serde_json::json;
///
/// let age = FieldSchema::number("age", "Age").required().range(0.0, 120.0);
///
/// assert!(age.validate(Some(&json!(34))).is_ok());
/// assert_eq!(age.validate(None).unwrap_err(), "Age is required");
/// assert_eq!(age.validate(Some(&json!(200))).unwrap_err(), "Must be at most 120");
/// ```
#[derive(Clone)]
pub struct FieldSchema {
    name: String,
    label: String,
    kind: FieldKind,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min: Option<f64>,
    max: Option<f64>,
    options: Vec<String>,
    validator: Option<FieldCheck>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            min_length: None,
            max_length: None,
            min: None,
            max: None,
            options: Vec::new(),
            validator: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Boolean)
    }

    pub fn select<I, S>(name: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, label, FieldKind::Select).options(options)
    }

    pub fn multi_select<I, S>(name: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, label, FieldKind::MultiSelect).options(options)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the built-in kind checks with a custom check.
    ///
    /// The required check still runs first.
    pub fn validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(check));
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    fn check_kind(&self, value: &Value) -> Result<(), String> {
        match self.kind {
            FieldKind::Text => {
                let length = match value {
                    Value::String(s) => s.chars().count(),
                    other => other.to_string().chars().count(),
                };
                if let Some(min) = self.min_length.filter(|min| length < *min) {
                    return Err(format!("Must be at least {min} characters"));
                }
                if let Some(max) = self.max_length.filter(|max| length > *max) {
                    return Err(format!("Must be at most {max} characters"));
                }
                Ok(())
            }
            FieldKind::Number => {
                let number = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .ok_or_else(|| "Must be a valid number".to_string())?;
                if let Some(min) = self.min.filter(|min| number < *min) {
                    return Err(format!("Must be at least {min}"));
                }
                if let Some(max) = self.max.filter(|max| number > *max) {
                    return Err(format!("Must be at most {max}"));
                }
                Ok(())
            }
            FieldKind::Boolean => match value {
                Value::Bool(_) => Ok(()),
                _ => Err("Must be yes or no".to_string()),
            },
            FieldKind::Select => {
                let known = value
                    .as_str()
                    .is_some_and(|choice| self.options.iter().any(|o| o == choice));
                if self.options.is_empty() || known {
                    Ok(())
                } else {
                    Err("Invalid selection".to_string())
                }
            }
            FieldKind::MultiSelect => {
                let items = value
                    .as_array()
                    .ok_or_else(|| "Must be a list".to_string())?;
                let all_known = items.iter().all(|item| {
                    item.as_str()
                        .is_some_and(|choice| self.options.iter().any(|o| o == choice))
                });
                if self.options.is_empty() || all_known {
                    Ok(())
                } else {
                    Err("Invalid selection".to_string())
                }
            }
        }
    }
}

impl Field for FieldSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn validate(&self, value: Option<&Value>) -> Result<(), String> {
        if is_empty_value(value) {
            return if self.required {
                Err(format!("{} is required", self.label))
            } else {
                Ok(())
            };
        }
        let Some(value) = value else {
            return Ok(());
        };

        match &self.validator {
            Some(check) => check(value),
            None => self.check_kind(value),
        }
    }
}

impl fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}
