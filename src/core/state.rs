//! Runtime state of a form session.
//!
//! State values are plain serializable data. Operations on them never mutate
//! in place; they return updated copies.

use super::data::FormData;
use super::history::NavigationHistory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-field (or `general`) error messages.
pub type ErrorMap = BTreeMap<String, String>;

/// Runtime state of one step within one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepState {
    pub step_id: String,
    pub step_index: usize,
    /// Values committed to this step
    pub data: FormData,
    pub is_valid: bool,
    /// Always implies `is_valid`
    pub is_complete: bool,
    pub visited_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorMap>,
}

impl StepState {
    /// Time spent between the visit marker and completion, if both are known.
    pub fn time_to_complete(&self) -> Option<std::time::Duration> {
        match (self.is_complete, self.visited_at, self.completed_at) {
            (true, Some(visited), Some(completed)) => {
                completed.signed_duration_since(visited).to_std().ok()
            }
            _ => None,
        }
    }
}

/// Full state of one form session.
///
/// `steps` runs parallel to the form's configured steps and `all_data` holds
/// the last-write-wins union of everything committed so far.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub form_id: String,
    pub user_id: i64,
    pub chat_id: i64,
    pub current_step_index: usize,
    pub steps: Vec<StepState>,
    pub all_data: FormData,
    pub is_complete: bool,
    pub started_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub history: NavigationHistory,
}

impl FormState {
    /// State of the step the session currently sits on.
    pub fn current_step_state(&self) -> Option<&StepState> {
        self.steps.get(self.current_step_index)
    }

    /// Return the terminal copy of this state.
    ///
    /// Completed states are rejected by every navigation request.
    pub fn mark_complete(&self) -> Self {
        let now = Utc::now();
        Self {
            is_complete: true,
            completed_at: Some(now),
            last_updated_at: now,
            ..self.clone()
        }
    }

    /// Compare two states, ignoring every timestamp.
    pub fn eq_ignoring_timestamps(&self, other: &Self) -> bool {
        self.form_id == other.form_id
            && self.user_id == other.user_id
            && self.chat_id == other.chat_id
            && self.current_step_index == other.current_step_index
            && self.all_data == other.all_data
            && self.is_complete == other.is_complete
            && self.history.path() == other.history.path()
            && self.steps.len() == other.steps.len()
            && self.steps.iter().zip(&other.steps).all(|(a, b)| {
                a.step_id == b.step_id
                    && a.step_index == b.step_index
                    && a.data == b.data
                    && a.is_valid == b.is_valid
                    && a.is_complete == b.is_complete
                    && a.errors == b.errors
            })
    }
}
