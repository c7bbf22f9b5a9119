//! Checkpoint and resume for form sessions.
//!
//! A [`FormState`] is plain data, so a session can be written out as JSON and
//! picked up again after a restart. Hooks and field validators live on the
//! form definition and are not part of a checkpoint.

use crate::core::FormState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of one form session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub state: FormState,
}

impl Checkpoint {
    /// Snapshot a session state.
    pub fn new(state: &FormState) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Load a checkpoint, rejecting formats newer than this build understands.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    /// Consume the checkpoint and return the session state.
    pub fn into_state(self) -> FormState {
        self.state
    }

    fn validate(&self) -> Result<(), CheckpointError> {
        if self.version > CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        if self.state.current_step_index >= self.state.steps.len() {
            return Err(CheckpointError::ValidationFailed(format!(
                "current step {} outside {} steps",
                self.state.current_step_index,
                self.state.steps.len()
            )));
        }
        Ok(())
    }
}
