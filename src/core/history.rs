//! Navigation history tracking.
//!
//! Every successful move between steps is recorded as an immutable
//! transition, following the same record-returns-new-value style as the
//! rest of the state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Direction of a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationDirection {
    /// Move to the next visible step.
    Next,
    /// Move to the nearest visible step before the current one.
    Previous,
    /// Move to an explicit step.
    Jump,
}

impl fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Jump => "jump",
        };
        f.write_str(name)
    }
}

/// Record of a single move between steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepTransition {
    /// Index of the step being left
    pub from: usize,
    /// Index of the step being entered
    pub to: usize,
    /// How the move was requested
    pub direction: NavigationDirection,
    /// When the move happened
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of step transitions.
///
/// History is immutable: [`record`](Self::record) returns a new history.
///
/// # Example
///
/// ```rust
/// use stepwise::core::{NavigationDirection, NavigationHistory, StepTransition};
/// use chrono::Utc;
///
/// let history = NavigationHistory::new();
/// let history = history.record(StepTransition {
///     from: 0,
///     to: 2,
///     direction: NavigationDirection::Next,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.path(), vec![0, 2]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationHistory {
    transitions: Vec<StepTransition>,
}

impl NavigationHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StepTransition) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Step indices visited in order: the first origin, then every target.
    pub fn path(&self) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the first and the last recorded transition.
    ///
    /// Returns `None` when nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Number of times a step was entered through navigation.
    pub fn entries_into(&self, step_index: usize) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.to == step_index)
            .count()
    }

    /// All recorded transitions, oldest first.
    pub fn transitions(&self) -> &[StepTransition] {
        &self.transitions
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(from: usize, to: usize, direction: NavigationDirection) -> StepTransition {
        StepTransition {
            from,
            to,
            direction,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = NavigationHistory::new();
        assert!(history.is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = NavigationHistory::new();
        let new_history = history.record(transition(0, 1, NavigationDirection::Next));

        assert_eq!(history.transitions().len(), 0);
        assert_eq!(new_history.transitions().len(), 1);
    }

    #[test]
    fn path_follows_transitions() {
        let history = NavigationHistory::new()
            .record(transition(0, 1, NavigationDirection::Next))
            .record(transition(1, 3, NavigationDirection::Next))
            .record(transition(3, 1, NavigationDirection::Jump));

        assert_eq!(history.path(), vec![0, 1, 3, 1]);
        assert_eq!(history.entries_into(1), 2);
        assert_eq!(history.entries_into(0), 0);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let history = NavigationHistory::new()
            .record(StepTransition {
                from: 0,
                to: 1,
                direction: NavigationDirection::Next,
                timestamp: start,
            })
            .record(StepTransition {
                from: 1,
                to: 2,
                direction: NavigationDirection::Next,
                timestamp: start + chrono::Duration::seconds(5),
            });

        assert_eq!(history.duration(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn direction_serializes_lowercase() {
        let json = serde_json::to_string(&NavigationDirection::Previous).unwrap();
        assert_eq!(json, "\"previous\"");
        assert_eq!(NavigationDirection::Jump.to_string(), "jump");
    }
}
