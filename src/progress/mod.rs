//! Progress and timing statistics for a session.
//!
//! The tracker counts only the steps that are visible for the current data,
//! using the same query as [`StepNavigation::is_form_complete`], so progress
//! and completion always agree on which steps are required.

use crate::core::FormState;
use crate::navigation::StepNavigation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot of how far a session has progressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressInfo {
    /// 1-based position of the current step among the visible steps
    pub current_step: usize,
    pub total_steps: usize,
    pub completed_steps: usize,
    /// Rounded to the nearest whole percent
    pub percentage: u32,
    pub remaining_steps: usize,
}

/// Elapsed-time statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeStats {
    /// Since the session started
    pub total: Duration,
    /// Mean visit-to-completion time over completed steps
    pub average_per_step: Duration,
    /// Since the current step was visited
    pub current_step: Duration,
}

/// Visit counts across every configured step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitSummary {
    pub visited: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Derives progress figures from navigation rules and state.
#[derive(Clone, Copy, Debug)]
pub struct ProgressTracker<'a> {
    navigation: &'a StepNavigation,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(navigation: &'a StepNavigation) -> Self {
        Self { navigation }
    }

    pub fn progress(&self, state: &FormState) -> ProgressInfo {
        let visible = self.navigation.visible_indices(&state.all_data);
        let total_steps = visible.len();
        let completed_steps = visible
            .iter()
            .filter(|&&index| state.steps.get(index).is_some_and(|s| s.is_complete))
            .count();

        // a hidden current step reports the nearest visible step before it
        let current_step = visible
            .iter()
            .filter(|&&index| index <= state.current_step_index)
            .count()
            .max(1)
            .min(total_steps);

        let percentage = if total_steps == 0 {
            0
        } else {
            ((completed_steps as f64 / total_steps as f64) * 100.0).round() as u32
        };

        ProgressInfo {
            current_step,
            total_steps,
            completed_steps,
            percentage,
            remaining_steps: total_steps - completed_steps,
        }
    }

    /// Text bar such as `"█████░░░░░ 50%"`.
    pub fn progress_bar(&self, state: &FormState, width: usize) -> String {
        let percentage = self.progress(state).percentage;
        let filled = ((percentage as f64 / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);

        format!(
            "{}{} {}%",
            "█".repeat(filled),
            "░".repeat(width - filled),
            percentage
        )
    }

    /// Position line such as `"Step 2 of 5"`.
    pub fn progress_text(&self, state: &FormState) -> String {
        let progress = self.progress(state);
        format!("Step {} of {}", progress.current_step, progress.total_steps)
    }

    /// Completion counts followed by a ten-cell progress bar.
    pub fn progress_message(&self, state: &FormState) -> String {
        let progress = self.progress(state);
        format!(
            "Progress: {}/{} steps completed ({}%)\n{}",
            progress.completed_steps,
            progress.total_steps,
            progress.percentage,
            self.progress_bar(state, 10)
        )
    }

    /// `"Estimated time to complete: 2m 5s"`, or `None` without an estimate.
    pub fn estimate_message(&self, state: &FormState) -> Option<String> {
        self.estimated_remaining(state)
            .map(|remaining| format!("Estimated time to complete: {}", format_duration(remaining)))
    }

    pub fn is_first_step(&self, state: &FormState) -> bool {
        self.navigation
            .visible_indices(&state.all_data)
            .first()
            .is_none_or(|&first| first == state.current_step_index)
    }

    pub fn is_last_step(&self, state: &FormState) -> bool {
        self.navigation
            .visible_indices(&state.all_data)
            .last()
            .is_none_or(|&last| last == state.current_step_index)
    }

    pub fn time_stats(&self, state: &FormState) -> TimeStats {
        self.time_stats_at(state, Utc::now())
    }

    /// Time statistics relative to an explicit instant.
    pub fn time_stats_at(&self, state: &FormState, now: DateTime<Utc>) -> TimeStats {
        let durations: Vec<Duration> = state
            .steps
            .iter()
            .filter_map(|step| step.time_to_complete())
            .collect();

        let average_per_step = match u32::try_from(durations.len()) {
            Ok(count) if count > 0 => durations.iter().sum::<Duration>() / count,
            _ => Duration::ZERO,
        };

        let current_step = state
            .current_step_state()
            .and_then(|step| step.visited_at)
            .map(|visited| elapsed(visited, now))
            .unwrap_or(Duration::ZERO);

        TimeStats {
            total: elapsed(state.started_at, now),
            average_per_step,
            current_step,
        }
    }

    /// Expected time to finish: average step time × remaining steps.
    ///
    /// `None` when no step has been timed yet or nothing remains.
    pub fn estimated_remaining(&self, state: &FormState) -> Option<Duration> {
        let average = self.time_stats(state).average_per_step;
        let remaining = u32::try_from(self.progress(state).remaining_steps).ok()?;

        if average.is_zero() || remaining == 0 {
            return None;
        }
        Some(average * remaining)
    }

    pub fn visit_summary(&self, state: &FormState) -> VisitSummary {
        let visited = state.steps.iter().filter(|s| s.visited_at.is_some()).count();
        let completed = state.steps.iter().filter(|s| s.is_complete).count();

        VisitSummary {
            visited,
            completed,
            pending: state.steps.len() - completed,
        }
    }
}

fn elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    now.signed_duration_since(since)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Compact duration such as `"45s"`, `"2m 5s"` or `"3m"`.
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    if seconds < 60 {
        return format!("{seconds}s");
    }

    let (minutes, rest) = (seconds / 60, seconds % 60);
    if rest == 0 {
        format!("{minutes}m")
    } else {
        format!("{minutes}m {rest}s")
    }
}
