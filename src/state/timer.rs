//! Timer entity, creation rules and status derivation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Timer identity, the creation time in milliseconds since the epoch
pub type TimerId = u64;

/// A named countdown. Serialized in the same camelCase shape the store blobs use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: TimerId,
    pub name: String,
    /// Grouping key; original casing is kept, grouping lowercases it
    pub category: String,
    /// Total seconds
    pub duration: u64,
    pub remaining_time: u64,
    pub is_running: bool,
    pub is_paused: bool,
}

/// Result of applying one tick to a running timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Counting(u64),
    Completed,
}

impl Timer {
    /// Build a fresh, not-yet-started timer from validated input
    pub fn new(id: TimerId, input: ValidatedTimer) -> Self {
        Self {
            id,
            name: input.name,
            category: input.category,
            duration: input.duration,
            remaining_time: input.duration,
            is_running: false,
            is_paused: false,
        }
    }

    pub fn status(&self) -> TimerStatus {
        if self.remaining_time == self.duration && !self.is_running && !self.is_paused {
            TimerStatus::NotStarted
        } else if self.remaining_time == 0 {
            TimerStatus::Completed
        } else if self.is_running {
            TimerStatus::Running
        } else if self.is_paused {
            TimerStatus::Paused
        } else {
            TimerStatus::Idle
        }
    }

    /// Fraction of the duration still remaining, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        (self.remaining_time as f64 / self.duration as f64).clamp(0.0, 1.0)
    }

    pub fn mark_running(&mut self) {
        self.is_running = true;
        self.is_paused = false;
    }

    pub fn mark_paused(&mut self) {
        self.is_running = false;
        self.is_paused = true;
    }

    pub fn reset(&mut self) {
        self.remaining_time = self.duration;
        self.is_running = false;
        self.is_paused = false;
    }

    /// Count down one second. The tick that would reach zero completes the timer instead.
    pub fn tick(&mut self) -> TickOutcome {
        if self.remaining_time <= 1 {
            self.remaining_time = 0;
            self.is_running = false;
            self.is_paused = false;
            TickOutcome::Completed
        } else {
            self.remaining_time -= 1;
            TickOutcome::Counting(self.remaining_time)
        }
    }
}

/// Status text shown next to each timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    NotStarted,
    Completed,
    Running,
    Paused,
    /// Fallback; the engine never produces it
    Idle,
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerStatus::NotStarted => write!(f, "Not Started Yet"),
            TimerStatus::Completed => write!(f, "Completed"),
            TimerStatus::Running => write!(f, "Running"),
            TimerStatus::Paused => write!(f, "Paused"),
            TimerStatus::Idle => write!(f, "Idle"),
        }
    }
}

/// Raw add-timer form input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTimer {
    pub name: String,
    pub category: String,
    /// Seconds, as typed
    pub duration: String,
}

/// Creation input that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTimer {
    pub name: String,
    pub category: String,
    pub duration: u64,
}

impl NewTimer {
    pub fn new(name: impl Into<String>, category: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            duration: duration.into(),
        }
    }

    pub fn validate(&self) -> Result<ValidatedTimer, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let raw = self.duration.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingDuration);
        }
        let duration = raw
            .parse::<i64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| ValidationError::InvalidDuration(raw.to_string()))?;

        Ok(ValidatedTimer {
            name: name.to_string(),
            category: category.to_string(),
            duration: duration as u64,
        })
    }
}
