//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{GroupedTimers, HistoryEntry, Timer, TimerStatus};

/// A timer together with the values the view derives from it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    pub status: TimerStatus,
    pub status_text: String,
    pub progress: f64,
}

impl From<&Timer> for TimerView {
    fn from(timer: &Timer) -> Self {
        let status = timer.status();
        Self {
            timer: timer.clone(),
            status,
            status_text: status.to_string(),
            progress: timer.progress(),
        }
    }
}

fn views(timers: &[Timer]) -> Vec<TimerView> {
    timers.iter().map(TimerView::from).collect()
}

/// Response for single-timer actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: Option<TimerView>,
}

impl ApiResponse {
    pub fn new(status: &str, message: String, timer: Option<&Timer>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer: timer.map(TimerView::from),
        }
    }

    pub fn ok(message: String, timer: &Timer) -> Self {
        Self::new("ok", message, Some(timer))
    }

    /// The targeted timer does not exist; nothing changed
    pub fn noop(message: String) -> Self {
        Self::new("noop", message, None)
    }
}

/// Full active collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersResponse {
    pub timestamp: DateTime<Utc>,
    pub timers: Vec<TimerView>,
}

impl TimersResponse {
    pub fn new(timers: &[Timer]) -> Self {
        Self {
            timestamp: Utc::now(),
            timers: views(timers),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupView {
    pub category: String,
    pub timers: Vec<TimerView>,
}

/// Category groups in first-appearance order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedResponse {
    pub groups: Vec<GroupView>,
}

impl From<&GroupedTimers> for GroupedResponse {
    fn from(grouped: &GroupedTimers) -> Self {
        Self {
            groups: grouped
                .groups()
                .iter()
                .map(|group| GroupView {
                    category: group.category.clone(),
                    timers: views(&group.timers),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
}

/// Server status with timer counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer_count: usize,
    pub running_count: usize,
    pub paused_count: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
