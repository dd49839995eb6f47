//! Completion history records

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::timer::{Timer, TimerId};

/// Format used for `completedAt`
pub const COMPLETED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Immutable record of a completed timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: TimerId,
    pub name: String,
    /// Human-readable local time of completion
    pub completed_at: String,
}

impl HistoryEntry {
    /// Record `timer` as completed now
    pub fn completed(timer: &Timer) -> Self {
        Self::completed_at(timer, Local::now())
    }

    pub fn completed_at<Tz: TimeZone>(timer: &Timer, at: DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            id: timer.id,
            name: timer.name.clone(),
            completed_at: at.format(COMPLETED_AT_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::state::timer::ValidatedTimer;

    #[test]
    fn copies_identity_and_formats_time() {
        let timer = Timer::new(
            42,
            ValidatedTimer {
                name: "Tea".into(),
                category: "Kitchen".into(),
                duration: 3,
            },
        );
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let entry = HistoryEntry::completed_at(&timer, at);

        assert_eq!(entry.id, 42);
        assert_eq!(entry.name, "Tea");
        assert_eq!(entry.completed_at, "2024-03-09 14:05:07");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["completedAt"], "2024-03-09 14:05:07");
    }
}
