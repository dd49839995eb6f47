//! State management module
//!
//! This module contains the timer entity model, completion history records,
//! the category grouping view and the state shared with HTTP handlers.

pub mod app_state;
pub mod grouping;
pub mod history;
pub mod timer;

// Re-export main types
pub use app_state::AppState;
pub use grouping::{group_by_category, CategoryGroup, GroupedTimers};
pub use history::HistoryEntry;
pub use timer::{NewTimer, TickOutcome, Timer, TimerId, TimerStatus, ValidatedTimer};
