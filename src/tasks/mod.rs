//! Background tasks module
//!
//! This module contains the per-timer countdown task that feeds ticks to the
//! engine coordinator.

pub mod countdown;

// Re-export main items
pub use countdown::{countdown_task, Tick, TICK_PERIOD};
