//! Timer Keeper - categorized countdown timers with a completion history
//!
//! The library runs any number of independent countdowns against a single
//! coordinator that owns the active timer collection, mirrors every change to
//! a key-value store, and records finished timers in a history collection.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{Action, TimerEngine};
pub use error::{EngineError, StoreError, ValidationError};
pub use services::{FileStore, MemoryStore, Store};
pub use state::{AppState, GroupedTimers, HistoryEntry, NewTimer, Timer, TimerId, TimerStatus};
pub use utils::signals::shutdown_signal;
