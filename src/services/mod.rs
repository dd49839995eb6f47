//! External collaborators
//!
//! This module contains the persistent store the engine writes its
//! collections to.

pub mod store;

// Re-export main types
pub use store::{FileStore, MemoryStore, Store, HISTORY_KEY, TIMERS_KEY};
