//! State management module
//!
//! The shared application state, its critical section and the persistence
//! seam behind it.

pub mod app_state;
pub mod store;

// Re-export main types
pub use app_state::{AppState, TickReport};
pub use store::{JsonFileStore, MemoryStore, StateStore, StoreError};
