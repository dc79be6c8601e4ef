//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod event_dispatch;
pub mod focus_guard;
pub mod reconcile_loop;

// Re-export main functions
pub use event_dispatch::event_dispatch_task;
pub use focus_guard::focus_guard_task;
pub use reconcile_loop::reconcile_task;
