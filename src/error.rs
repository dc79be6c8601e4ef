//! Application-level error type

use thiserror::Error;

use crate::{engine::ConfigError, state::store::StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid settings: {0}")]
    Validation(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to lock {0}")]
    Lock(String),
}

impl AppError {
    /// Whether the caller sent something we refused, as opposed to an internal failure
    pub fn is_rejection(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}
