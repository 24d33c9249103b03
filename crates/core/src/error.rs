// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Delivery error: {0}")]
    Delivery(#[from] crate::port::DeliveryError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] crate::domain::ScheduleError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the error is the routine "nothing to pop" condition
    pub fn is_empty_queue(&self) -> bool {
        matches!(
            self,
            AppError::Domain(crate::domain::DomainError::EmptyQueue)
        )
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
