//! Error module for the shade domain layer.

use thiserror::Error;

use shade_core::CoreError;

use crate::notifications::NotificationError;

/// A general Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// The primary error type for the domain layer.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Notification(#[from] NotificationError),
}
