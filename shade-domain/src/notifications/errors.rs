use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid notification setting '{field}': {reason}")]
    InvalidSettings { field: String, reason: String },

    #[error("Failed to write notification dump: {0}")]
    Dump(#[from] fmt::Error),
}

impl NotificationError {
    pub fn invalid_settings(field: impl Into<String>, reason: impl Into<String>) -> Self {
        NotificationError::InvalidSettings {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
