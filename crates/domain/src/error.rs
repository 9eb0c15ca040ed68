//! Domain errors
//!
//! Pure domain errors with no infrastructure dependencies

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing required property: {0}")]
    MissingProperty(String),

    #[error("Invalid property '{name}': {reason}")]
    InvalidProperty { name: String, reason: String },
}

impl DomainError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        DomainError::InvalidProperty {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
