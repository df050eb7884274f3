// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown check kind: {0}")]
    UnknownCheckKind(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
