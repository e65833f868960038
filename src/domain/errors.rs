use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Document store error: {0}")]
    Store(String),

    #[error("Deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),
}

/// Coarse classification handed to the routing layer, which owns the final
/// status-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Internal,
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) | Self::Store(_) | Self::DeadlineExceeded(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
