use thiserror::Error;

/// Failures surfaced by domain services.
///
/// `Validation` is raised before any remote call is made and its message is
/// shown to the user as is. `Remote` wraps any store or identity-provider
/// failure behind a generic user-facing message; the cause is only logged.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Remote { message: String, cause: anyhow::Error },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn remote(message: impl Into<String>, cause: anyhow::Error) -> Self {
        DomainError::Remote {
            message: message.into(),
            cause,
        }
    }
}
