//! Domain error taxonomy.
//!
//! Every failing operation maps to exactly one of these variants so the REST
//! layer can translate them to status codes without inspecting messages.

/// Errors surfaced by the domain services. Mutating operations are
/// all-or-nothing: any error means no state change was persisted.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Bad input shape or a failed business-rule check
    #[error("{0}")]
    Validation(String),
    /// Unknown child or entry id
    #[error("{0}")]
    NotFound(String),
    /// Duplicate period for a child
    #[error("{0}")]
    Conflict(String),
    /// Underlying persistence failed; the in-memory view is not authoritative
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }
}
