//! Service layer: account management and the folder/document hierarchy.
//!
//! Both services share one SQLite pool and one error taxonomy. Every
//! operation that reveals or mutates an entity verifies ownership first;
//! a missing row and a row owned by someone else produce the same
//! `NotFound` outcome so callers cannot probe for other users' data.

use thiserror::Error;

pub mod account_service;
pub mod directory_service;

/// Typed outcome of a failed service operation.
///
/// Each variant carries a stable discriminant (`code`) so the HTTP layer
/// can expose it without leaning on transport-specific values.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A field failed one of the validation predicates.
    #[error("invalid {0}")]
    Validation(&'static str),

    /// A uniqueness invariant was violated on insert.
    #[error("{entity} {field} already in use")]
    Conflict {
        entity: &'static str,
        field: &'static str,
    },

    /// Entity missing, or present but not owned by the requester.
    /// The two cases are deliberately indistinguishable.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Bad credentials. Generic regardless of which part was wrong.
    #[error("invalid credentials")]
    AuthenticationFailed,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Hash(#[from] bcrypt::BcryptError),
}

impl ServiceError {
    /// Stable machine-readable discriminant for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::Conflict { .. } => "conflict",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::AuthenticationFailed => "auth_failed",
            ServiceError::Sqlx(_) | ServiceError::Hash(_) => "storage",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Return true if a SQLx error indicates a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}
