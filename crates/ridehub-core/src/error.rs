//! Error types for the RideHub system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RidehubError {
    /// No principal could be resolved for the request. Maps to 401 at
    /// the HTTP boundary, distinct from [`RidehubError::Forbidden`].
    #[error("authentication required")]
    Unauthenticated,

    /// The principal was resolved but lacks the role, permission, or
    /// ownership the operation requires. Maps to 403.
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// Resource or principal absent. Maps to 404. Must never be
    /// conflated with an authorization denial on an existing resource.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Duplicate join, grant, or similar uniqueness violation.
    #[error("{entity} already exists")]
    Conflict { entity: String },

    /// Unknown permission or role name. A programming defect, not a
    /// request-time failure; never surfaced to end users.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("database error: {0}")]
    Database(String),

    /// A scheduled or manually triggered job handler failed.
    #[error("job '{job}' failed: {cause}")]
    Job { job: String, cause: String },

    #[error("internal error: {0}")]
    Internal(String),
}

pub type RidehubResult<T> = Result<T, RidehubError>;
