//! Database-specific error types and conversions.

use ridehub_core::error::RidehubError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate record: {entity}")]
    Duplicate { entity: String },

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl From<DbError> for RidehubError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => RidehubError::NotFound { entity, id },
            DbError::Duplicate { entity } => RidehubError::Conflict { entity },
            other => RidehubError::Database(other.to_string()),
        }
    }
}
