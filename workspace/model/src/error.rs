use common::FieldErrors;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::warn;
use validator::ValidationErrors;

/// Error types for the persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// One or more fields are missing or malformed
    #[error("Validation failed for: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    Validation(FieldErrors),

    /// The referenced record does not exist
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// A uniqueness or referential constraint was violated
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    /// Validation error for a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        StoreError::Validation(errors)
    }

    /// Converts unique constraint violations into `Integrity`, keeping every
    /// other database error as is.
    pub fn from_write(err: DbErr, conflict: impl FnOnce() -> String) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                let message = conflict();
                warn!(%detail, "Unique constraint violated: {}", message);
                StoreError::Integrity(message)
            }
            _ => StoreError::Database(err),
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(common::field_errors(&errors))
    }
}

/// Type alias for Result with StoreError
pub type Result<T> = std::result::Result<T, StoreError>;
