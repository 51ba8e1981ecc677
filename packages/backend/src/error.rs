//! Errors reported by the backend service.

use store::messages;
use thiserror::Error;

pub type Result<T, E = BackendError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Record not found")]
    NotFound,
    #[error("{}", messages::FORBIDDEN)]
    Forbidden,
    #[error("{}", messages::NOT_AUTHENTICATED)]
    NotAuthenticated,
    #[error("{}", messages::USERNAME_TAKEN)]
    UsernameTaken,
    #[error("{}", messages::EMAIL_TAKEN)]
    EmailTaken,
    #[error("{}", messages::INVALID_CREDENTIALS)]
    InvalidCredentials,
    #[error("{}", messages::WEAK_PASSWORD)]
    WeakPassword,
    #[error("{}", messages::INVALID_RESET_CODE)]
    InvalidResetCode,
    #[error("{}", messages::PROFILE_NOT_CREATED)]
    ProfileNotCreated(#[source] Box<BackendError>),
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Password hashing failed: {0}")]
    Password(String),
    #[error("Failed to send mail: {0}")]
    Mail(String),
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl BackendError {
    /// Whether a sqlx error is a unique-constraint violation.
    pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
        matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
    }
}
