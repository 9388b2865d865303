use thiserror::Error;

use crate::validation::ValidationError;

/// Failures raised by the key-value and secret storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Outcome of a domain operation that did not go through.
///
/// These are returned as values so callers can present them without unwinding;
/// only `Storage` represents an infrastructure failure.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Product not found")]
    ProductNotFound(String),
    #[error("Insufficient stock")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Goal not found: {0}")]
    GoalNotFound(String),
    #[error("Recurring transaction not found: {0}")]
    RecurringNotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Persistence error: {0}")]
    Storage(#[from] StoreError),
}

pub type OperationResult<T> = std::result::Result<T, OperationError>;

/// Errors surfaced by the authentication gate.
///
/// A mismatching PIN is not an error; it is reported as `Ok(false)`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("PIN must be exactly 4 digits")]
    InvalidPinFormat,
    #[error("Biometrics not available")]
    BiometricsUnavailable,
    #[error("Secure storage failure: {0}")]
    SecretStore(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::SecretStore(err.to_string())
    }
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;
