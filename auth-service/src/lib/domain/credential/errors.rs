use auth::PasswordError;
use auth::PasswordStrengthError;
use thiserror::Error;

use crate::credential::models::AccountKind;

/// Error for Handle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("Handle must not be empty")]
    Empty,

    #[error("Handle too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Handle must not contain whitespace or control characters")]
    InvalidCharacters,
}

/// Error for parsing stored enum tags
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnknownVariant {
    #[error("Unknown account status: {0}")]
    Status(String),

    #[error("Unknown hash algorithm: {0}")]
    Algorithm(String),

    #[error("Unknown account kind: {0}")]
    Kind(String),
}

/// The only error type a credential store may return.
///
/// Backend-specific failures are collapsed into `Unavailable` at the store
/// boundary; the driver error is logged there and never carried further.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Handle already exists")]
    AlreadyExists,

    #[error("Account is locked")]
    AccountLocked,

    #[error("Session lifetime out of range")]
    TtlOutOfRange,

    #[error("Credential store unavailable during {operation}")]
    Unavailable { operation: &'static str },
}

/// Top-level error for all authentication operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors
    #[error("Invalid handle: {0}")]
    InvalidHandle(#[from] HandleError),

    #[error("Weak password: {0}")]
    WeakPassword(#[from] PasswordStrengthError),

    // Business outcomes
    #[error("Account not found")]
    NotFound,

    #[error("Handle already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is locked")]
    AccountLocked,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session expired")]
    Expired,

    #[error("Session belongs to a {actual} account, {required} required")]
    WrongAccountKind {
        required: AccountKind,
        actual: AccountKind,
    },

    #[error("Session lifetime out of range")]
    TtlOutOfRange,

    // Infrastructure errors
    #[error("Credential store unavailable during {operation}")]
    StoreUnavailable { operation: &'static str },

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Whether a caller may retry the same request after backing off.
    ///
    /// Only store unavailability qualifies; every other variant is a final
    /// answer for the given input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::StoreUnavailable { .. })
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AuthError::NotFound,
            StoreError::AlreadyExists => AuthError::AlreadyExists,
            StoreError::AccountLocked => AuthError::AccountLocked,
            StoreError::TtlOutOfRange => AuthError::TtlOutOfRange,
            StoreError::Unavailable { operation } => AuthError::StoreUnavailable { operation },
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Hashing(err.to_string())
    }
}
