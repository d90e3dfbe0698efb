//! # Error Handling
//!
//! Centralized error handling for `bowl-builder`, built on `thiserror`.
//!
//! Two kinds of failure exist at the storage boundary and they are kept
//! deliberately distinct:
//!
//! - **Validation failures** (`Error::Vocabulary`): the store accepted the
//!   request but rejected its content, returning structured per-field
//!   errors. These abort the taxonomy cascade before any dependent write
//!   and are surfaced to the caller.
//! - **Transport failures** (`Error::Store`): the store operation itself
//!   could not be performed (unreadable state file, missing record type).
//!
//! Malformed persisted JSON is *not* an error anywhere in this crate: the
//! codec decodes it to an empty default and logs a warning. See
//! [`crate::codec`] for that contract.

use thiserror::Error;

/// A structured field-level error returned by the persistence platform.
///
/// Mirrors the `{field, message}` pairs the platform reports when a write
/// is rejected by validation rather than by transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    /// The field the error applies to, when the platform attributes one.
    pub field: Option<String>,
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Main error type for bowl-builder operations
#[derive(Error, Debug)]
pub enum Error {
    /// The store rejected a vocabulary update with field-level errors.
    ///
    /// Raised by step 1 of the taxonomy cascade; nothing has been committed
    /// when this is returned.
    #[error("Vocabulary update rejected: {}", format_user_errors(errors))]
    Vocabulary { errors: Vec<UserError> },

    /// A store operation failed at the transport level.
    #[error("Store operation failed: {operation} - {message}")]
    Store { operation: String, message: String },

    /// A record referenced by id does not exist in its collection.
    #[error("Record not found: {record_type}/{id}")]
    RecordNotFound { record_type: String, id: String },

    /// A value could not be encoded for persistence.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_user_errors(errors: &[UserError]) -> String {
    if errors.is_empty() {
        return "unspecified validation error".to_string();
    }
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
