//! Error types for `gradebook-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

/// Unified error type for all core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested account kind is not one of the supported kinds.
    #[error("invalid user type: {0}")]
    InvalidAccountKind(String),

    /// A stored password hash could not be parsed or checked.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// The backing store failed (unreachable, query error, ...).
    #[error("store error: {0}")]
    Store(String),
}

/// Convenience alias used throughout `gradebook-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_account_kind_displays_value() {
        let err = CoreError::InvalidAccountKind("admin".to_string());
        assert_eq!(err.to_string(), "invalid user type: admin");
    }

    #[test]
    fn password_hash_displays_message() {
        let err = CoreError::PasswordHash("unrecognised format".to_string());
        assert_eq!(err.to_string(), "password hash error: unrecognised format");
    }

    #[test]
    fn store_displays_message() {
        let err = CoreError::Store("connection refused".to_string());
        assert_eq!(err.to_string(), "store error: connection refused");
    }

    #[test]
    fn error_is_debug() {
        let err = CoreError::Store("down".to_string());
        assert!(format!("{:?}", err).contains("Store"));
    }
}
