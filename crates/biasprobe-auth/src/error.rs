//! Auth and storage error types.
//!
//! The `Display` text of an [`AuthError`] is what the user is shown when a
//! sign-in or registration fails.

use thiserror::Error;

/// Errors from a [`crate::kv::KeyValueStore`].
#[derive(Debug, Error)]
pub enum KvError {
    /// Keys must be non-empty and use only `[A-Za-z0-9_-]`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by [`crate::store::AuthStore`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("storage failure: {0}")]
    Storage(#[from] KvError),

    #[error("corrupt stored data under '{key}': {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl AuthError {
    /// Returns `true` for failures caused by what the user typed, as opposed
    /// to storage problems.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AuthError::Validation(_) | AuthError::UsernameTaken(_) | AuthError::InvalidCredentials
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_messages() {
        assert_eq!(
            AuthError::UsernameTaken("ada".into()).to_string(),
            "Username 'ada' is already taken"
        );
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
        assert!(AuthError::InvalidCredentials.is_user_facing());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        assert!(!AuthError::from(KvError::from(io)).is_user_facing());
    }
}
