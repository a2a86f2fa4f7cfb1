//! Record store error types.
//!
//! Reads never fail: absence is `None` or an empty `Vec`. Only writes that
//! violate a field constraint or reference a missing parent return an error.

use thiserror::Error;

/// Errors returned by [`crate::store::RecordStore`] mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A field failed validation before anything was written.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A referenced record does not exist (or belongs to another user).
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    /// The id counter for a collection has no values left.
    #[error("no more ids available for {0}")]
    IdSpaceExhausted(&'static str),
}

impl StoreError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        StoreError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Returns `true` if the caller supplied bad input.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation { .. })
    }

    /// Returns `true` if a referenced record was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = StoreError::validation("rating", "must be between 1 and 5");
        assert_eq!(e.to_string(), "invalid rating: must be between 1 and 5");
        assert!(e.is_validation());

        let e = StoreError::NotFound { kind: "test", id: 7 };
        assert_eq!(e.to_string(), "test 7 not found");
        assert!(e.is_not_found());
    }
}
