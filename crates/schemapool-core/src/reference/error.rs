//! Error types for reference and pointer handling
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Result type for reference operations
pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Errors raised while parsing, joining or dereferencing references
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The reference text is not a valid URI reference
    #[error("Malformed reference '{reference}': {reason}")]
    Malformed { reference: String, reason: String },

    /// The fragment looks like a JSON pointer but does not follow RFC 6901
    #[error("Invalid JSON pointer '{pointer}': {reason}")]
    InvalidPointer { pointer: String, reason: String },

    /// The pointer is well formed but the target document has no such path
    #[error("JSON pointer '{pointer}' could not be resolved: {reason}")]
    PointerNotFound { pointer: String, reason: String },

    /// The fragment is a plain-name anchor, not a pointer
    #[error("Fragment '#{fragment}' is an anchor, not a JSON pointer")]
    NotAPointer { fragment: String },
}

impl ReferenceError {
    /// Create a malformed reference error
    pub fn malformed(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid pointer error
    pub fn invalid_pointer(pointer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPointer {
            pointer: pointer.into(),
            reason: reason.into(),
        }
    }

    /// Create a pointer-not-found error
    pub fn pointer_not_found(pointer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PointerNotFound {
            pointer: pointer.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-a-pointer error for an anchor fragment
    pub fn not_a_pointer(fragment: impl Into<String>) -> Self {
        Self::NotAPointer {
            fragment: fragment.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ReferenceError::malformed("http://[::1", "invalid IPv6 address");
        assert_eq!(
            err.to_string(),
            "Malformed reference 'http://[::1': invalid IPv6 address"
        );

        let err = ReferenceError::not_a_pointer("foo");
        assert_eq!(err.to_string(), "Fragment '#foo' is an anchor, not a JSON pointer");
    }
}
