//! Error types for the document pool
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

use crate::loader::LoaderError;
use crate::reference::ReferenceError;
use thiserror::Error;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors raised while resolving a reference through the pool
#[derive(Error, Debug)]
pub enum PoolError {
    /// The pool only resolves absolute, hierarchical references
    #[error("Reference '{reference}' is not canonical; resolve it against a base first")]
    NotCanonical { reference: String },

    /// The fragment was not a usable JSON pointer or did not match the document
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The loader could not produce the document
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// A standalone document was already supplied to this pool
    #[error("A standalone document is already set for this pool")]
    StandaloneAlreadySet,
}

impl PoolError {
    /// Create a not-canonical error
    pub fn not_canonical(reference: impl Into<String>) -> Self {
        Self::NotCanonical {
            reference: reference.into(),
        }
    }

    /// Whether the underlying cause is a missing document
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Loader(error) if error.is_not_found())
    }
}
