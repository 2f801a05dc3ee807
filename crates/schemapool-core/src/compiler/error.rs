//! Compilation error types
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

use crate::loader::LoaderError;
use crate::pool::PoolError;
use std::fmt;
use thiserror::Error;

/// A single compilation failure
#[derive(Error, Debug)]
pub enum CompileError {
    /// The root document could not be loaded
    #[error("Failed to load root schema: {source}")]
    RootLoad { source: LoaderError },

    /// The root locator is neither a canonical reference nor a usable path
    #[error("Invalid root locator '{locator}': {reason}")]
    RootLocator { locator: String, reason: String },

    /// The root reference did not resolve
    #[error("Failed to resolve root schema '{reference}': {source}")]
    Root { reference: String, source: PoolError },

    /// A `$ref` reached from the root did not resolve
    #[error("Failed to resolve '{reference}' (referenced from '{referrer}'): {source}")]
    Unresolved {
        reference: String,
        referrer: String,
        source: PoolError,
    },

    /// A reached document fails its meta-schema
    #[error("Schema '{location}' is invalid: {message}")]
    InvalidSchema { location: String, message: String },
}

impl CompileError {
    /// Create an unresolved reference error
    pub fn unresolved(reference: impl Into<String>, referrer: impl Into<String>, source: PoolError) -> Self {
        Self::Unresolved {
            reference: reference.into(),
            referrer: referrer.into(),
            source,
        }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            location: location.into(),
            message: message.into(),
        }
    }

    /// The reference or location the error is about
    pub fn location(&self) -> &str {
        match self {
            Self::RootLoad { source } => source.locator(),
            Self::RootLocator { locator, .. } => locator,
            Self::Root { reference, .. } => reference,
            Self::Unresolved { reference, .. } => reference,
            Self::InvalidSchema { location, .. } => location,
        }
    }
}

/// Result type for compilation
pub type CompileResult<T> = Result<T, CompileErrors>;

/// Every failure collected during one compilation
#[derive(Debug, Error)]
pub struct CompileErrors {
    /// Individual failures in the order they were found
    pub errors: Vec<CompileError>,
}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [single] => write!(f, "{}", single),
            errors => {
                write!(f, "Schema compilation failed with {} errors:", errors.len())?;
                for (i, error) in errors.iter().enumerate() {
                    write!(f, "\n{}. {}", i + 1, error)?;
                }
                Ok(())
            }
        }
    }
}

impl CompileErrors {
    /// Create an empty collection
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection
    pub fn add(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompileError> {
        self.errors.iter()
    }

    /// Ok if no errors were collected
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for CompileErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CompileError> for CompileErrors {
    fn from(error: CompileError) -> Self {
        Self { errors: vec![error] }
    }
}

impl From<Vec<CompileError>> for CompileErrors {
    fn from(errors: Vec<CompileError>) -> Self {
        Self { errors }
    }
}

impl<'a> IntoIterator for &'a CompileErrors {
    type Item = &'a CompileError;
    type IntoIter = std::slice::Iter<'a, CompileError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
