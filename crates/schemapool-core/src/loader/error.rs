//! Error types for document loading operations
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Failures a loader can report while turning a locator into JSON
#[derive(Error, Debug)]
pub enum LoaderError {
    /// I/O errors while reading a file or stream
    #[error("Failed to read '{locator}': {source}")]
    Io {
        locator: String,
        source: std::io::Error,
    },

    /// YAML parsing errors
    #[error("Failed to parse YAML from '{locator}': {source}")]
    YamlParse {
        locator: String,
        source: serde_yaml::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON from '{locator}': {source}")]
    JsonParse {
        locator: String,
        source: serde_json::Error,
    },

    /// No loader is registered for the locator's scheme
    #[error("No loader available for scheme '{scheme}' in '{locator}'")]
    UnsupportedScheme { locator: String, scheme: String },

    /// The locator itself cannot be interpreted
    #[error("Invalid locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },

    /// The source does not hold a document for this locator
    #[error("Document not found: '{locator}'")]
    NotFound { locator: String },

    /// Network fetch failures
    #[error("Failed to fetch '{locator}': {reason}")]
    Http { locator: String, reason: String },
}

impl LoaderError {
    /// Create an I/O error with locator context
    pub fn io_error(locator: impl Into<String>, error: std::io::Error) -> Self {
        Self::Io {
            locator: locator.into(),
            source: error,
        }
    }

    /// Create a YAML parsing error with locator context
    pub fn yaml_parse_error(locator: impl Into<String>, error: serde_yaml::Error) -> Self {
        Self::YamlParse {
            locator: locator.into(),
            source: error,
        }
    }

    /// Create a JSON parsing error with locator context
    pub fn json_parse_error(locator: impl Into<String>, error: serde_json::Error) -> Self {
        Self::JsonParse {
            locator: locator.into(),
            source: error,
        }
    }

    /// Create an unsupported scheme error
    pub fn unsupported_scheme(locator: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self::UnsupportedScheme {
            locator: locator.into(),
            scheme: scheme.into(),
        }
    }

    /// Create an invalid locator error
    pub fn invalid_locator(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocator {
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(locator: impl Into<String>) -> Self {
        Self::NotFound {
            locator: locator.into(),
        }
    }

    /// Create a network error
    pub fn http_error(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Http {
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    /// The locator this error is about
    pub fn locator(&self) -> &str {
        match self {
            Self::Io { locator, .. }
            | Self::YamlParse { locator, .. }
            | Self::JsonParse { locator, .. }
            | Self::UnsupportedScheme { locator, .. }
            | Self::InvalidLocator { locator, .. }
            | Self::NotFound { locator }
            | Self::Http { locator, .. } => locator,
        }
    }

    /// Whether the document is absent, as opposed to present but unreadable
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
