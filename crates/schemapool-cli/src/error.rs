//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use schemapool_core::{CompileErrors, LoaderError, PoolError, ReferenceError};
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The schema failed to compile
    #[error("{0}")]
    Compile(#[from] CompileErrors),

    /// A reference could not be resolved
    #[error("Resolution error: {0}")]
    Pool(#[from] PoolError),

    /// A document could not be loaded
    #[error("Load error: {0}")]
    Loader(#[from] LoaderError),

    /// A reference argument could not be parsed
    #[error("Invalid reference: {0}")]
    Reference(#[from] ReferenceError),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Compile(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::Pool(_) => 4,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::Loader(_) => 7,
            Self::Reference(_) => 8,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_) | Self::Reference(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    use colored::Colorize;

    if let Error::Compile(errors) = error {
        let header = format!("Schema compilation failed with {} error(s):", errors.len());
        let mut lines = vec![if use_color {
            format!("{} {}", "Error:".red().bold(), header)
        } else {
            format!("Error: {}", header)
        }];
        for compile_error in errors {
            let location = if use_color {
                compile_error.location().bold().to_string()
            } else {
                compile_error.location().to_string()
            };
            lines.push(format!("  - [{}] {}", location, compile_error));
        }
        return lines.join("\n");
    }

    if use_color {
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}
