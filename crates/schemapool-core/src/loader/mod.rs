//! Document loading
//!
//! This module provides the loader side of reference resolution:
//! - The [`JsonLoader`] trait and its file, string, buffer, value and HTTP sources
//! - The [`LoaderFactory`] trait that maps a locator string to a loader
//! - YAML and JSON parsing support
//!
//! # Example Usage
//!
//! ```rust
//! use schemapool_core::loader::{JsonLoader, StringLoader};
//!
//! let loader = StringLoader::new(r#"{"type": "string"}"#);
//! let document = loader.load_json()?;
//! assert_eq!(document["type"], "string");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod factory;
pub mod parser;
pub mod source;

pub use error::{LoaderError, LoaderResult};
pub use factory::{DefaultLoaderFactory, InMemoryLoaderFactory, LoaderFactory, LoaderPolicy};
pub use parser::{Format, SchemaParser};
#[cfg(feature = "http")]
pub use source::HttpLoader;
pub use source::{BufferLoader, FileLoader, JsonLoader, ReferenceLoader, StringLoader, ValueLoader};
