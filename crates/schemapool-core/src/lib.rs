//! Schemapool Core - JSON Schema reference resolution
//!
//! This crate resolves `$id` and `$ref` across JSON Schema documents:
//! - **Reference**: RFC 3986 URI references and RFC 6901 JSON pointers
//! - **Loader**: file, string, reader, value and HTTP document sources
//! - **Pool**: a per-compilation cache keyed by canonical locator
//! - **Compiler**: drives the pool from a root schema and checks every
//!   reached document against its dialect's meta-schema
//!
//! ## Features
//!
//! - **Location-independent identifiers**: every `$id` in a document becomes
//!   a cache key, so `http://example.com/root.json#foo` finds the sub-schema
//!   that declared `"$id": "#foo"`
//! - **Canonical references**: every `$ref` is rewritten to an absolute URI
//!   while the document is walked
//! - **Cycle safety**: references stay strings and are followed lazily
//! - **Literal awareness**: `const`, `enum`, `default` and `examples` values
//!   and the names in `properties`-like maps are never treated as schemas
//!
//! ## Quick Start
//!
//! ```rust
//! use schemapool_core::{SchemaCompiler, StringLoader};
//!
//! let loader = StringLoader::new(r##"{
//!     "properties": {"name": {"$ref": "#/definitions/name"}},
//!     "definitions": {"name": {"type": "string"}}
//! }"##);
//!
//! let compiled = SchemaCompiler::new().compile(&loader)?;
//! assert_eq!(compiled.references(), ["#/definitions/name"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Cargo Features
//!
//! - `http` (default): fetch `http://` and `https://` references with `reqwest`
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

pub mod compiler;
pub mod loader;
pub mod pool;
pub mod reference;

// Re-export commonly used types for convenience
pub use compiler::{CompileError, CompileErrors, CompileResult, CompiledSchema, CompilerConfig, SchemaCompiler};
pub use loader::{
    BufferLoader, DefaultLoaderFactory, FileLoader, InMemoryLoaderFactory, JsonLoader, LoaderError,
    LoaderFactory, LoaderPolicy, LoaderResult, ReferenceLoader, StringLoader, ValueLoader,
};
pub use pool::{PoolError, PoolResult, PoolStats, SchemaPool, WalkWarning};
pub use reference::{JsonPointer, JsonReference, ReferenceError, ReferenceResult};
