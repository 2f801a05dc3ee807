//! Schema compilation sessions
//!
//! A [`SchemaCompiler`] turns a root loader into a [`CompiledSchema`]. Each
//! call to [`SchemaCompiler::compile`] owns a fresh [`SchemaPool`], so
//! identifiers declared by one schema never leak into another compilation.
//!
//! Compilation runs in three steps:
//! 1. Load the root, either by reference through the pool or as a
//!    standalone document when the loader has no locator
//! 2. Follow every `$ref` reachable from the root breadth-first, resolving
//!    each distinct reference once
//! 3. Check each reached document against the meta-schema of its
//!    `$schema` dialect, or draft-7 when none is declared
//!
//! Failures from steps 2 and 3 are collected into [`CompileErrors`] rather
//! than stopping at the first one.
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

pub mod error;

pub use error::{CompileError, CompileErrors, CompileResult};

use crate::loader::{DefaultLoaderFactory, JsonLoader, LoaderFactory, LoaderPolicy};
use crate::pool::keywords::IdKeyword;
use crate::pool::walker::collect_references;
use crate::pool::{PoolResult, SchemaPool};
use crate::reference::JsonReference;
use jsonschema::Draft;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Location shown for a root document that has no reference
const STANDALONE_LOCATION: &str = "#";

/// Dialect assumed for documents without a `$schema`
const DEFAULT_DRAFT: Draft = Draft::Draft7;

/// Compilation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Check every reached document against its dialect's meta-schema
    pub validate_meta_schema: bool,
    /// Follow all `$ref`s at compile time instead of on first use
    pub resolve_eagerly: bool,
    /// Schemes the default loader factory may fetch
    pub loaders: LoaderPolicy,
    /// Directory relative root paths are resolved against
    pub base_dir: Option<PathBuf>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            validate_meta_schema: true,
            resolve_eagerly: true,
            loaders: LoaderPolicy::default(),
            base_dir: None,
        }
    }
}

/// Compiles root schemas into [`CompiledSchema`]s
#[derive(Debug, Clone, Default)]
pub struct SchemaCompiler {
    config: CompilerConfig,
}

impl SchemaCompiler {
    /// Create a compiler with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with explicit settings
    pub fn with_config(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile the schema `loader` produces, fetching references through the
    /// scheme-dispatching default factory
    pub fn compile(&self, loader: &dyn JsonLoader) -> CompileResult<CompiledSchema> {
        let factory = DefaultLoaderFactory::with_policy(self.config.loaders.clone());
        self.compile_with_factory(loader, factory)
    }

    /// Compile with a caller-provided loader factory
    pub fn compile_with_factory(
        &self,
        loader: &dyn JsonLoader,
        factory: impl LoaderFactory + 'static,
    ) -> CompileResult<CompiledSchema> {
        let mut pool = SchemaPool::new(factory);

        let (root_reference, root) = match loader.locator() {
            Some(locator) => self.load_located(&mut pool, locator)?,
            None => load_standalone(&mut pool, loader)?,
        };
        let root_location = location_of(&root_reference);
        debug!(root = %root_location, "Compiling schema");

        let mut errors = CompileErrors::new();
        if self.config.validate_meta_schema {
            check_meta_schema(&root, DEFAULT_DRAFT, &root_location, &mut errors);
        }

        let references = if self.config.resolve_eagerly {
            self.resolve_all(&mut pool, &root, &root_location, &mut errors)
        } else {
            Vec::new()
        };

        errors.into_result()?;

        debug!(
            root = %root_location,
            references = references.len(),
            documents = pool.len(),
            "Compiled schema"
        );
        Ok(CompiledSchema {
            root,
            root_reference,
            pool,
            references,
        })
    }

    fn load_located(&self, pool: &mut SchemaPool, locator: &str) -> CompileResult<(JsonReference, Arc<Value>)> {
        let reference = self.root_reference(locator)?;
        let root = pool.resolve(&reference).map_err(|source| CompileError::Root {
            reference: reference.to_string(),
            source,
        })?;
        Ok((reference, root))
    }

    /// Canonical references are used as given; anything else is taken as a
    /// filesystem path, relative to `base_dir` or the current directory
    fn root_reference(&self, locator: &str) -> Result<JsonReference, CompileError> {
        let invalid = |reason: String| CompileError::RootLocator {
            locator: locator.to_string(),
            reason,
        };

        let parsed = JsonReference::parse(locator).map_err(|e| invalid(e.to_string()))?;
        if parsed.is_canonical() {
            return Ok(parsed);
        }
        if parsed.url().is_some() {
            return Err(invalid("opaque URIs cannot be fetched".to_string()));
        }
        if !parsed.has_path() {
            return Err(invalid("locator has no document path".to_string()));
        }

        let (path, fragment) = match locator.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (locator, None),
        };
        let path = Path::new(path);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            let base_dir = match &self.config.base_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir().map_err(|e| invalid(e.to_string()))?,
            };
            base_dir.join(path)
        };

        let file = JsonReference::from_file_path(&absolute).map_err(|e| invalid(e.to_string()))?;
        match fragment {
            Some(fragment) => JsonReference::parse(&format!("#{}", fragment))
                .and_then(|fragment| file.inherits(&fragment))
                .map_err(|e| invalid(e.to_string())),
            None => Ok(file),
        }
    }

    fn resolve_all(
        &self,
        pool: &mut SchemaPool,
        root: &Value,
        root_location: &str,
        errors: &mut CompileErrors,
    ) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut resolved = Vec::new();
        let mut queue: VecDeque<(String, String)> = collect_references(root)
            .into_iter()
            .map(|reference| (reference, root_location.to_string()))
            .collect();

        while let Some((reference, referrer)) = queue.pop_front() {
            if !visited.insert(reference.clone()) {
                continue;
            }

            match resolve_raw(pool, &reference) {
                Ok(target) => {
                    trace!(reference = %reference, referrer = %referrer, "Resolved reference");
                    if self.config.validate_meta_schema {
                        let dialect = containing_draft(pool, &reference);
                        check_meta_schema(&target, dialect, &reference, errors);
                    }
                    queue.extend(
                        collect_references(&target)
                            .into_iter()
                            .map(|next| (next, reference.clone())),
                    );
                    resolved.push(reference);
                }
                Err(source) => {
                    debug!(reference = %reference, referrer = %referrer, error = %source, "Unresolved reference");
                    errors.add(CompileError::unresolved(reference, referrer, source));
                }
            }
        }

        resolved
    }
}

/// A compiled root schema together with the pool that resolved it
#[derive(Debug)]
pub struct CompiledSchema {
    root: Arc<Value>,
    root_reference: JsonReference,
    pool: SchemaPool,
    references: Vec<String>,
}

impl CompiledSchema {
    /// The root schema, with `$ref`s canonicalized
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Where the root came from; empty for an anonymous standalone root
    pub fn root_reference(&self) -> &JsonReference {
        &self.root_reference
    }

    pub fn pool(&self) -> &SchemaPool {
        &self.pool
    }

    /// References followed during eager resolution, in visiting order
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// Resolve a reference relative to the root, loading on demand
    pub fn resolve(&mut self, reference: &str) -> PoolResult<Arc<Value>> {
        let parsed = JsonReference::parse(reference)?;
        let target = self.root_reference.inherits(&parsed)?;
        resolve_reference(&mut self.pool, &target)
    }
}

fn load_standalone(pool: &mut SchemaPool, loader: &dyn JsonLoader) -> CompileResult<(JsonReference, Arc<Value>)> {
    let mut document = loader
        .load_json()
        .map_err(|source| CompileError::RootLoad { source })?;

    pool.parse_document(&mut document, &JsonReference::empty());
    let root_reference = declared_identifier(&document).unwrap_or_default();

    let root = Arc::new(document.clone());
    pool.set_standalone(document).map_err(|source| CompileError::Root {
        reference: location_of(&root_reference),
        source,
    })?;
    Ok((root_reference, root))
}

fn declared_identifier(document: &Value) -> Option<JsonReference> {
    let object = document.as_object()?;
    let keyword = IdKeyword::select(object)?;
    let identifier = object.get(keyword.key())?.as_str()?;
    JsonReference::parse(identifier)
        .ok()
        .filter(JsonReference::is_canonical)
}

fn resolve_raw(pool: &mut SchemaPool, raw: &str) -> PoolResult<Arc<Value>> {
    let reference = JsonReference::parse(raw)?;
    resolve_reference(pool, &reference)
}

// Non-canonical references only reach identifiers registered under a
// standalone root, or the standalone root itself.
fn resolve_reference(pool: &mut SchemaPool, reference: &JsonReference) -> PoolResult<Arc<Value>> {
    if reference.is_canonical() {
        return pool.resolve(reference);
    }
    if let Some(registered) = pool.get(&reference.to_string()) {
        return Ok(registered);
    }

    let document = if reference.is_fragment_only() || reference.is_empty() {
        pool.standalone_arc()
    } else {
        pool.get(&reference.without_fragment().to_string())
    };
    match document {
        Some(document) => {
            let pointer = reference.pointer()?;
            if pointer.is_root() {
                return Ok(document);
            }
            Ok(Arc::new(pointer.get(&document)?.clone()))
        }
        None => pool.resolve(reference),
    }
}

/// The `$schema` dialect of the document a reference points into
fn containing_draft(pool: &SchemaPool, raw: &str) -> Draft {
    let document = JsonReference::parse(raw)
        .ok()
        .map(|reference| reference.without_fragment())
        .filter(|base| !base.is_empty())
        .and_then(|base| pool.get(&base.to_string()))
        .or_else(|| pool.standalone_arc());

    document
        .and_then(|document| DEFAULT_DRAFT.detect(&document).ok())
        .unwrap_or(DEFAULT_DRAFT)
}

fn check_meta_schema(schema: &Value, dialect: Draft, location: &str, errors: &mut CompileErrors) {
    let draft = match dialect.detect(schema) {
        Ok(draft) => draft,
        Err(error) => {
            errors.add(CompileError::invalid_schema(location, error.to_string()));
            return;
        }
    };

    let result = match draft {
        Draft::Draft4 => jsonschema::draft4::meta::validate(schema),
        Draft::Draft6 => jsonschema::draft6::meta::validate(schema),
        Draft::Draft7 => jsonschema::draft7::meta::validate(schema),
        Draft::Draft201909 => jsonschema::draft201909::meta::validate(schema),
        _ => jsonschema::draft202012::meta::validate(schema),
    };
    if let Err(error) = result {
        errors.add(CompileError::invalid_schema(location, error.to_string()));
    }
}

fn location_of(reference: &JsonReference) -> String {
    if reference.is_empty() {
        STANDALONE_LOCATION.to_string()
    } else {
        reference.to_string()
    }
}
