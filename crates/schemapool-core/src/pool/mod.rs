//! Document pool: a per-compilation cache of schema documents
//!
//! The pool maps canonical locators to the (sub-)documents they identify.
//! Entries come from three places:
//! - whole documents fetched through the [`LoaderFactory`], keyed by their base URI
//! - every `$id` found while walking a document, keyed by the resolved identifier
//! - JSON-pointer extractions, keyed by the full reference
//!
//! Cross-references stay strings. A cyclic schema never becomes a cyclic
//! object graph; each `$ref` is looked up here when it is followed.
//!
//! # Example Usage
//!
//! ```rust
//! use schemapool_core::loader::InMemoryLoaderFactory;
//! use schemapool_core::pool::SchemaPool;
//! use schemapool_core::reference::JsonReference;
//! use serde_json::json;
//!
//! let factory = InMemoryLoaderFactory::new().with_document(
//!     "http://example.com/root.json",
//!     json!({"definitions": {"name": {"type": "string"}}}),
//! );
//! let mut pool = SchemaPool::new(factory);
//!
//! let reference = JsonReference::parse("http://example.com/root.json#/definitions/name")?;
//! let schema = pool.resolve(&reference)?;
//! assert_eq!(schema["type"], "string");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod keywords;
pub mod walker;

pub use error::{PoolError, PoolResult};
pub use keywords::IdKeyword;
pub use walker::{walk, WalkReport, WalkWarning};

use crate::loader::{DefaultLoaderFactory, LoaderFactory};
use crate::reference::JsonReference;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Counters describing how the pool served its lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Lookups served by an exact key match
    pub exact_hits: usize,
    /// Lookups served by extracting a pointer from a cached base document
    pub pointer_hits: usize,
    /// Loader invocations
    pub loads: usize,
}

/// Cache of documents and sub-documents for one compilation
pub struct SchemaPool {
    documents: HashMap<String, Arc<Value>>,
    standalone: Option<Arc<Value>>,
    factory: Box<dyn LoaderFactory>,
    stats: PoolStats,
    warnings: Vec<WalkWarning>,
}

impl SchemaPool {
    /// Create an empty pool fetching through `factory`
    pub fn new(factory: impl LoaderFactory + 'static) -> Self {
        Self {
            documents: HashMap::new(),
            standalone: None,
            factory: Box::new(factory),
            stats: PoolStats::default(),
            warnings: Vec::new(),
        }
    }

    /// Create an empty pool using the scheme-dispatching default factory
    pub fn with_default_loaders() -> Self {
        Self::new(DefaultLoaderFactory::new())
    }

    /// Walk `document` against `base`, canonicalizing its `$ref`s in place
    /// and registering every identifier it declares
    pub fn parse_document(&mut self, document: &mut Value, base: &JsonReference) {
        let report = walker::walk(document, base);
        let snapshot = Arc::new(document.clone());
        self.register(&snapshot, report);
    }

    /// Resolve a canonical reference to the document it identifies
    ///
    /// Lookup order: exact key, then pointer extraction from the cached base
    /// document, then a fetch of the base document through the loader.
    /// Successful extractions are cached under the full reference.
    pub fn resolve(&mut self, reference: &JsonReference) -> PoolResult<Arc<Value>> {
        debug!(reference = %reference, "Resolving reference");

        if !reference.is_canonical() {
            return Err(PoolError::not_canonical(reference.to_string()));
        }

        let key = reference.to_string();
        if let Some(document) = self.documents.get(&key) {
            debug!(reference = %key, "Served from pool");
            self.stats.exact_hits += 1;
            return Ok(Arc::clone(document));
        }

        let base = reference.without_fragment();
        let base_key = base.to_string();
        if let Some(root) = self.documents.get(&base_key).cloned() {
            debug!(reference = %key, base = %base_key, "Extracting from cached base document");
            self.stats.pointer_hits += 1;
            return self.extract(&root, reference, key);
        }

        let root = self.fetch(&base, base_key)?;

        // Anchors declared inside the fetched document are now registered
        if let Some(document) = self.documents.get(&key) {
            return Ok(Arc::clone(document));
        }
        self.extract(&root, reference, key)
    }

    /// Supply the root document of a compilation that has no locator
    ///
    /// The standalone document is never consulted by [`SchemaPool::resolve`].
    pub fn set_standalone(&mut self, document: Value) -> PoolResult<()> {
        if self.standalone.is_some() {
            return Err(PoolError::StandaloneAlreadySet);
        }
        self.standalone = Some(Arc::new(document));
        Ok(())
    }

    /// The standalone document, if one was supplied
    pub fn standalone(&self) -> Option<&Value> {
        self.standalone.as_deref()
    }

    pub(crate) fn standalone_arc(&self) -> Option<Arc<Value>> {
        self.standalone.clone()
    }

    /// Look up a cached entry by its verbatim key, without loading
    pub fn get(&self, locator: &str) -> Option<Arc<Value>> {
        self.documents.get(locator).cloned()
    }

    /// Whether `locator` is cached verbatim
    pub fn contains(&self, locator: &str) -> bool {
        self.documents.contains_key(locator)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Cached locators, sorted
    pub fn locators(&self) -> Vec<&str> {
        let mut locators: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        locators.sort_unstable();
        locators
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Malformed identifiers and references skipped while walking
    pub fn warnings(&self) -> &[WalkWarning] {
        &self.warnings
    }

    fn fetch(&mut self, base: &JsonReference, base_key: String) -> PoolResult<Arc<Value>> {
        debug!(locator = %base_key, "Loading document");
        let loader = self.factory.create(&base_key)?;
        self.stats.loads += 1;
        let mut document = loader.load_json()?;

        let report = walker::walk(&mut document, base);
        let document = Arc::new(document);
        self.documents.insert(base_key, Arc::clone(&document));
        self.register(&document, report);
        Ok(document)
    }

    fn extract(&mut self, root: &Arc<Value>, reference: &JsonReference, key: String) -> PoolResult<Arc<Value>> {
        let pointer = reference.pointer()?;
        if pointer.is_root() {
            return Ok(Arc::clone(root));
        }

        let fragment = Arc::new(pointer.get(root)?.clone());
        trace!(reference = %key, "Caching extracted fragment");
        self.documents.insert(key, Arc::clone(&fragment));
        Ok(fragment)
    }

    fn register(&mut self, document: &Arc<Value>, report: WalkReport) {
        for identifier in report.identifiers {
            let entry = if identifier.pointer.is_root() {
                Arc::clone(document)
            } else {
                match identifier.pointer.get(document) {
                    Ok(sub) => Arc::new(sub.clone()),
                    Err(_) => continue,
                }
            };
            debug!(identifier = %identifier.locator, pointer = %identifier.pointer, "Registered identifier");
            self.documents.insert(identifier.locator, entry);
        }

        for warning in &report.warnings {
            debug!(%warning, "Skipped malformed keyword while walking");
        }
        self.warnings.extend(report.warnings);
    }
}

impl Default for SchemaPool {
    fn default() -> Self {
        Self::with_default_loaders()
    }
}

impl fmt::Debug for SchemaPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaPool")
            .field("locators", &self.locators())
            .field("standalone", &self.standalone.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}
