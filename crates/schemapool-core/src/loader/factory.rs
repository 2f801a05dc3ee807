//! Loader factories: locator string in, loader out
//!
//! Embedders swap the factory to control where documents come from
//! (bundled copies, sandboxed directories, custom caches).
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use crate::loader::source::{FileLoader, JsonLoader, ValueLoader};
use crate::reference::JsonReference;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// Creates a loader for an absolute locator
pub trait LoaderFactory {
    fn create(&self, locator: &str) -> LoaderResult<Box<dyn JsonLoader>>;
}

/// Which schemes the default factory is allowed to fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderPolicy {
    /// Allow `file://` locators
    pub allow_file: bool,
    /// Allow `http://` and `https://` locators
    pub allow_http: bool,
}

impl Default for LoaderPolicy {
    fn default() -> Self {
        Self {
            allow_file: true,
            allow_http: cfg!(feature = "http"),
        }
    }
}

/// Dispatches on the locator's URL scheme
#[derive(Debug, Clone, Default)]
pub struct DefaultLoaderFactory {
    policy: LoaderPolicy,
}

impl DefaultLoaderFactory {
    /// Create a factory with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory with an explicit policy
    pub fn with_policy(policy: LoaderPolicy) -> Self {
        Self { policy }
    }
}

impl LoaderFactory for DefaultLoaderFactory {
    fn create(&self, locator: &str) -> LoaderResult<Box<dyn JsonLoader>> {
        let url = Url::parse(locator)
            .map_err(|e| LoaderError::invalid_locator(locator, e.to_string()))?;

        match url.scheme() {
            "file" if self.policy.allow_file => Ok(Box::new(FileLoader::new(locator)?)),
            #[cfg(feature = "http")]
            "http" | "https" if self.policy.allow_http => {
                Ok(Box::new(crate::loader::source::HttpLoader::new(locator)))
            }
            scheme => Err(LoaderError::unsupported_scheme(locator, scheme)),
        }
    }
}

/// Serves documents from a fixed in-memory map keyed by canonical locator
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoaderFactory {
    documents: HashMap<String, Value>,
}

impl InMemoryLoaderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_document(mut self, locator: &str, document: Value) -> Self {
        self.insert(locator, document);
        self
    }

    /// Register a document; the locator is normalized the same way pool keys are
    pub fn insert(&mut self, locator: &str, document: Value) {
        self.documents.insert(normalize_locator(locator), document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl LoaderFactory for InMemoryLoaderFactory {
    fn create(&self, locator: &str) -> LoaderResult<Box<dyn JsonLoader>> {
        self.documents
            .get(&normalize_locator(locator))
            .map(|document| Box::new(ValueLoader::new(document.clone())) as Box<dyn JsonLoader>)
            .ok_or_else(|| LoaderError::not_found(locator))
    }
}

fn normalize_locator(locator: &str) -> String {
    JsonReference::parse(locator)
        .map(|reference| reference.to_string())
        .unwrap_or_else(|_| locator.to_string())
}
