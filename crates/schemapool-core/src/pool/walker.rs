//! Document walker: identifier discovery and `$ref` canonicalization
//!
//! The walker makes one pass over a freshly loaded document. Every `$id`
//! (or legacy `id`) it meets is reported together with the pointer to the
//! object that declared it, and every `$ref` string is rewritten in place to
//! the reference resolved against the identifier scope it appears in.
//!
//! Malformed identifiers and references never stop the walk. They are left
//! untouched and reported as [`WalkWarning`]s; schema compilation reports
//! them properly later.
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

use crate::pool::keywords::{child_role, ChildRole, IdKeyword, KEY_REF};
use crate::reference::{JsonPointer, JsonReference, ReferenceError};
use serde_json::{Map, Value};
use std::fmt;
use tracing::trace;

/// A location-independent identifier found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// Resolved identifier, as used for pool keys
    pub locator: String,
    /// Where the identified sub-schema sits in the walked document
    pub pointer: JsonPointer,
}

/// An identifier or reference that could not be canonicalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkWarning {
    /// Pointer to the object holding the keyword
    pub pointer: JsonPointer,
    /// The keyword (`$id`, `id` or `$ref`)
    pub keyword: &'static str,
    /// The raw value left in the document
    pub value: String,
    pub error: ReferenceError,
}

impl fmt::Display for WalkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' at '#{}' left unresolved: {}",
            self.keyword, self.value, self.pointer, self.error
        )
    }
}

/// Everything a walk discovered
#[derive(Debug, Default, Clone)]
pub struct WalkReport {
    pub identifiers: Vec<Identifier>,
    pub warnings: Vec<WalkWarning>,
}

/// Walk `document` with `base` as the initial resolution scope
pub fn walk(document: &mut Value, base: &JsonReference) -> WalkReport {
    let mut walker = DocumentWalker {
        path: JsonPointer::root(),
        report: WalkReport::default(),
    };
    walker.visit(document, base);
    walker.report
}

/// All `$ref` strings reachable from `schema` through schema positions
///
/// Uses the same keyword rules as [`walk`], so literal data and the names in
/// property-like maps are never mistaken for references.
pub fn collect_references(schema: &Value) -> Vec<String> {
    let mut references = Vec::new();
    collect_into(schema, &mut references);
    references
}

fn collect_into(value: &Value, references: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_into(item, references);
            }
        }
        Value::Object(object) => {
            if let Some(Value::String(reference)) = object.get(KEY_REF) {
                references.push(reference.clone());
            }
            for (key, child) in object {
                match child_role(key) {
                    ChildRole::Literal => {}
                    ChildRole::SchemaMap => {
                        if let Value::Object(named) = child {
                            for schema in named.values() {
                                collect_into(schema, references);
                            }
                        }
                    }
                    ChildRole::Schema => collect_into(child, references),
                }
            }
        }
        _ => {}
    }
}

struct DocumentWalker {
    path: JsonPointer,
    report: WalkReport,
}

impl DocumentWalker {
    fn visit(&mut self, value: &mut Value, base: &JsonReference) {
        match value {
            Value::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    self.path.push(index.to_string());
                    self.visit(item, base);
                    self.path.pop();
                }
            }
            Value::Object(object) => self.visit_object(object, base),
            _ => {}
        }
    }

    fn visit_object(&mut self, object: &mut Map<String, Value>, base: &JsonReference) {
        let scoped = self.enter_scope(object, base);
        let local_base = scoped.as_ref().unwrap_or(base);

        self.canonicalize_ref(object, local_base);

        for (key, child) in object.iter_mut() {
            match child_role(key) {
                ChildRole::Literal => continue,
                ChildRole::SchemaMap => {
                    self.path.push(key.as_str());
                    if let Value::Object(named) = child {
                        for (name, schema) in named.iter_mut() {
                            self.path.push(name.as_str());
                            self.visit(schema, local_base);
                            self.path.pop();
                        }
                    }
                    self.path.pop();
                }
                ChildRole::Schema => {
                    self.path.push(key.as_str());
                    self.visit(child, local_base);
                    self.path.pop();
                }
            }
        }
    }

    // Returns the new scope when the object declares a usable identifier.
    fn enter_scope(&mut self, object: &Map<String, Value>, base: &JsonReference) -> Option<JsonReference> {
        let keyword = IdKeyword::select(object)?;
        let raw = object.get(keyword.key())?.as_str()?;

        match JsonReference::parse(raw).and_then(|id| base.inherits(&id)) {
            Ok(scope) => {
                trace!(identifier = %scope, pointer = %self.path, "Found identifier");
                self.report.identifiers.push(Identifier {
                    locator: scope.to_string(),
                    pointer: self.path.clone(),
                });
                Some(scope)
            }
            Err(error) => {
                self.warn(keyword.key(), raw, error);
                None
            }
        }
    }

    fn canonicalize_ref(&mut self, object: &mut Map<String, Value>, base: &JsonReference) {
        let Some(Value::String(raw)) = object.get_mut(KEY_REF) else {
            return;
        };

        match JsonReference::parse(raw).and_then(|reference| base.inherits(&reference)) {
            Ok(resolved) => {
                trace!(from = %raw, to = %resolved, "Canonicalized reference");
                *raw = resolved.to_string();
            }
            Err(error) => self.warn(KEY_REF, raw, error),
        }
    }

    fn warn(&mut self, keyword: &'static str, value: &str, error: ReferenceError) {
        self.report.warnings.push(WalkWarning {
            pointer: self.path.clone(),
            keyword,
            value: value.to_string(),
            error,
        });
    }
}
