//! Schema keywords that matter for reference resolution
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Value};

/// Reference keyword
pub const KEY_REF: &str = "$ref";

/// Identifier keyword since draft 6
pub const KEY_ID: &str = "$id";

/// Identifier keyword up to draft 4
pub const KEY_ID_LEGACY: &str = "id";

/// Keywords whose values are literal instance data, never schemas
pub const LITERAL_KEYWORDS: &[&str] = &["const", "enum", "default", "examples"];

/// Keywords whose values map arbitrary user-chosen names to schemas
pub const SCHEMA_MAP_KEYWORDS: &[&str] = &[
    "properties",
    "patternProperties",
    "dependencies",
    "dependentSchemas",
    "definitions",
    "$defs",
];

/// Which identifier keyword an object uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKeyword {
    Modern,
    Legacy,
}

impl IdKeyword {
    pub fn key(self) -> &'static str {
        match self {
            IdKeyword::Modern => KEY_ID,
            IdKeyword::Legacy => KEY_ID_LEGACY,
        }
    }

    /// `$id` wins when present; `id` is only consulted in its absence
    pub fn select(object: &Map<String, Value>) -> Option<Self> {
        if object.contains_key(KEY_ID) {
            Some(IdKeyword::Modern)
        } else if object.contains_key(KEY_ID_LEGACY) {
            Some(IdKeyword::Legacy)
        } else {
            None
        }
    }
}

/// How the value under a keyword is to be traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRole {
    /// A schema, or a structure containing schemas
    Schema,
    /// Literal data, skipped entirely
    Literal,
    /// A map from user names to schemas; only the map's values are schemas
    SchemaMap,
}

pub fn child_role(key: &str) -> ChildRole {
    if LITERAL_KEYWORDS.contains(&key) {
        ChildRole::Literal
    } else if SCHEMA_MAP_KEYWORDS.contains(&key) {
        ChildRole::SchemaMap
    } else {
        ChildRole::Schema
    }
}
