//! RFC 6901 JSON Pointer parsing and navigation
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

use crate::reference::error::{ReferenceError, ReferenceResult};
use serde_json::Value;
use std::fmt;

/// A parsed JSON pointer: a sequence of unescaped reference tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// The empty pointer, which addresses the whole document
    pub fn root() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Parse a pointer in its JSON string representation (`/a/b~1c`)
    pub fn parse(pointer: &str) -> ReferenceResult<Self> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }

        let rest = pointer.strip_prefix('/').ok_or_else(|| {
            ReferenceError::invalid_pointer(pointer, "JSON pointer must start with '/' or be empty")
        })?;

        let tokens = rest
            .split('/')
            .map(|segment| unescape_token(segment, pointer))
            .collect::<ReferenceResult<Vec<_>>>()?;

        Ok(Self { tokens })
    }

    /// Parse a pointer taken from a URI fragment, undoing percent-encoding first
    pub fn from_fragment(fragment: &str) -> ReferenceResult<Self> {
        let decoded = percent_decode(fragment)?;
        Self::parse(&decoded)
    }

    /// Unescaped reference tokens, outermost first
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether this pointer addresses the whole document
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append a token
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// Remove the last token
    pub fn pop(&mut self) -> Option<String> {
        self.tokens.pop()
    }

    /// Navigate into `document`, failing if any step of the path is missing
    pub fn get<'a>(&self, document: &'a Value) -> ReferenceResult<&'a Value> {
        let mut current = document;

        for token in &self.tokens {
            current = match current {
                Value::Object(obj) => obj.get(token).ok_or_else(|| {
                    ReferenceError::pointer_not_found(
                        self.to_string(),
                        format!("Property '{}' not found", token),
                    )
                })?,
                Value::Array(arr) => {
                    let index = parse_array_index(token).ok_or_else(|| {
                        ReferenceError::pointer_not_found(
                            self.to_string(),
                            format!("Invalid array index '{}'", token),
                        )
                    })?;
                    arr.get(index).ok_or_else(|| {
                        ReferenceError::pointer_not_found(
                            self.to_string(),
                            format!("Array index {} out of bounds", index),
                        )
                    })?
                }
                _ => {
                    return Err(ReferenceError::pointer_not_found(
                        self.to_string(),
                        format!("Cannot access property '{}' on non-object/array", token),
                    ));
                }
            };
        }

        Ok(current)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

fn unescape_token(segment: &str, pointer: &str) -> ReferenceResult<String> {
    let mut token = String::with_capacity(segment.len());
    let mut chars = segment.chars();

    while let Some(ch) = chars.next() {
        if ch != '~' {
            token.push(ch);
            continue;
        }
        match chars.next() {
            Some('0') => token.push('~'),
            Some('1') => token.push('/'),
            _ => {
                return Err(ReferenceError::invalid_pointer(
                    pointer,
                    "Invalid escape sequence in JSON pointer",
                ));
            }
        }
    }

    Ok(token)
}

// Indices are plain decimal without sign or leading zeros.
fn parse_array_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    token.parse().ok()
}

// Malformed escapes such as `%zz` pass through unchanged.
fn percent_decode(fragment: &str) -> ReferenceResult<String> {
    urlencoding::decode(fragment)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ReferenceError::invalid_pointer(fragment, "Percent-decoded fragment is not UTF-8"))
}
