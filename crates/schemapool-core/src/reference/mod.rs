//! URI references with JSON Pointer fragments
//!
//! A [`JsonReference`] is what `$id` and `$ref` values parse into. Absolute
//! references are backed by [`url::Url`] and follow RFC 3986 resolution;
//! relative references keep their raw text until a base is applied.
//!
//! ```rust
//! use schemapool_core::reference::JsonReference;
//!
//! let base = JsonReference::parse("http://example.com/schemas/root.json").unwrap();
//! let child = JsonReference::parse("item.json#/definitions/id").unwrap();
//! let resolved = base.inherits(&child).unwrap();
//!
//! assert!(resolved.is_canonical());
//! assert_eq!(resolved.to_string(), "http://example.com/schemas/item.json#/definitions/id");
//! ```
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod pointer;

pub use error::{ReferenceError, ReferenceResult};
pub use pointer::JsonPointer;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::str::FromStr;
use url::Url;

// Only used to check that relative references are syntactically joinable.
const PLACEHOLDER_BASE: &str = "http://placeholder.invalid/";

#[derive(Debug, Clone)]
enum Target {
    Absolute(Url),
    Relative {
        path: String,
        fragment: Option<String>,
    },
}

/// An absolute or relative URI reference, optionally carrying a fragment
#[derive(Debug, Clone)]
pub struct JsonReference {
    target: Target,
}

impl JsonReference {
    /// The empty reference (`""`), used as the starting base for documents
    /// that were supplied without a locator
    pub fn empty() -> Self {
        Self {
            target: Target::Relative {
                path: String::new(),
                fragment: None,
            },
        }
    }

    /// Parse a reference string
    pub fn parse(reference: &str) -> ReferenceResult<Self> {
        match Url::parse(reference) {
            Ok(url) => Ok(Self::from_url(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => Self::parse_relative(reference),
            Err(e) => Err(ReferenceError::malformed(reference, e.to_string())),
        }
    }

    /// Wrap an already parsed absolute URL
    pub fn from_url(mut url: Url) -> Self {
        if url.fragment() == Some("") {
            url.set_fragment(None);
        }
        Self {
            target: Target::Absolute(url),
        }
    }

    /// Build a `file://` reference from an absolute filesystem path
    pub fn from_file_path(path: &Path) -> ReferenceResult<Self> {
        Url::from_file_path(path)
            .map(Self::from_url)
            .map_err(|_| {
                ReferenceError::malformed(
                    path.display().to_string(),
                    "file references require an absolute path",
                )
            })
    }

    fn parse_relative(reference: &str) -> ReferenceResult<Self> {
        let placeholder = Url::parse(PLACEHOLDER_BASE)
            .map_err(|e| ReferenceError::malformed(reference, e.to_string()))?;
        placeholder
            .join(reference)
            .map_err(|e| ReferenceError::malformed(reference, e.to_string()))?;

        let (path, fragment) = match reference.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (reference, None),
        };

        Ok(Self {
            target: Target::Relative {
                path: path.to_string(),
                fragment: fragment.filter(|f| !f.is_empty()).map(str::to_string),
            },
        })
    }

    /// A reference is canonical when it is absolute and hierarchical, so that
    /// it can both be fetched and serve as a base for other references
    pub fn is_canonical(&self) -> bool {
        match &self.target {
            Target::Absolute(url) => !url.cannot_be_a_base(),
            Target::Relative { .. } => false,
        }
    }

    /// Whether this is the empty reference
    pub fn is_empty(&self) -> bool {
        matches!(&self.target, Target::Relative { path, fragment } if path.is_empty() && fragment.is_none())
    }

    /// Whether this reference only carries a fragment (`#/definitions/x`, `#foo`)
    pub fn is_fragment_only(&self) -> bool {
        matches!(&self.target, Target::Relative { path, fragment } if path.is_empty() && fragment.is_some())
    }

    /// Whether the reference addresses a document rather than only a fragment
    pub fn has_path(&self) -> bool {
        match &self.target {
            Target::Absolute(_) => true,
            Target::Relative { path, .. } => !path.is_empty(),
        }
    }

    /// The underlying URL for absolute references
    pub fn url(&self) -> Option<&Url> {
        match &self.target {
            Target::Absolute(url) => Some(url),
            Target::Relative { .. } => None,
        }
    }

    /// The fragment, without the leading `#`
    pub fn fragment(&self) -> Option<&str> {
        match &self.target {
            Target::Absolute(url) => url.fragment(),
            Target::Relative { fragment, .. } => fragment.as_deref(),
        }
    }

    /// A copy of this reference with the fragment removed
    pub fn without_fragment(&self) -> Self {
        match &self.target {
            Target::Absolute(url) => {
                let mut url = url.clone();
                url.set_fragment(None);
                Self::from_url(url)
            }
            Target::Relative { path, .. } => Self {
                target: Target::Relative {
                    path: path.clone(),
                    fragment: None,
                },
            },
        }
    }

    /// The fragment interpreted as a JSON pointer
    ///
    /// A missing fragment is the root pointer. Plain-name fragments are
    /// anchors and fail with [`ReferenceError::NotAPointer`].
    pub fn pointer(&self) -> ReferenceResult<JsonPointer> {
        match self.fragment() {
            None | Some("") => Ok(JsonPointer::root()),
            Some(fragment) if fragment.starts_with('/') => JsonPointer::from_fragment(fragment),
            Some(fragment) => Err(ReferenceError::not_a_pointer(fragment)),
        }
    }

    /// Resolve `child` against this reference
    ///
    /// Absolute children replace the base outright; relative children are
    /// joined following RFC 3986 section 5.2.
    pub fn inherits(&self, child: &JsonReference) -> ReferenceResult<JsonReference> {
        match (&self.target, &child.target) {
            (_, Target::Absolute(_)) => Ok(child.clone()),
            (Target::Absolute(base), Target::Relative { .. }) => {
                let rendered = child.to_string();
                base.join(&rendered)
                    .map(Self::from_url)
                    .map_err(|e| ReferenceError::malformed(rendered, e.to_string()))
            }
            (
                Target::Relative { path: base_path, .. },
                Target::Relative {
                    path: child_path,
                    fragment,
                },
            ) => {
                if self.is_empty() || child_path.starts_with('/') {
                    return Ok(child.clone());
                }
                let path = if child_path.is_empty() {
                    base_path.clone()
                } else {
                    merge_relative_paths(base_path, child_path)
                };
                Ok(Self {
                    target: Target::Relative {
                        path,
                        fragment: fragment.clone(),
                    },
                })
            }
        }
    }
}

impl Default for JsonReference {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for JsonReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Absolute(url) => f.write_str(url.as_str()),
            Target::Relative { path, fragment } => {
                f.write_str(path)?;
                if let Some(fragment) = fragment {
                    write!(f, "#{}", fragment)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for JsonReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for JsonReference {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for JsonReference {}

impl Hash for JsonReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

fn merge_relative_paths(base: &str, child: &str) -> String {
    let directory = match base.rfind('/') {
        Some(pos) => &base[..=pos],
        None => "",
    };
    remove_dot_segments(&format!("{}{}", directory, child))
}

fn remove_dot_segments(path: &str) -> String {
    let (prefix, rest) = match path.strip_prefix('/') {
        Some(rest) => ("/", rest),
        None => ("", path),
    };

    let mut output: Vec<&str> = Vec::new();
    let mut trailing_slash = false;
    for segment in rest.split('/') {
        trailing_slash = false;
        match segment {
            "." => trailing_slash = true,
            ".." => {
                output.pop();
                trailing_slash = true;
            }
            segment => output.push(segment),
        }
    }

    let mut result = format!("{}{}", prefix, output.join("/"));
    if trailing_slash && !output.is_empty() {
        result.push('/');
    }
    result
}
