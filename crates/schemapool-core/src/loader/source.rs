//! Concrete document sources
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use crate::loader::factory::{DefaultLoaderFactory, LoaderFactory, LoaderPolicy};
use crate::loader::parser::SchemaParser;
use serde_json::Value;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use url::Url;

/// Something that can produce a parsed JSON document
pub trait JsonLoader {
    /// The absolute locator this loader fetches from, if it has one
    fn locator(&self) -> Option<&str>;

    /// Fetch and parse the document
    fn load_json(&self) -> LoaderResult<Value>;
}

/// Loads `file://` locators from the local filesystem
#[derive(Debug, Clone)]
pub struct FileLoader {
    locator: String,
    path: PathBuf,
}

impl FileLoader {
    /// Create a loader for a `file://` URL
    pub fn new(locator: &str) -> LoaderResult<Self> {
        let url = Url::parse(locator)
            .map_err(|e| LoaderError::invalid_locator(locator, e.to_string()))?;
        if url.scheme() != "file" {
            return Err(LoaderError::unsupported_scheme(locator, url.scheme()));
        }
        let path = url
            .to_file_path()
            .map_err(|_| LoaderError::invalid_locator(locator, "Not a local file path"))?;

        Ok(Self {
            locator: locator.to_string(),
            path,
        })
    }

    /// Create a loader for a filesystem path, made absolute against the
    /// current directory when relative
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| LoaderError::io_error(path.display().to_string(), e))?
                .join(path)
        };
        let url = Url::from_file_path(&absolute).map_err(|_| {
            LoaderError::invalid_locator(absolute.display().to_string(), "Cannot build a file URL")
        })?;

        Ok(Self {
            locator: url.to_string(),
            path: absolute,
        })
    }

    /// The filesystem path backing this loader
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl JsonLoader for FileLoader {
    fn locator(&self) -> Option<&str> {
        Some(&self.locator)
    }

    fn load_json(&self) -> LoaderResult<Value> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| LoaderError::io_error(self.locator.as_str(), e))?;
        SchemaParser::new().parse_with_fallback(&content, &self.locator)
    }
}

/// A document given as literal JSON or YAML text
#[derive(Debug, Clone)]
pub struct StringLoader {
    content: String,
}

impl StringLoader {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl JsonLoader for StringLoader {
    fn locator(&self) -> Option<&str> {
        None
    }

    fn load_json(&self) -> LoaderResult<Value> {
        SchemaParser::new().parse_with_fallback(&self.content, "<string>")
    }
}

/// A document buffered from a byte stream
///
/// Fill it by draining a reader with [`BufferLoader::from_reader`] or by
/// writing into it through its [`Write`] implementation.
#[derive(Debug, Clone, Default)]
pub struct BufferLoader {
    buffer: Vec<u8>,
}

impl BufferLoader {
    /// Create an empty buffer to be written into
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain `reader` into a new buffer
    pub fn from_reader<R: Read>(mut reader: R) -> LoaderResult<Self> {
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|e| LoaderError::io_error("<reader>", e))?;
        Ok(Self { buffer })
    }

    /// The buffered bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl Write for BufferLoader {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl JsonLoader for BufferLoader {
    fn locator(&self) -> Option<&str> {
        None
    }

    fn load_json(&self) -> LoaderResult<Value> {
        let content = std::str::from_utf8(&self.buffer).map_err(|e| {
            LoaderError::io_error("<reader>", io::Error::new(io::ErrorKind::InvalidData, e))
        })?;
        SchemaParser::new().parse_with_fallback(content, "<reader>")
    }
}

/// An already parsed document
#[derive(Debug, Clone)]
pub struct ValueLoader {
    value: Value,
}

impl ValueLoader {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl JsonLoader for ValueLoader {
    fn locator(&self) -> Option<&str> {
        None
    }

    fn load_json(&self) -> LoaderResult<Value> {
        Ok(self.value.clone())
    }
}

/// A document addressed by an absolute locator
///
/// A compiler fetches it through the session's loader factory. Calling
/// [`JsonLoader::load_json`] directly goes through a [`DefaultLoaderFactory`]
/// bound to this loader's policy.
#[derive(Debug, Clone)]
pub struct ReferenceLoader {
    locator: String,
    policy: LoaderPolicy,
}

impl ReferenceLoader {
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            policy: LoaderPolicy::default(),
        }
    }

    /// Restrict direct loads to the schemes `policy` allows
    pub fn with_policy(mut self, policy: LoaderPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl JsonLoader for ReferenceLoader {
    fn locator(&self) -> Option<&str> {
        Some(&self.locator)
    }

    fn load_json(&self) -> LoaderResult<Value> {
        DefaultLoaderFactory::with_policy(self.policy.clone())
            .create(&self.locator)?
            .load_json()
    }
}

/// Fetches `http`/`https` locators with a blocking client
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpLoader {
    locator: String,
}

#[cfg(feature = "http")]
impl HttpLoader {
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
        }
    }
}

#[cfg(feature = "http")]
impl JsonLoader for HttpLoader {
    fn locator(&self) -> Option<&str> {
        Some(&self.locator)
    }

    fn load_json(&self) -> LoaderResult<Value> {
        let response = reqwest::blocking::get(&self.locator)
            .map_err(|e| LoaderError::http_error(self.locator.as_str(), e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LoaderError::not_found(self.locator.as_str()));
        }
        if !status.is_success() {
            return Err(LoaderError::http_error(
                self.locator.as_str(),
                format!("HTTP status {}", status),
            ));
        }

        let body = response
            .text()
            .map_err(|e| LoaderError::http_error(self.locator.as_str(), e.to_string()))?;
        SchemaParser::new().parse_with_fallback(&body, &self.locator)
    }
}
