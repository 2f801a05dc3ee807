//! Shared utilities for command handlers

use crate::config::Config;
use crate::error::{Error, Result};
use schemapool_core::{BufferLoader, CompilerConfig, FileLoader, JsonLoader, ReferenceLoader};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the root schema comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// Read from standard input
    Stdin,
    /// An absolute URL such as `http://...` or `file:///...`
    Locator(String),
    /// A filesystem path
    Path(PathBuf),
}

impl SchemaSource {
    /// Classify a `SOURCE` argument; relative paths are joined onto `base_dir`
    pub fn parse(source: &str, base_dir: Option<&Path>) -> Self {
        if source == "-" {
            return Self::Stdin;
        }
        if source.contains("://") {
            return Self::Locator(source.to_string());
        }

        let path = Path::new(source);
        match base_dir {
            Some(dir) if path.is_relative() => Self::Path(dir.join(path)),
            _ => Self::Path(path.to_path_buf()),
        }
    }

    /// Build the loader for this source
    pub fn loader(&self) -> Result<Box<dyn JsonLoader>> {
        match self {
            Self::Stdin => {
                debug!("Reading schema from stdin");
                Ok(Box::new(BufferLoader::from_reader(io::stdin().lock())?))
            }
            Self::Locator(locator) => Ok(Box::new(ReferenceLoader::new(locator.clone()))),
            Self::Path(path) => {
                if !path.exists() {
                    return Err(Error::FileNotFound { path: path.clone() });
                }
                Ok(Box::new(FileLoader::from_path(path)?))
            }
        }
    }
}

/// Flags that override the configured compiler settings
#[derive(Debug, Clone, Copy, Default)]
pub struct CompilerOverrides {
    pub no_meta_check: bool,
    pub lazy: bool,
    pub offline: bool,
}

/// Apply command-line overrides on top of the loaded configuration
pub fn compiler_config(config: &Config, overrides: CompilerOverrides) -> CompilerConfig {
    let mut compiler = config.compiler.clone();
    if overrides.no_meta_check {
        compiler.validate_meta_schema = false;
    }
    if overrides.lazy {
        compiler.resolve_eagerly = false;
    }
    if overrides.offline {
        compiler.loaders.allow_http = false;
    }
    compiler
}
