//! Document parsing for YAML and JSON sources
//!
//! Copyright (c) 2025 Schemapool Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::Value;

/// Supported text formats for schema documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from the extension at the end of a path or URL path
    pub fn from_extension(path: &str) -> Option<Self> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Schema document parser with support for multiple formats
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaParser;

impl SchemaParser {
    /// Create a new schema parser
    pub fn new() -> Self {
        Self
    }

    /// Parse content with an explicit format
    pub fn parse_content(&self, content: &str, format: Format, locator: &str) -> LoaderResult<Value> {
        match format {
            Format::Yaml => self.parse_yaml(content, locator),
            Format::Json => self.parse_json(content, locator),
        }
    }

    /// Parse YAML content
    pub fn parse_yaml(&self, content: &str, locator: &str) -> LoaderResult<Value> {
        // Parse as YAML first to surface YAML-specific errors
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| LoaderError::yaml_parse_error(locator, e))?;

        serde_json::to_value(yaml_value).map_err(|e| LoaderError::json_parse_error(locator, e))
    }

    /// Parse JSON content
    pub fn parse_json(&self, content: &str, locator: &str) -> LoaderResult<Value> {
        serde_json::from_str(content).map_err(|e| LoaderError::json_parse_error(locator, e))
    }

    /// Parse content using the format hinted by the locator, falling back to
    /// JSON and then YAML when there is no usable hint
    pub fn parse_with_fallback(&self, content: &str, locator: &str) -> LoaderResult<Value> {
        if let Some(format) = Format::from_extension(strip_query_and_fragment(locator)) {
            return self.parse_content(content, format, locator);
        }

        // JSON first (stricter format)
        match self.parse_json(content, locator) {
            Ok(value) => Ok(value),
            Err(json_error) => self.parse_yaml(content, locator).map_err(|_| json_error),
        }
    }
}

fn strip_query_and_fragment(locator: &str) -> &str {
    let end = locator.find(['?', '#']).unwrap_or(locator.len());
    &locator[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_extension("schema.json"), Some(Format::Json));
        assert_eq!(Format::from_extension("dir/schema.YAML"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("file:///a/b.yml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("schema.txt"), None);
        assert_eq!(Format::from_extension("dir.json/schema"), None);
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let parser = SchemaParser::new();

        let value = parser
            .parse_yaml("type: object\nproperties:\n  name:\n    type: string\n", "inline")
            .unwrap();
        assert_eq!(value["properties"]["name"]["type"], "string");

        let value = parser.parse_json(r#"{"type": "integer"}"#, "inline").unwrap();
        assert_eq!(value["type"], "integer");

        assert!(matches!(
            parser.parse_json("{", "inline"),
            Err(LoaderError::JsonParse { .. })
        ));
    }

    #[test]
    fn test_parse_with_fallback() {
        let parser = SchemaParser::new();

        // Extension hint wins
        let value = parser
            .parse_with_fallback("type: string", "http://example.com/a.yaml#/x")
            .unwrap();
        assert_eq!(value["type"], "string");

        // No hint: JSON then YAML
        let value = parser.parse_with_fallback(r#"{"a": 1}"#, "inline").unwrap();
        assert_eq!(value["a"], 1);
        let value = parser.parse_with_fallback("a: 1", "inline").unwrap();
        assert_eq!(value["a"], 1);

        // Reports the JSON error when both fail
        assert!(matches!(
            parser.parse_with_fallback("{: [", "inline"),
            Err(LoaderError::JsonParse { .. })
        ));
    }
}
