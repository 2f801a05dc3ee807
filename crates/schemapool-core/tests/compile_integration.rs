//! End-to-end compilation tests
//!
//! Each test feeds a root loader to the compiler and checks the resulting
//! schema, the pool it populated and the errors it collected.


use schemapool_core::{
    BufferLoader, CompileError, CompilerConfig, FileLoader, InMemoryLoaderFactory, JsonLoader,
    JsonReference, ReferenceLoader, SchemaCompiler, StringLoader, ValueLoader,
};
use serde_json::json;
use std::fs;
use std::io::Write;
use tempfile::tempdir;
use test_support::{
    count, CountingFactory, CIRCULAR_SCHEMA, INVALID_PATTERN_SCHEMA, LOCATION_INDEPENDENT_SCHEMA,
    REF_PROPERTY_SCHEMA, SIMPLE_SCHEMA,
};
use url::Url;

fn file_url(path: &std::path::Path) -> String {
    Url::from_file_path(path).unwrap().to_string()
}

#[cfg(test)]
mod loaders {
    use super::*;

    fn all_loaders(content: &str) -> Vec<Box<dyn JsonLoader>> {
        let reader = BufferLoader::from_reader(content.as_bytes()).unwrap();
        let mut writer = BufferLoader::new();
        writer.write_all(content.as_bytes()).unwrap();

        vec![
            Box::new(StringLoader::new(content)),
            Box::new(reader),
            Box::new(writer),
        ]
    }

    #[test]
    fn test_every_loader_compiles() {
        for loader in all_loaders(SIMPLE_SCHEMA) {
            let compiled = SchemaCompiler::new().compile(loader.as_ref()).unwrap();
            assert_eq!(compiled.root()["title"], "Example Schema");
        }
    }

    #[test]
    fn test_every_loader_rejects_invalid_pattern() {
        for loader in all_loaders(INVALID_PATTERN_SCHEMA) {
            let errors = SchemaCompiler::new().compile(loader.as_ref()).unwrap_err();
            assert!(errors
                .iter()
                .any(|error| matches!(error, CompileError::InvalidSchema { .. })));
        }
    }

    #[test]
    fn test_unparseable_root_is_a_load_error() {
        let errors = SchemaCompiler::new()
            .compile(&StringLoader::new("{\"type\": "))
            .unwrap_err();
        assert!(matches!(errors.errors[0], CompileError::RootLoad { .. }));
    }
}

#[cfg(test)]
mod references {
    use super::*;

    #[test]
    fn test_circular_definitions_terminate() {
        let compiled = SchemaCompiler::new()
            .compile(&StringLoader::new(CIRCULAR_SCHEMA))
            .unwrap();

        let mut followed = compiled.references().to_vec();
        followed.sort();
        assert_eq!(
            followed,
            vec!["#/definitions/game", "#/definitions/player", "#/definitions/user"]
        );
    }

    #[test]
    fn test_cycle_across_documents() {
        let factory = CountingFactory::new()
            .with_document("http://example.com/a.json", json!({"$ref": "b.json"}))
            .with_document("http://example.com/b.json", json!({"$ref": "c.json"}))
            .with_document("http://example.com/c.json", json!({"$ref": "a.json"}));
        let requests = factory.requests();

        let mut compiled = SchemaCompiler::new()
            .compile_with_factory(&ReferenceLoader::new("http://example.com/a.json"), factory)
            .unwrap();

        for name in ["a", "b", "c"] {
            assert_eq!(count(&requests, &format!("http://example.com/{}.json", name)), 1);
        }
        assert_eq!(*compiled.root(), json!({"$ref": "http://example.com/b.json"}));
        assert_eq!(
            compiled.references(),
            [
                "http://example.com/b.json",
                "http://example.com/c.json",
                "http://example.com/a.json"
            ]
        );

        let expected = [("a", "b"), ("b", "c"), ("c", "a")];
        for (name, next) in expected {
            let document = compiled.resolve(&format!("{}.json", name)).unwrap();
            assert_eq!(*document, json!({"$ref": format!("http://example.com/{}.json", next)}));
        }
        for name in ["a", "b", "c"] {
            assert_eq!(count(&requests, &format!("http://example.com/{}.json", name)), 1);
        }
    }

    #[test]
    fn test_property_names_are_not_directives() {
        let compiled = SchemaCompiler::new()
            .compile(&StringLoader::new(REF_PROPERTY_SCHEMA))
            .unwrap();

        let root = compiled.root();
        assert_eq!(root["properties"]["$ref"]["const"]["$ref"], "hello.world");
        assert_eq!(root["definitions"]["$ref"]["const"]["$ref"], "hello.world");
        assert_eq!(
            root["properties"]["const"]["$ref"],
            "http://localhost/schema.json#/definitions/$ref"
        );
        assert_eq!(compiled.references(), ["http://localhost/schema.json#/definitions/$ref"]);
        assert!(compiled.pool().contains("http://localhost/foo.json"));
        assert_eq!(compiled.pool().stats().loads, 0);
    }

    #[test]
    fn test_location_independent_identifiers() {
        let compiled = SchemaCompiler::new()
            .compile(&StringLoader::new(LOCATION_INDEPENDENT_SCHEMA))
            .unwrap();

        assert_eq!(compiled.root_reference().to_string(), "http://example.com/root.json");
        assert_eq!(
            compiled.references(),
            [
                "http://example.com/root.json#/definitions/C",
                "http://example.com/other.json#bar"
            ]
        );
        let bar = compiled.pool().get("http://example.com/other.json#bar").unwrap();
        assert_eq!(bar["allOf"], json!([false]));
        assert_eq!(compiled.pool().stats().loads, 0);
    }

    #[test]
    fn test_in_memory_bundle_is_sandboxed() {
        let factory = InMemoryLoaderFactory::new()
            .with_document("http://example.com/root.json", json!({"$ref": "leaf.json"}));

        let errors = SchemaCompiler::new()
            .compile_with_factory(&ReferenceLoader::new("http://example.com/root.json"), factory)
            .unwrap_err();

        match &errors.errors[0] {
            CompileError::Unresolved {
                reference, referrer, ..
            } => {
                assert_eq!(reference, "http://example.com/leaf.json");
                assert_eq!(referrer, "http://example.com/root.json");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_malformed_ref_surfaces_at_compile_time() {
        let errors = SchemaCompiler::new()
            .compile(&ValueLoader::new(json!({"items": {"$ref": "http://[broken"}})))
            .unwrap_err();
        assert!(errors.iter().any(|error| matches!(
            error,
            CompileError::Unresolved { reference, .. } if reference == "http://[broken"
        )));
    }
}

#[cfg(test)]
mod files {
    use super::*;

    #[test]
    fn test_fragment_locator() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fragment_schema.json");
        fs::write(
            &path,
            r#"{"definitions": {"x": {"type": "integer"}, "y": {"type": "string"}}}"#,
        )
        .unwrap();

        let locator = format!("{}#/definitions/x", file_url(&path));
        let compiled = SchemaCompiler::new()
            .compile(&ReferenceLoader::new(locator.as_str()))
            .unwrap();

        assert_eq!(*compiled.root(), json!({"type": "integer"}));
        assert_eq!(compiled.root_reference().to_string(), locator);
    }

    #[test]
    fn test_relative_refs_between_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("common")).unwrap();
        fs::write(
            dir.path().join("root.json"),
            r##"{"properties": {"id": {"$ref": "common/types.yaml#/definitions/id"}}}"##,
        )
        .unwrap();
        fs::write(
            dir.path().join("common").join("types.yaml"),
            "definitions:\n  id:\n    $ref: '#/definitions/uuid'\n  uuid:\n    type: string\n    format: uuid\n",
        )
        .unwrap();

        let loader = FileLoader::from_path(&dir.path().join("root.json")).unwrap();
        let compiled = SchemaCompiler::new().compile(&loader).unwrap();

        let types = file_url(&dir.path().join("common").join("types.yaml"));
        assert_eq!(
            compiled.references(),
            [
                format!("{}#/definitions/id", types),
                format!("{}#/definitions/uuid", types)
            ]
        );
        assert_eq!(compiled.pool().stats().loads, 2);
    }

    #[test]
    fn test_relative_root_path_uses_base_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"type": "boolean"}"#).unwrap();

        let config = CompilerConfig {
            base_dir: Some(dir.path().to_path_buf()),
            ..CompilerConfig::default()
        };
        let compiled = SchemaCompiler::with_config(config)
            .compile(&ReferenceLoader::new("a.json"))
            .unwrap();

        assert_eq!(compiled.root()["type"], "boolean");
        let expected = JsonReference::from_file_path(&dir.path().join("a.json")).unwrap();
        assert_eq!(compiled.root_reference(), &expected);
    }

    #[test]
    fn test_file_scheme_can_be_disabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.json");
        fs::write(&path, "{}").unwrap();

        let mut config = CompilerConfig::default();
        config.loaders.allow_file = false;

        let errors = SchemaCompiler::with_config(config)
            .compile(&ReferenceLoader::new(file_url(&path)))
            .unwrap_err();
        assert!(matches!(errors.errors[0], CompileError::Root { .. }));
    }
}
