//! Integration tests for the document pool
//!
//! These tests exercise the pool through its public API with an instrumented
//! loader factory, covering caching, canonicalization and identifier lookup.


use schemapool_core::pool::{PoolError, SchemaPool};
use schemapool_core::reference::JsonReference;
use serde_json::{json, Value};
use test_support::{count, CountingFactory, LOCATION_INDEPENDENT_SCHEMA};

fn reference(s: &str) -> JsonReference {
    JsonReference::parse(s).unwrap()
}

fn root_document() -> Value {
    serde_json::from_str(LOCATION_INDEPENDENT_SCHEMA).unwrap()
}

#[cfg(test)]
mod caching {
    use super::*;

    #[test]
    fn test_second_resolve_is_a_cache_hit() {
        let factory = CountingFactory::new().with_document(
            "http://example.com/a.json",
            json!({"definitions": {"x": {"type": "string"}}}),
        );
        let requests = factory.requests();
        let mut pool = SchemaPool::new(factory);

        for raw in ["http://example.com/a.json", "http://example.com/a.json#/definitions/x"] {
            let first = pool.resolve(&reference(raw)).unwrap();
            let second = pool.resolve(&reference(raw)).unwrap();
            assert_eq!(first, second, "{}", raw);
        }

        assert_eq!(count(&requests, "http://example.com/a.json"), 1);
        assert_eq!(pool.stats().loads, 1);
        assert_eq!(pool.stats().exact_hits, 2);
    }

    #[test]
    fn test_fetch_once_for_sibling_fragments() {
        let factory = CountingFactory::new()
            .with_document(
                "http://example.com/root.json",
                json!({
                    "properties": {
                        "a": {"$ref": "shared.json#/definitions/a"},
                        "b": {"$ref": "shared.json#/definitions/b"}
                    }
                }),
            )
            .with_document(
                "http://example.com/shared.json",
                json!({"definitions": {"a": {"type": "string"}, "b": {"type": "integer"}}}),
            );
        let requests = factory.requests();
        let mut pool = SchemaPool::new(factory);

        let root = pool.resolve(&reference("http://example.com/root.json")).unwrap();
        for property in ["a", "b"] {
            let target = root["properties"][property]["$ref"].as_str().unwrap();
            pool.resolve(&reference(target)).unwrap();
        }

        assert_eq!(count(&requests, "http://example.com/shared.json"), 1);
        assert_eq!(pool.stats().pointer_hits, 1);
        assert!(pool.contains("http://example.com/shared.json#/definitions/a"));
        assert!(pool.contains("http://example.com/shared.json#/definitions/b"));
    }

    #[test]
    fn test_fetched_document_cached_under_base_only_once() {
        let factory = CountingFactory::new().with_document(
            "http://example.com/a.json",
            json!({"definitions": {"x": {"type": "string"}}}),
        );
        let mut pool = SchemaPool::new(factory);

        pool.resolve(&reference("http://example.com/a.json#/definitions/x")).unwrap();

        assert_eq!(
            pool.locators(),
            vec!["http://example.com/a.json", "http://example.com/a.json#/definitions/x"]
        );
        assert_eq!(
            *pool.get("http://example.com/a.json").unwrap(),
            json!({"definitions": {"x": {"type": "string"}}})
        );
    }
}

#[cfg(test)]
mod identifiers {
    use super::*;

    #[test]
    fn test_location_independent_resolution_without_fetch() {
        let factory = CountingFactory::new();
        let requests = factory.requests();
        let mut pool = SchemaPool::new(factory);
        let mut document = root_document();
        pool.parse_document(&mut document, &JsonReference::empty());

        let foo = pool.resolve(&reference("http://example.com/root.json#foo")).unwrap();
        assert_eq!(*foo, json!({"$id": "#foo", "type": "integer"}));

        let bar = pool.resolve(&reference("http://example.com/other.json#bar")).unwrap();
        assert_eq!(bar["allOf"], json!([false]));

        let inner = pool.resolve(&reference("http://example.com/t/inner.json")).unwrap();
        assert_eq!(inner["type"], "string");

        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn test_base_plus_pointer_fallback() {
        let mut pool = SchemaPool::new(CountingFactory::new());
        let mut document = root_document();
        pool.parse_document(&mut document, &JsonReference::empty());

        let key = "http://example.com/root.json#/definitions/C";
        assert!(!pool.contains(key));

        let c = pool.resolve(&reference(key)).unwrap();
        assert_eq!(*c, json!({"$ref": "http://example.com/other.json#bar"}));
        assert!(pool.contains(key));
        assert_eq!(pool.stats().pointer_hits, 1);

        pool.resolve(&reference(key)).unwrap();
        assert_eq!(pool.stats().pointer_hits, 1);
        assert_eq!(pool.stats().exact_hits, 1);
    }

    #[test]
    fn test_registered_subschemas_carry_canonical_refs() {
        let mut pool = SchemaPool::new(CountingFactory::new());
        let mut document = root_document();
        pool.parse_document(&mut document, &JsonReference::empty());

        assert_eq!(document["$ref"], "http://example.com/root.json#/definitions/C");
        let root = pool.resolve(&reference("http://example.com/root.json")).unwrap();
        assert_eq!(root["$ref"], "http://example.com/root.json#/definitions/C");
    }

    #[test]
    fn test_walker_registrations_win_over_pointer_extraction() {
        let factory = CountingFactory::new().with_document(
            "http://example.com/root.json",
            json!({
                "definitions": {
                    "moved": {"$id": "http://example.com/root.json#/definitions/elsewhere", "type": "null"},
                    "elsewhere": {"type": "boolean"}
                }
            }),
        );
        let mut pool = SchemaPool::new(factory);

        let target = pool
            .resolve(&reference("http://example.com/root.json#/definitions/elsewhere"))
            .unwrap();
        assert_eq!(target["type"], "null");
    }
}

#[cfg(test)]
mod failures {
    use super::*;

    #[test]
    fn test_canonical_rejection_skips_loader() {
        let factory = CountingFactory::new();
        let requests = factory.requests();
        let mut pool = SchemaPool::new(factory);

        for raw in ["definitions.json#/a", "#/definitions/a", "../up.json"] {
            let err = pool.resolve(&reference(raw)).unwrap_err();
            assert!(matches!(err, PoolError::NotCanonical { .. }));
        }
        assert!(requests.borrow().is_empty());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_missing_pointer_is_a_hard_failure() {
        let factory = CountingFactory::new()
            .with_document("http://example.com/a.json", json!({"definitions": {}}));
        let mut pool = SchemaPool::new(factory);

        let err = pool
            .resolve(&reference("http://example.com/a.json#/definitions/missing"))
            .unwrap_err();
        assert!(matches!(err, PoolError::Reference(_)));
        assert!(err.to_string().contains("/definitions/missing"));
        assert!(!pool.contains("http://example.com/a.json#/definitions/missing"));
    }

    #[test]
    fn test_loader_failure_propagated_verbatim() {
        let mut pool = SchemaPool::new(CountingFactory::new());
        let err = pool.resolve(&reference("http://example.com/absent.json")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Document not found: 'http://example.com/absent.json'");
    }

    #[test]
    fn test_malformed_refs_are_soft_warnings() {
        let factory = CountingFactory::new().with_document(
            "http://example.com/a.json",
            json!({"properties": {"p": {"$ref": "http://[::1"}}}),
        );
        let mut pool = SchemaPool::new(factory);

        let document = pool.resolve(&reference("http://example.com/a.json")).unwrap();
        assert_eq!(document["properties"]["p"]["$ref"], "http://[::1");
        assert_eq!(pool.warnings().len(), 1);
        assert_eq!(pool.warnings()[0].keyword, "$ref");
    }
}
