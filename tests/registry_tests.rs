//! Directory-backed registries, configuration and schema errors

use registry_schemas::graph::LoadConfig;
use registry_schemas::{ConstraintKind, SchemaError, SchemaRegistry, ValidationOptions, ValidatorConfig};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn catalog(files: &[(&str, serde_json::Value)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, serde_json::to_string_pretty(content).unwrap()).unwrap();
    }
    dir
}

fn open(dir: &Path) -> registry_schemas::Result<SchemaRegistry> {
    SchemaRegistry::from_directory(dir, &LoadConfig::default(), ValidationOptions::default())
}

#[test]
fn test_relative_and_cross_domain_references() {
    let dir = catalog(&[
        (
            "mhr/address.json",
            json!({"$id": "https://schemas.registry.local/mhr/address", "type": "object", "required": ["city"]}),
        ),
        (
            "ppr/debtor.json",
            json!({
                "type": "object",
                "properties": {
                    "address": {"$ref": "../mhr/address"},
                    "mailing": {"$ref": "https://schemas.registry.local/mhr/address.json"}
                }
            }),
        ),
    ]);
    let registry = open(dir.path()).unwrap();
    let result = registry
        .validate(&json!({"address": {}, "mailing": {}}), "debtor", "ppr")
        .unwrap();
    let locators: Vec<String> = result.errors().iter().map(|e| e.locator()).collect();
    assert_eq!(locators, vec!["$.address.city", "$.mailing.city"]);
}

#[test]
fn test_unknown_schema_suggests_registered_key() {
    let dir = catalog(&[("ppr/vehicleCollateral.json", json!({"type": "object"}))]);
    let registry = open(dir.path()).unwrap();

    let err = registry.load("ppr", "vehicle").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Schema not found: ppr/vehicle (did you mean ppr/vehicleCollateral?)"
    );
}

#[test]
fn test_dangling_reference_fails_at_load() {
    let dir = catalog(&[(
        "mhr/note.json",
        json!({"properties": {"party": {"$ref": "party"}}}),
    )]);
    let registry = open(dir.path()).unwrap();
    assert!(matches!(registry.load("mhr", "note"), Err(SchemaError::Resolution { .. })));
}

#[test]
fn test_cyclic_reference_fails_at_load() {
    let dir = catalog(&[
        ("mhr/a.json", json!({"properties": {"b": {"$ref": "b"}}})),
        ("mhr/b.json", json!({"properties": {"a": {"$ref": "a#"}}})),
    ]);
    let registry = open(dir.path()).unwrap();

    assert_eq!(registry.cycles().len(), 1);
    match registry.load("mhr", "a") {
        Err(SchemaError::Resolution { reason, .. }) => assert!(reason.contains("cyclic"), "{}", reason),
        other => panic!("Expected Resolution, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_empty_one_of_is_malformed() {
    let dir = catalog(&[("mhr/party.json", json!({"oneOf": []}))]);
    match open(dir.path()) {
        Err(SchemaError::Malformed { location, .. }) => assert!(location.contains("mhr/party"), "{}", location),
        other => panic!("Expected Malformed, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_domain_filter() {
    let dir = catalog(&[
        ("mhr/note.json", json!({"type": "object"})),
        ("ppr/debtor.json", json!({"type": "object"})),
    ]);
    let load = LoadConfig {
        domains: vec!["ppr".to_string()],
    };
    let registry = SchemaRegistry::from_directory(dir.path(), &load, ValidationOptions::default()).unwrap();
    assert_eq!(registry.len(), 1);
    assert!(registry.load("mhr", "note").is_err());
}

#[test]
fn test_format_checks_can_be_disabled() {
    let dir = catalog(&[(
        "mhr/note.json",
        json!({"properties": {"createDateTime": {"type": "string", "format": "date-time"}}}),
    )]);
    let document = json!({"createDateTime": "soon"});

    let strict = open(dir.path()).unwrap();
    assert!(!strict.validate(&document, "note", "mhr").unwrap().is_valid());

    let lenient =
        SchemaRegistry::from_directory(dir.path(), &LoadConfig::default(), ValidationOptions { check_formats: false })
            .unwrap();
    assert!(lenient.validate(&document, "note", "mhr").unwrap().is_valid());
}

#[test]
fn test_preload_surfaces_broken_schema_at_construction() {
    let dir = catalog(&[(
        "mhr/note.json",
        json!({"properties": {"party": {"$ref": "party"}}}),
    )]);

    let mut config = ValidatorConfig::default();
    config.registry.schema_dir = Some(dir.path().to_path_buf());
    assert!(SchemaRegistry::from_config(&config).is_ok());

    config.registry.preload = true;
    assert!(matches!(SchemaRegistry::from_config(&config), Err(SchemaError::Resolution { .. })));
}

#[test]
fn test_bundle_hash_tracks_catalog_content() {
    let first = catalog(&[("mhr/note.json", json!({"type": "object"}))]);
    let second = catalog(&[("mhr/note.json", json!({"type": "object", "required": ["documentType"]}))]);

    let a = open(first.path()).unwrap().bundle_hash();
    let b = open(second.path()).unwrap().bundle_hash();
    assert_ne!(a, b);
    assert_eq!(a, open(first.path()).unwrap().bundle_hash());
}

#[test]
fn test_sibling_conditionals_run_after_direct_constraints() {
    let conditionals = |first: (&str, &str), second: (&str, &str)| {
        json!({
            "allOf": [
                {"if": {"required": [first.0]}, "then": {"required": [first.1]}},
                {"if": {"required": [second.0]}, "then": {"required": [second.1]}}
            ],
            "type": "object",
            "properties": {"a": {"type": "string", "maxLength": 2}}
        })
    };
    let dir = catalog(&[
        ("mhr/forward.json", conditionals(("p", "x"), ("q", "y"))),
        ("mhr/reversed.json", conditionals(("q", "y"), ("p", "x"))),
    ]);
    let registry = open(dir.path()).unwrap();
    let document = json!({"a": "abc", "p": true, "q": true});

    let result = registry.validate(&document, "forward", "mhr").unwrap();
    let found: Vec<(String, ConstraintKind)> = result.errors().iter().map(|e| (e.locator(), e.kind)).collect();
    assert_eq!(
        found,
        vec![
            ("$.a".to_string(), ConstraintKind::MaxLength),
            ("$.x".to_string(), ConstraintKind::Required),
            ("$.y".to_string(), ConstraintKind::Required),
        ]
    );

    let result = registry.validate(&document, "reversed", "mhr").unwrap();
    let locators: Vec<String> = result.errors().iter().map(|e| e.locator()).collect();
    assert_eq!(locators, vec!["$.a", "$.y", "$.x"]);
}

#[test]
fn test_unrecognised_keywords_fail_at_construction() {
    let schemas = [
        json!({"type": "array", "prefixItems": [{"type": "string"}]}),
        json!({"properties": {"n": {"type": "string", "maxlength": 2}}}),
        json!({"properties": {"n": {"$id": "name", "type": "string"}}}),
    ];
    for schema in schemas {
        let dir = catalog(&[("mhr/note.json", schema.clone())]);
        assert!(matches!(open(dir.path()), Err(SchemaError::Malformed { .. })), "{}", schema);
    }
}

#[test]
fn test_property_counts_are_enforced() {
    let dir = catalog(&[
        ("mhr/single.json", json!({"type": "object", "maxProperties": 1})),
        ("mhr/pair.json", json!({"minProperties": 2})),
    ]);
    let registry = open(dir.path()).unwrap();

    let result = registry.validate(&json!({"a": 1, "b": 2}), "single", "mhr").unwrap();
    assert_eq!(result.errors()[0].kind, ConstraintKind::MaxProperties);
    assert!(registry.validate(&json!({"a": 1}), "single", "mhr").unwrap().is_valid());

    let result = registry.validate(&json!({}), "pair", "mhr").unwrap();
    assert_eq!(result.errors()[0].kind, ConstraintKind::MinProperties);
}
