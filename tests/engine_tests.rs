//! Engine properties that hold for every schema and document

use registry_schemas::{validate, ConstraintKind, SchemaRegistry};
use serde_json::{json, Value};

fn fixture(name: &str) -> Value {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn samples() -> Vec<(Value, &'static str, &'static str)> {
    vec![
        (fixture("mhr/note.json"), "note", "mhr"),
        (fixture("mhr/registration.json"), "registration", "mhr"),
        (fixture("mhr/address.json"), "address", "mhr"),
        (fixture("ppr/vehicleCollateral.json"), "vehicleCollateral", "ppr"),
        (json!({}), "note", "mhr"),
        (json!([1, 2, 3]), "registration", "mhr"),
        (json!(null), "vehicleCollateral", "ppr"),
        (json!({"type": "MH", "year": "old"}), "vehicleCollateral", "ppr"),
    ]
}

#[test]
fn test_validity_matches_error_list() {
    for (document, document_type, domain) in samples() {
        let result = validate(&document, document_type, domain).unwrap();
        assert_eq!(result.is_valid(), result.errors().is_empty(), "{}/{}", domain, document_type);
    }
}

#[test]
fn test_validation_is_idempotent() {
    for (document, document_type, domain) in samples() {
        let first = validate(&document, document_type, domain).unwrap();
        let second = validate(&document, document_type, domain).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_removing_required_property_reports_its_path() {
    let registry = SchemaRegistry::embedded().unwrap();

    for (document, document_type, domain) in samples().into_iter().take(4) {
        let schema = registry.load(domain, document_type).unwrap();
        for name in schema.required() {
            let mut data = document.clone();
            data.as_object_mut().unwrap().remove(name);

            let result = registry.validate(&data, document_type, domain).unwrap();
            let expected = format!("$.{}", name);
            assert!(
                result
                    .errors()
                    .iter()
                    .any(|e| e.kind == ConstraintKind::Required && e.locator() == expected),
                "{}/{} without {}",
                domain,
                document_type,
                name
            );
        }
    }
}

#[test]
fn test_length_boundaries() {
    // documentType: minLength 1, maxLength 20
    let at_max = "X".repeat(20);
    let over_max = "X".repeat(21);
    let cases = [("", false), ("A", true), (at_max.as_str(), true), (over_max.as_str(), false)];
    for (value, valid) in cases {
        let mut note = fixture("mhr/note.json");
        note["documentType"] = json!(value);
        assert_eq!(validate(&note, "note", "mhr").unwrap().is_valid(), valid, "{:?}", value);
    }
}

#[test]
fn test_length_counts_characters_not_bytes() {
    let mut note = fixture("mhr/note.json");
    note["documentType"] = json!("É".repeat(20));
    assert!(validate(&note, "note", "mhr").unwrap().is_valid());
}

#[test]
fn test_enum_membership_is_exact() {
    for (status, valid) in [("R", true), ("E", true), ("C", true), ("D", true), ("r", false), ("RE", false), ("", false)] {
        let mut data = fixture("mhr/registration.json");
        data["status"] = json!(status);
        assert_eq!(validate(&data, "registration", "mhr").unwrap().is_valid(), valid, "{:?}", status);
    }
}

#[test]
fn test_one_of_matched_twice_fails() {
    let mut note = fixture("mhr/note.json");
    note["givingNoticeParty"]["businessName"] = json!("BUSINESS LTD.");

    let result = validate(&note, "note", "mhr").unwrap();
    assert_eq!(result.errors().len(), 1);
    let error = &result.errors()[0];
    assert_eq!(error.kind, ConstraintKind::OneOf);
    assert_eq!(error.locator(), "$.givingNoticeParty");
    assert!(error.message.contains("0, 1"), "{}", error.message);
}

#[test]
fn test_wrong_root_kind_is_one_error() {
    let result = validate(&json!("a note"), "note", "mhr").unwrap();
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].message, "$: expected object, found string");
}

#[test]
fn test_errors_serialize_for_reporting() {
    let result = validate(&json!({}), "address", "mhr").unwrap();
    let rendered = serde_json::to_value(&result).unwrap();
    assert_eq!(rendered["valid"], json!(false));
    assert_eq!(rendered["errors"][0]["kind"], json!("required"));
    assert_eq!(rendered["errors"][0]["path"], json!(["street"]));
}
