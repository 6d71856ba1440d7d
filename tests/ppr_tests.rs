//! Personal property registry: serial-numbered vehicle collateral

use registry_schemas::{validate, ConstraintKind};
use serde_json::{json, Value};

fn vehicle() -> Value {
    serde_json::from_str(include_str!("fixtures/ppr/vehicleCollateral.json")).unwrap()
}

fn is_valid(vehicle: &Value) -> bool {
    let (valid, errors) = validate(vehicle, "vehicleCollateral", "ppr").unwrap().into_parts();
    for error in &errors {
        println!("{}", error.message);
    }
    valid
}

const TOO_LONG: &str = "123434342XXXXXXXXXXXXXXXXXXXXXXXXXXX";

#[test]
fn test_vehicle_type() {
    let cases = [
        ("AC", true),
        ("AF", true),
        ("AP", true),
        ("BO", true),
        ("EV", true),
        ("MH", true),
        ("MV", true),
        ("OB", true),
        ("TR", true),
        ("XX", false),
    ];

    for (vehicle_type, valid) in cases {
        let mut data = vehicle();
        data["type"] = json!(vehicle_type);
        assert_eq!(is_valid(&data), valid, "type {}", vehicle_type);
    }
}

#[test]
fn test_serial_number() {
    let cases: [(&str, Option<&str>, Option<&str>, bool); 19] = [
        ("AC", Some("CFYXW"), None, true),
        ("AC", None, Some("123456"), false),
        ("AF", Some("12343424"), None, true),
        ("AF", None, Some("123456"), false),
        ("AP", Some("ABDCD12343"), None, true),
        ("AP", None, Some("123456"), false),
        ("BO", Some("13434X"), None, true),
        ("BO", None, Some("123456"), false),
        ("EV", Some("ASDVSS13424"), None, true),
        ("EV", None, Some("123456"), false),
        ("MH", Some("002434"), None, true),
        ("MH", None, Some("123456"), true),
        ("MH", None, None, false),
        ("MV", Some("242342342"), None, true),
        ("MV", None, Some("123456"), false),
        ("OB", Some("xsfsfd132"), None, true),
        ("OB", None, Some("123456"), false),
        ("TR", Some("TR32324"), None, true),
        ("TR", None, Some("123456"), false),
    ];

    for (vehicle_type, serial_number, mhr_number, valid) in cases {
        let mut data = vehicle();
        data["type"] = json!(vehicle_type);
        match serial_number {
            Some(serial) => data["serialNumber"] = json!(serial),
            None => {
                data.as_object_mut().unwrap().remove("serialNumber");
            }
        }
        if let Some(mhr) = mhr_number {
            data["manufacturedHomeRegistrationNumber"] = json!(mhr);
        }
        assert_eq!(
            is_valid(&data),
            valid,
            "type {} serial {:?} mhr {:?}",
            vehicle_type,
            serial_number,
            mhr_number
        );
    }
}

#[test]
fn test_invalid_vehicle_serial() {
    let mut data = vehicle();
    data["serialNumber"] = json!(TOO_LONG);

    let result = validate(&data, "vehicleCollateral", "ppr").unwrap();
    assert!(!result.is_valid());
    assert_eq!(
        result.errors()[0].message,
        "$.serialNumber: exceeds maximum length of 25 characters (found 36)"
    );
}

#[test]
fn test_invalid_vehicle_year() {
    let mut data = vehicle();
    data["year"] = json!(2220);

    let result = validate(&data, "vehicleCollateral", "ppr").unwrap();
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].kind, ConstraintKind::Maximum);
}

#[test]
fn test_invalid_vehicle_make_and_model() {
    for field in ["make", "model"] {
        let mut data = vehicle();
        data[field] = json!(TOO_LONG);
        assert!(!is_valid(&data), "{}", field);
    }
}

#[test]
fn test_invalid_vehicle_mhr_number() {
    let mut data = vehicle();
    data["manufacturedHomeRegistrationNumber"] = json!("123456789");

    let result = validate(&data, "vehicleCollateral", "ppr").unwrap();
    assert_eq!(result.errors()[0].kind, ConstraintKind::Pattern);
}

#[test]
fn test_invalid_vehicle_missing_type() {
    let mut data = vehicle();
    data.as_object_mut().unwrap().remove("type");

    let result = validate(&data, "vehicleCollateral", "ppr").unwrap();
    assert!(!result.is_valid());
    assert_eq!(result.errors()[0].locator(), "$.type");
}

#[test]
fn test_invalid_vehicle_missing_serial() {
    let mut data = vehicle();
    data.as_object_mut().unwrap().remove("serialNumber");

    let result = validate(&data, "vehicleCollateral", "ppr").unwrap();
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].message, "$.serialNumber: required property is missing");
}

#[test]
fn test_year_must_be_integral() {
    let mut data = vehicle();
    data["year"] = json!(2018.0);
    assert!(is_valid(&data));

    data["year"] = json!(2018.5);
    let result = validate(&data, "vehicleCollateral", "ppr").unwrap();
    assert_eq!(result.errors()[0].kind, ConstraintKind::Type);
}
