use serde_json::{Number, Value};

use super::ValidationContext;
use crate::graph::{SchemaKind, SchemaNode};
use crate::report::{ConstraintKind, ErrorRecord};

pub(super) fn check_type(
    node: &SchemaNode,
    kinds: &[SchemaKind],
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<ErrorRecord> {
    if kinds.iter().any(|kind| kind.matches(instance)) {
        return None;
    }
    let expected: Vec<&str> = kinds.iter().map(SchemaKind::name).collect();
    Some(ctx.error(
        node,
        ConstraintKind::Type,
        format!("expected {}, found {}", expected.join(" or "), SchemaKind::of(instance)),
    ))
}

pub(super) fn check_enum(
    node: &SchemaNode,
    allowed: &[Value],
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<ErrorRecord> {
    if allowed.iter().any(|value| json_equal(value, instance)) {
        return None;
    }
    let rendered: Vec<String> = allowed.iter().map(Value::to_string).collect();
    Some(ctx.error(
        node,
        ConstraintKind::Enum,
        format!("{} is not one of [{}]", instance, rendered.join(", ")),
    ))
}

pub(super) fn check_const(
    node: &SchemaNode,
    expected: &Value,
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<ErrorRecord> {
    if json_equal(expected, instance) {
        return None;
    }
    Some(ctx.error(node, ConstraintKind::Const, format!("expected {}, found {}", expected, instance)))
}

/// JSON equality: numbers compare by value (`1 == 1.0`), object key order
/// is ignored
pub fn json_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_equal(x, y)),
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len() && a.iter().all(|(key, x)| b.get(key).map(|y| json_equal(x, y)).unwrap_or(false))
        }
        _ => left == right,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_equal() {
        assert!(json_equal(&json!(1), &json!(1.0)));
        assert!(!json_equal(&json!(1), &json!("1")));
        assert!(json_equal(&json!({"a": 1, "b": [1, 2]}), &json!({"b": [1.0, 2], "a": 1})));
        assert!(!json_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!json_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(json_equal(&json!(null), &json!(null)));
    }
}
