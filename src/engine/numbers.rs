use serde_json::Value;

use super::ValidationContext;
use crate::graph::SchemaNode;
use crate::report::{ConstraintKind, ErrorRecord};

pub(super) fn check_bound(
    node: &SchemaNode,
    kind: ConstraintKind,
    limit: f64,
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<ErrorRecord> {
    let value = instance.as_f64()?;
    let (ok, relation) = match kind {
        ConstraintKind::Minimum => (value >= limit, "less than the minimum of"),
        ConstraintKind::Maximum => (value <= limit, "greater than the maximum of"),
        ConstraintKind::ExclusiveMinimum => (value > limit, "not greater than the exclusive minimum of"),
        ConstraintKind::ExclusiveMaximum => (value < limit, "not less than the exclusive maximum of"),
        _ => return None,
    };
    (!ok).then(|| ctx.error(node, kind, format!("{} is {} {}", instance, relation, limit)))
}

/// Integers are checked exactly against integral divisors; everything
/// else allows rounding error proportional to the quotient
pub(super) fn check_multiple_of(
    node: &SchemaNode,
    divisor: f64,
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<ErrorRecord> {
    let is_multiple = match (integer_magnitude(instance), integral_divisor(divisor)) {
        (Some(value), Some(divisor)) => value % divisor == 0,
        _ => {
            let quotient = instance.as_f64()? / divisor;
            let tolerance = 8.0 * f64::EPSILON * quotient.abs().max(1.0);
            quotient.is_finite() && (quotient - quotient.round()).abs() <= tolerance
        }
    };
    (!is_multiple).then(|| {
        ctx.error(
            node,
            ConstraintKind::MultipleOf,
            format!("{} is not a multiple of {}", instance, divisor),
        )
    })
}

fn integer_magnitude(instance: &Value) -> Option<u64> {
    instance
        .as_u64()
        .or_else(|| instance.as_i64().map(i64::unsigned_abs))
}

fn integral_divisor(divisor: f64) -> Option<u64> {
    (divisor >= 1.0 && divisor.fract() == 0.0 && divisor < u64::MAX as f64).then(|| divisor as u64)
}
