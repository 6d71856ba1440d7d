//! Applicators that combine subschemas at the same instance path

use serde_json::Value;
use std::sync::Arc;

use super::{evaluate, is_valid, ValidationContext};
use crate::graph::SchemaNode;
use crate::report::{ConstraintKind, ErrorRecord};

/// Every alternative must hold; their errors are reported directly
pub(super) fn check_all_of(schemas: &[Arc<SchemaNode>], instance: &Value, ctx: &ValidationContext<'_>) -> Vec<ErrorRecord> {
    schemas.iter().flat_map(|schema| evaluate(schema, instance, ctx)).collect()
}

pub(super) fn check_any_of(
    node: &SchemaNode,
    schemas: &[Arc<SchemaNode>],
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<ErrorRecord> {
    if schemas.iter().any(|schema| is_valid(schema, instance, ctx)) {
        return None;
    }
    Some(ctx.error(
        node,
        ConstraintKind::AnyOf,
        format!("does not match any of the {} alternatives", schemas.len()),
    ))
}

pub(super) fn check_one_of(
    node: &SchemaNode,
    schemas: &[Arc<SchemaNode>],
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<ErrorRecord> {
    let matched: Vec<usize> = schemas
        .iter()
        .enumerate()
        .filter(|(_, schema)| is_valid(schema, instance, ctx))
        .map(|(index, _)| index)
        .collect();

    match matched.len() {
        1 => None,
        0 => Some(ctx.error(
            node,
            ConstraintKind::OneOf,
            format!("does not match any of the {} alternatives; exactly one is required", schemas.len()),
        )),
        _ => {
            let indexes: Vec<String> = matched.iter().map(usize::to_string).collect();
            Some(ctx.error(
                node,
                ConstraintKind::OneOf,
                format!("matches alternatives {}; exactly one is required", indexes.join(", ")),
            ))
        }
    }
}

pub(super) fn check_not(node: &SchemaNode, schema: &SchemaNode, instance: &Value, ctx: &ValidationContext<'_>) -> Option<ErrorRecord> {
    is_valid(schema, instance, ctx)
        .then(|| ctx.error(node, ConstraintKind::Not, "matches a schema it must not match"))
}

/// `if`/`then`/`else`: the condition's own errors are never reported
pub(super) fn check_conditional(
    condition: &SchemaNode,
    then: Option<&SchemaNode>,
    otherwise: Option<&SchemaNode>,
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Vec<ErrorRecord> {
    let branch = if is_valid(condition, instance, ctx) { then } else { otherwise };
    branch.map(|schema| evaluate(schema, instance, ctx)).unwrap_or_default()
}
