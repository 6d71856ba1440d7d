use serde_json::Value;

use super::{evaluate, json_equal, ValidationContext};
use crate::graph::SchemaNode;
use crate::report::{ConstraintKind, ErrorRecord};

pub(super) fn check_min_items(node: &SchemaNode, min: u64, instance: &Value, ctx: &ValidationContext<'_>) -> Option<ErrorRecord> {
    let len = instance.as_array()?.len() as u64;
    (len < min).then(|| {
        ctx.error(
            node,
            ConstraintKind::MinItems,
            format!("has {} items, fewer than the minimum of {}", len, min),
        )
    })
}

pub(super) fn check_max_items(node: &SchemaNode, max: u64, instance: &Value, ctx: &ValidationContext<'_>) -> Option<ErrorRecord> {
    let len = instance.as_array()?.len() as u64;
    (len > max).then(|| {
        ctx.error(
            node,
            ConstraintKind::MaxItems,
            format!("has {} items, more than the maximum of {}", len, max),
        )
    })
}

/// Reports the first pair of equal items only
pub(super) fn check_unique(node: &SchemaNode, instance: &Value, ctx: &ValidationContext<'_>) -> Option<ErrorRecord> {
    let items = instance.as_array()?;
    for (i, first) in items.iter().enumerate() {
        if let Some(offset) = items[i + 1..].iter().position(|other| json_equal(first, other)) {
            return Some(ctx.error(
                node,
                ConstraintKind::UniqueItems,
                format!("items at indexes {} and {} are equal", i, i + 1 + offset),
            ));
        }
    }
    None
}

pub(super) fn check_items(schema: &SchemaNode, instance: &Value, ctx: &ValidationContext<'_>) -> Vec<ErrorRecord> {
    let Some(items) = instance.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .flat_map(|(index, item)| evaluate(schema, item, &ctx.index(index)))
        .collect()
}
