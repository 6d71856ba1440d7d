use serde_json::Value;
use std::sync::Arc;

use super::{evaluate, ValidationContext};
use crate::graph::{AdditionalRule, SchemaNode};
use crate::report::{ConstraintKind, ErrorRecord};

/// Missing required properties are reported at the path they should occupy
pub(super) fn check_required(
    node: &SchemaNode,
    names: &[String],
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Vec<ErrorRecord> {
    let Some(object) = instance.as_object() else {
        return Vec::new();
    };
    names
        .iter()
        .filter(|name| !object.contains_key(name.as_str()))
        .map(|name| {
            ctx.property(name)
                .error(node, ConstraintKind::Required, "required property is missing")
        })
        .collect()
}

pub(super) fn check_properties(
    properties: &[(String, Arc<SchemaNode>)],
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Vec<ErrorRecord> {
    let Some(object) = instance.as_object() else {
        return Vec::new();
    };
    let mut errors = Vec::new();
    for (name, schema) in properties {
        if let Some(value) = object.get(name) {
            errors.extend(evaluate(schema, value, &ctx.property(name)));
        }
    }
    errors
}

pub(super) fn check_additional(
    node: &SchemaNode,
    declared: &[String],
    rule: &AdditionalRule<Arc<SchemaNode>>,
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Vec<ErrorRecord> {
    let Some(object) = instance.as_object() else {
        return Vec::new();
    };
    let mut errors = Vec::new();
    for (key, value) in object {
        if declared.iter().any(|name| name == key) {
            continue;
        }
        let child = ctx.property(key);
        match rule {
            AdditionalRule::Forbidden => errors.push(child.error(
                node,
                ConstraintKind::AdditionalProperties,
                "property is not allowed here",
            )),
            AdditionalRule::Schema(schema) => errors.extend(evaluate(schema, value, &child)),
        }
    }
    errors
}

pub(super) fn check_dependent_required(
    node: &SchemaNode,
    dependencies: &[(String, Vec<String>)],
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Vec<ErrorRecord> {
    let Some(object) = instance.as_object() else {
        return Vec::new();
    };
    let mut errors = Vec::new();
    for (trigger, names) in dependencies {
        if !object.contains_key(trigger) {
            continue;
        }
        for name in names.iter().filter(|name| !object.contains_key(name.as_str())) {
            errors.push(ctx.property(name).error(
                node,
                ConstraintKind::DependentRequired,
                format!("required when '{}' is present", trigger),
            ));
        }
    }
    errors
}

pub(super) fn check_min_properties(
    node: &SchemaNode,
    min: u64,
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<ErrorRecord> {
    let len = instance.as_object()?.len() as u64;
    (len < min).then(|| {
        ctx.error(
            node,
            ConstraintKind::MinProperties,
            format!("has {} properties, fewer than the minimum of {}", len, min),
        )
    })
}

pub(super) fn check_max_properties(
    node: &SchemaNode,
    max: u64,
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<ErrorRecord> {
    let len = instance.as_object()?.len() as u64;
    (len > max).then(|| {
        ctx.error(
            node,
            ConstraintKind::MaxProperties,
            format!("has {} properties, more than the maximum of {}", len, max),
        )
    })
}
