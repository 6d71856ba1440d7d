//! Validation Engine
//!
//! Walks a candidate document against a resolved [`SchemaNode`] tree and
//! collects every constraint violation. Each keyword evaluator is a pure
//! function of the node, the candidate value and the instance path, so
//! one resolved tree can validate any number of documents concurrently.
//!
//! Keywords of a node run in phase order (see [`Keyword::phase`]). When
//! the `type` check fails the remaining keywords of that node are skipped:
//! their messages would only restate the type mismatch.

mod arrays;
mod composition;
pub mod context;
mod numbers;
mod objects;
mod strings;
mod values;

use serde_json::Value;

use crate::graph::{Keyword, SchemaNode};
use crate::report::{to_result, ConstraintKind, ErrorRecord, ValidationResult};

pub use context::{InstancePath, ValidationContext};
pub use values::json_equal;

/// Switches that change how constraints are checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Check `date-time`, `date`, `time` and `email` formats
    pub check_formats: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { check_formats: true }
    }
}

/// Validate `document` against a resolved schema with default options
pub fn validate(document: &Value, schema: &SchemaNode) -> ValidationResult {
    validate_with(document, schema, &ValidationOptions::default())
}

pub fn validate_with(document: &Value, schema: &SchemaNode, options: &ValidationOptions) -> ValidationResult {
    let ctx = ValidationContext::new(options);
    to_result(evaluate(schema, document, &ctx))
}

/// Every violation of `node` by `instance`, in evaluation order
pub(crate) fn evaluate(node: &SchemaNode, instance: &Value, ctx: &ValidationContext<'_>) -> Vec<ErrorRecord> {
    let mut errors = Vec::new();

    for keyword in node.keywords() {
        match keyword {
            Keyword::Ref(target) => errors.extend(evaluate(target, instance, ctx)),
            Keyword::Never => errors.push(ctx.error(node, ConstraintKind::False, "no value is allowed here")),
            Keyword::Type(kinds) => {
                if let Some(error) = values::check_type(node, kinds, instance, ctx) {
                    errors.push(error);
                    return errors;
                }
            }
            Keyword::Enum(allowed) => errors.extend(values::check_enum(node, allowed, instance, ctx)),
            Keyword::Const(expected) => errors.extend(values::check_const(node, expected, instance, ctx)),

            Keyword::MinLength(min) => errors.extend(strings::check_min_length(node, *min, instance, ctx)),
            Keyword::MaxLength(max) => errors.extend(strings::check_max_length(node, *max, instance, ctx)),
            Keyword::Pattern(pattern) => errors.extend(strings::check_pattern(node, pattern, instance, ctx)),
            Keyword::Format(format) => errors.extend(strings::check_format(node, *format, instance, ctx)),

            Keyword::Minimum(limit) => errors.extend(numbers::check_bound(node, ConstraintKind::Minimum, *limit, instance, ctx)),
            Keyword::Maximum(limit) => errors.extend(numbers::check_bound(node, ConstraintKind::Maximum, *limit, instance, ctx)),
            Keyword::ExclusiveMinimum(limit) => {
                errors.extend(numbers::check_bound(node, ConstraintKind::ExclusiveMinimum, *limit, instance, ctx))
            }
            Keyword::ExclusiveMaximum(limit) => {
                errors.extend(numbers::check_bound(node, ConstraintKind::ExclusiveMaximum, *limit, instance, ctx))
            }
            Keyword::MultipleOf(divisor) => errors.extend(numbers::check_multiple_of(node, *divisor, instance, ctx)),

            Keyword::Required(names) => errors.extend(objects::check_required(node, names, instance, ctx)),
            Keyword::Properties(properties) => errors.extend(objects::check_properties(properties, instance, ctx)),
            Keyword::AdditionalProperties { declared, rule } => {
                errors.extend(objects::check_additional(node, declared, rule, instance, ctx))
            }
            Keyword::DependentRequired(dependencies) => {
                errors.extend(objects::check_dependent_required(node, dependencies, instance, ctx))
            }
            Keyword::MinProperties(min) => errors.extend(objects::check_min_properties(node, *min, instance, ctx)),
            Keyword::MaxProperties(max) => errors.extend(objects::check_max_properties(node, *max, instance, ctx)),

            Keyword::MinItems(min) => errors.extend(arrays::check_min_items(node, *min, instance, ctx)),
            Keyword::MaxItems(max) => errors.extend(arrays::check_max_items(node, *max, instance, ctx)),
            Keyword::UniqueItems => errors.extend(arrays::check_unique(node, instance, ctx)),
            Keyword::Items(items) => errors.extend(arrays::check_items(items, instance, ctx)),

            Keyword::AllOf(schemas) => errors.extend(composition::check_all_of(schemas, instance, ctx)),
            Keyword::AnyOf(schemas) => errors.extend(composition::check_any_of(node, schemas, instance, ctx)),
            Keyword::OneOf(schemas) => errors.extend(composition::check_one_of(node, schemas, instance, ctx)),
            Keyword::Not(schema) => errors.extend(composition::check_not(node, schema, instance, ctx)),
            Keyword::Conditional {
                condition,
                then,
                otherwise,
            } => errors.extend(composition::check_conditional(condition, then.as_deref(), otherwise.as_deref(), instance, ctx)),
        }
    }

    errors
}

/// Whether `instance` satisfies `node`, without keeping the messages
pub(crate) fn is_valid(node: &SchemaNode, instance: &Value, ctx: &ValidationContext<'_>) -> bool {
    evaluate(node, instance, ctx).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SchemaKind;
    use serde_json::json;
    use std::sync::Arc;

    fn object_with_name(max: u64) -> SchemaNode {
        let name = Arc::new(SchemaNode::new(
            "test#/properties/name",
            vec![Keyword::Type(vec![SchemaKind::String]), Keyword::MaxLength(max)],
        ));
        SchemaNode::new(
            "test#",
            vec![
                Keyword::Type(vec![SchemaKind::Object]),
                Keyword::Required(vec!["name".to_string()]),
                Keyword::Properties(vec![("name".to_string(), name)]),
            ],
        )
    }

    #[test]
    fn test_valid_document() {
        let result = validate(&json!({"name": "abc"}), &object_with_name(5));
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_type_mismatch_skips_sibling_keywords() {
        let result = validate(&json!("not an object"), &object_with_name(5));
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind, ConstraintKind::Type);
        assert_eq!(result.errors()[0].message, "$: expected object, found string");
    }

    #[test]
    fn test_errors_are_located() {
        let result = validate(&json!({"name": "abcdef"}), &object_with_name(5));
        let errors = result.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ConstraintKind::MaxLength);
        assert_eq!(errors[0].locator(), "$.name");
        assert_eq!(errors[0].schema_location, "test#/properties/name/maxLength");
    }

    #[test]
    fn test_false_schema_rejects_everything() {
        let never = SchemaNode::new("test#", vec![Keyword::Never]);
        for value in [json!(null), json!({}), json!(1), json!("x")] {
            let result = validate(&value, &never);
            assert_eq!(result.errors()[0].kind, ConstraintKind::False);
        }
        assert!(validate(&json!(1), &SchemaNode::new("test#", Vec::new())).is_valid());
    }

    #[test]
    fn test_validation_is_repeatable() {
        let schema = object_with_name(2);
        let document = json!({"name": "abc"});
        assert_eq!(validate(&document, &schema), validate(&document, &schema));
    }
}
