//! Schema Compilation
//!
//! Turns schema JSON into raw arena nodes. Every subschema is registered
//! under its absolute location so that references can point at it.
//! Anything the evaluator cannot honour is rejected here, before any
//! document is validated.

use serde_json::{Map, Value};

use super::node::{AdditionalRule, Format, Keyword, NodeId, Pattern, SchemaKind};
use super::{escape_pointer_token, join_reference, RawNode, SchemaArena};
use crate::error::{Result, SchemaError};

/// Keywords that would change validation outcomes but are not evaluated
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "patternProperties",
    "propertyNames",
    "contains",
    "additionalItems",
    "dependentSchemas",
    "unevaluatedProperties",
    "unevaluatedItems",
    "prefixItems",
    "minContains",
    "maxContains",
    "$anchor",
    "$dynamicAnchor",
    "$dynamicRef",
    "$recursiveAnchor",
    "$recursiveRef",
];

/// Keywords that never affect validation
const ANNOTATION_KEYWORDS: &[&str] = &[
    "$schema",
    "$comment",
    "title",
    "description",
    "default",
    "examples",
    "readOnly",
    "writeOnly",
    "deprecated",
    "contentEncoding",
    "contentMediaType",
];

/// Keywords the compiler evaluates
const EVALUATED_KEYWORDS: &[&str] = &[
    "$id",
    "$ref",
    "type",
    "enum",
    "const",
    "minLength",
    "maxLength",
    "pattern",
    "format",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
    "required",
    "properties",
    "additionalProperties",
    "dependentRequired",
    "dependencies",
    "minProperties",
    "maxProperties",
    "minItems",
    "maxItems",
    "uniqueItems",
    "items",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "if",
    "then",
    "else",
    "definitions",
    "$defs",
];

pub(crate) struct Compiler<'a> {
    arena: &'a mut SchemaArena,
    document: usize,
    base: &'a str,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(arena: &'a mut SchemaArena, document: usize, base: &'a str) -> Self {
        Self {
            arena,
            document,
            base,
        }
    }

    /// Compile the schema at `pointer` and every subschema beneath it
    pub(crate) fn compile(&mut self, value: &Value, pointer: &str) -> Result<NodeId> {
        let location = format!("{}#{}", self.base, pointer);

        let id = self.arena.push(RawNode {
            location: location.clone(),
            document: self.document,
            reference: None,
            keywords: Vec::new(),
        });

        let (reference, mut keywords) = match value {
            Value::Bool(true) => (None, Vec::new()),
            Value::Bool(false) => (None, vec![Keyword::Never]),
            Value::Object(map) => self.compile_object(map, pointer, &location)?,
            other => {
                return Err(SchemaError::malformed(
                    location,
                    format!("a schema must be an object or a boolean, found {}", other),
                ))
            }
        };

        keywords.sort_by_key(|k| k.phase());

        let node = self.arena.node_mut(id);
        node.reference = reference;
        node.keywords = keywords;
        Ok(id)
    }

    fn compile_object(
        &mut self,
        map: &Map<String, Value>,
        pointer: &str,
        location: &str,
    ) -> Result<(Option<String>, Vec<Keyword<NodeId>>)> {
        if let Some(keyword) = UNSUPPORTED_KEYWORDS.iter().find(|k| map.contains_key(**k)) {
            return Err(SchemaError::malformed(
                location,
                format!("keyword '{}' is not supported", keyword),
            ));
        }

        let base = self.base;
        let mut reference = None;
        let mut keywords = Vec::new();

        for (name, value) in map {
            let here = format!("{}/{}", pointer, escape_pointer_token(name));
            let at = || format!("{}#{}", base, here);

            match name.as_str() {
                "$id" if !pointer.is_empty() => {
                    return Err(SchemaError::malformed(
                        at(),
                        "$id is only allowed at the document root",
                    ))
                }
                "$ref" => {
                    let target = value
                        .as_str()
                        .ok_or_else(|| SchemaError::malformed(at(), "$ref must be a string"))?;
                    reference = Some(join_reference(base, target));
                }
                "type" => keywords.push(Keyword::Type(parse_types(value, &at())?)),
                "enum" => match value.as_array() {
                    Some(values) if !values.is_empty() => keywords.push(Keyword::Enum(values.clone())),
                    _ => return Err(SchemaError::malformed(at(), "enum must be a non-empty array")),
                },
                "const" => keywords.push(Keyword::Const(value.clone())),
                "minLength" => keywords.push(Keyword::MinLength(parse_count(value, &at())?)),
                "maxLength" => keywords.push(Keyword::MaxLength(parse_count(value, &at())?)),
                "minProperties" => keywords.push(Keyword::MinProperties(parse_count(value, &at())?)),
                "maxProperties" => keywords.push(Keyword::MaxProperties(parse_count(value, &at())?)),
                "minItems" => keywords.push(Keyword::MinItems(parse_count(value, &at())?)),
                "maxItems" => keywords.push(Keyword::MaxItems(parse_count(value, &at())?)),
                "pattern" => {
                    let source = value
                        .as_str()
                        .ok_or_else(|| SchemaError::malformed(at(), "pattern must be a string"))?;
                    let pattern = Pattern::new(source)
                        .map_err(|e| SchemaError::malformed(at(), format!("invalid pattern: {}", e)))?;
                    keywords.push(Keyword::Pattern(pattern));
                }
                "format" => {
                    let format_name = value
                        .as_str()
                        .ok_or_else(|| SchemaError::malformed(at(), "format must be a string"))?;
                    match Format::from_name(format_name) {
                        Some(format) => keywords.push(Keyword::Format(format)),
                        None => tracing::debug!(format = format_name, location = %at(), "format treated as annotation"),
                    }
                }
                "minimum" => keywords.push(Keyword::Minimum(parse_number(value, &at())?)),
                "maximum" => keywords.push(Keyword::Maximum(parse_number(value, &at())?)),
                "exclusiveMinimum" => keywords.push(Keyword::ExclusiveMinimum(parse_number(value, &at())?)),
                "exclusiveMaximum" => keywords.push(Keyword::ExclusiveMaximum(parse_number(value, &at())?)),
                "multipleOf" => {
                    let divisor = parse_number(value, &at())?;
                    if divisor <= 0.0 {
                        return Err(SchemaError::malformed(at(), "multipleOf must be greater than zero"));
                    }
                    keywords.push(Keyword::MultipleOf(divisor));
                }
                "required" => {
                    let names = parse_names(value, &at())?;
                    if !names.is_empty() {
                        keywords.push(Keyword::Required(names));
                    }
                }
                "properties" => {
                    let props = value
                        .as_object()
                        .ok_or_else(|| SchemaError::malformed(at(), "properties must be an object"))?;
                    let mut children = Vec::with_capacity(props.len());
                    for (prop, schema) in props {
                        let child = self.compile(schema, &format!("{}/{}", here, escape_pointer_token(prop)))?;
                        children.push((prop.clone(), child));
                    }
                    keywords.push(Keyword::Properties(children));
                }
                "additionalProperties" => {
                    let declared = map
                        .get("properties")
                        .and_then(|p| p.as_object())
                        .map(|p| p.keys().cloned().collect())
                        .unwrap_or_default();
                    let rule = match value {
                        Value::Bool(true) => None,
                        Value::Bool(false) => Some(AdditionalRule::Forbidden),
                        Value::Object(_) => Some(AdditionalRule::Schema(self.compile(value, &here)?)),
                        _ => {
                            return Err(SchemaError::malformed(
                                at(),
                                "additionalProperties must be a boolean or a schema",
                            ))
                        }
                    };
                    if let Some(rule) = rule {
                        keywords.push(Keyword::AdditionalProperties { declared, rule });
                    }
                }
                "dependentRequired" | "dependencies" => {
                    let deps = parse_dependencies(value, &at())?;
                    if !deps.is_empty() {
                        keywords.push(Keyword::DependentRequired(deps));
                    }
                }
                "uniqueItems" => match value {
                    Value::Bool(true) => keywords.push(Keyword::UniqueItems),
                    Value::Bool(false) => {}
                    _ => return Err(SchemaError::malformed(at(), "uniqueItems must be a boolean")),
                },
                "items" => match value {
                    Value::Object(_) | Value::Bool(_) => keywords.push(Keyword::Items(self.compile(value, &here)?)),
                    _ => return Err(SchemaError::malformed(at(), "tuple-form items are not supported")),
                },
                "allOf" => keywords.push(Keyword::AllOf(self.compile_alternatives(value, &here)?)),
                "anyOf" => keywords.push(Keyword::AnyOf(self.compile_alternatives(value, &here)?)),
                "oneOf" => keywords.push(Keyword::OneOf(self.compile_alternatives(value, &here)?)),
                "not" => keywords.push(Keyword::Not(self.compile(value, &here)?)),
                "if" => {
                    let condition = self.compile(value, &here)?;
                    let then = match map.get("then") {
                        Some(v) => Some(self.compile(v, &format!("{}/then", pointer))?),
                        None => None,
                    };
                    let otherwise = match map.get("else") {
                        Some(v) => Some(self.compile(v, &format!("{}/else", pointer))?),
                        None => None,
                    };
                    if then.is_some() || otherwise.is_some() {
                        keywords.push(Keyword::Conditional {
                            condition,
                            then,
                            otherwise,
                        });
                    }
                }
                "then" | "else" => {
                    if !map.contains_key("if") {
                        return Err(SchemaError::malformed(at(), format!("'{}' without 'if'", name)));
                    }
                }
                "definitions" | "$defs" => {
                    let defs = value
                        .as_object()
                        .ok_or_else(|| SchemaError::malformed(at(), format!("{} must be an object", name)))?;
                    for (def, schema) in defs {
                        self.compile(schema, &format!("{}/{}", here, escape_pointer_token(def)))?;
                    }
                }
                other if ANNOTATION_KEYWORDS.contains(&other) || other == "$id" => {}
                other => return Err(unknown_keyword(other, at())),
            }
        }

        Ok((reference, keywords))
    }

    fn compile_alternatives(&mut self, value: &Value, pointer: &str) -> Result<Vec<NodeId>> {
        let alternatives = match value.as_array() {
            Some(items) if !items.is_empty() => items,
            _ => {
                return Err(SchemaError::malformed(
                    format!("{}#{}", self.base, pointer),
                    "composition requires a non-empty array of alternatives",
                ))
            }
        };

        alternatives
            .iter()
            .enumerate()
            .map(|(i, schema)| self.compile(schema, &format!("{}/{}", pointer, i)))
            .collect()
    }
}

fn unknown_keyword(name: &str, location: String) -> SchemaError {
    let known = EVALUATED_KEYWORDS
        .iter()
        .chain(ANNOTATION_KEYWORDS)
        .find(|k| k.eq_ignore_ascii_case(name));
    let reason = match known {
        Some(k) => format!("unknown keyword '{}' (did you mean '{}'?)", name, k),
        None => format!("unknown keyword '{}'", name),
    };
    SchemaError::malformed(location, reason)
}

fn parse_types(value: &Value, location: &str) -> Result<Vec<SchemaKind>> {
    let names: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|v| v.as_str().ok_or_else(|| SchemaError::malformed(location, "type names must be strings")))
            .collect::<Result<_>>()?,
        _ => return Err(SchemaError::malformed(location, "type must be a string or a non-empty array")),
    };

    names
        .into_iter()
        .map(|name| {
            SchemaKind::from_json_type(name)
                .ok_or_else(|| SchemaError::malformed(location, format!("unknown type '{}'", name)))
        })
        .collect()
}

fn parse_count(value: &Value, location: &str) -> Result<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
        .ok_or_else(|| SchemaError::malformed(location, "expected a non-negative integer"))
}

fn parse_number(value: &Value, location: &str) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| SchemaError::malformed(location, "number out of range")),
        Value::Bool(_) => Err(SchemaError::malformed(
            location,
            "boolean exclusive bounds are not supported; use a numeric bound",
        )),
        _ => Err(SchemaError::malformed(location, "expected a number")),
    }
}

fn parse_names(value: &Value, location: &str) -> Result<Vec<String>> {
    value
        .as_array()
        .ok_or_else(|| SchemaError::malformed(location, "expected an array of property names"))?
        .iter()
        .map(|v| {
            v.as_str()
                .map(String::from)
                .ok_or_else(|| SchemaError::malformed(location, "property names must be strings"))
        })
        .collect()
}

fn parse_dependencies(value: &Value, location: &str) -> Result<Vec<(String, Vec<String>)>> {
    let deps = value
        .as_object()
        .ok_or_else(|| SchemaError::malformed(location, "dependencies must be an object"))?;

    deps.iter()
        .map(|(name, required)| {
            if required.is_object() || required.is_boolean() {
                return Err(SchemaError::malformed(
                    location,
                    format!("schema dependency on '{}' is not supported", name),
                ));
            }
            Ok((name.clone(), parse_names(required, location)?))
        })
        .collect()
}
