//! Validation results
//!
//! Evaluators produce [`ErrorRecord`]s in evaluation order; [`to_result`]
//! turns the collected records into a [`ValidationResult`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step from the document root towards a value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Property(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) if is_identifier(name) => write!(f, ".{}", name),
            Self::Property(name) => write!(f, "['{}']", name.replace('\'', "\\'")),
            Self::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        Self::Property(name.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Render a path as a locator rooted at `$` (e.g. `$.owners[0].name`)
pub fn format_path(path: &[PathSegment]) -> String {
    let mut out = String::from("$");
    for segment in path {
        out.push_str(&segment.to_string());
    }
    out
}

/// The constraint that a value failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    Type,
    Required,
    AdditionalProperties,
    DependentRequired,
    MinProperties,
    MaxProperties,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    Enum,
    Const,
    MinItems,
    MaxItems,
    UniqueItems,
    AnyOf,
    OneOf,
    Not,
    /// The `false` schema, which no value satisfies
    False,
}

impl ConstraintKind {
    /// Keyword name as written in schema documents
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Required => "required",
            Self::AdditionalProperties => "additionalProperties",
            Self::DependentRequired => "dependentRequired",
            Self::MinProperties => "minProperties",
            Self::MaxProperties => "maxProperties",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Pattern => "pattern",
            Self::Format => "format",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::ExclusiveMinimum => "exclusiveMinimum",
            Self::ExclusiveMaximum => "exclusiveMaximum",
            Self::MultipleOf => "multipleOf",
            Self::Enum => "enum",
            Self::Const => "const",
            Self::MinItems => "minItems",
            Self::MaxItems => "maxItems",
            Self::UniqueItems => "uniqueItems",
            Self::AnyOf => "anyOf",
            Self::OneOf => "oneOf",
            Self::Not => "not",
            Self::False => "false",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A located description of one constraint violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Path from the document root to the failing value
    pub path: Vec<PathSegment>,
    /// Human-readable message, prefixed with the rendered path
    pub message: String,
    /// Constraint that failed
    pub kind: ConstraintKind,
    /// Absolute location of the schema node holding the constraint
    pub schema_location: String,
}

impl ErrorRecord {
    pub fn new(
        path: Vec<PathSegment>,
        kind: ConstraintKind,
        schema_location: &str,
        detail: impl fmt::Display,
    ) -> Self {
        let message = format!("{}: {}", format_path(&path), detail);
        Self {
            path,
            message,
            kind,
            schema_location: schema_location.to_string(),
        }
    }

    /// Rendered locator of the failing value
    pub fn locator(&self) -> String {
        format_path(&self.path)
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.kind)
    }
}

/// Outcome of validating one candidate document
///
/// Only [`to_result`] builds this type, so `is_valid()` always agrees with
/// `errors().is_empty()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ErrorRecord>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Split into the `(is_valid, errors)` pair callers usually want
    pub fn into_parts(self) -> (bool, Vec<ErrorRecord>) {
        (self.valid, self.errors)
    }
}

/// Collect evaluator output into a result, keeping evaluation order
pub fn to_result(errors: Vec<ErrorRecord>) -> ValidationResult {
    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[]), "$");
        let path = vec![
            PathSegment::from("owners"),
            PathSegment::from(0usize),
            PathSegment::from("individualName"),
        ];
        assert_eq!(format_path(&path), "$.owners[0].individualName");
    }

    #[test]
    fn test_format_path_quotes_odd_keys() {
        let path = vec![PathSegment::from("street address"), PathSegment::from("it's")];
        assert_eq!(format_path(&path), "$['street address']['it\\'s']");
    }

    #[test]
    fn test_message_carries_locator() {
        let record = ErrorRecord::new(
            vec![PathSegment::from("owners")],
            ConstraintKind::Required,
            "mhr/registration#",
            "required property is missing",
        );
        assert_eq!(record.message, "$.owners: required property is missing");
        assert_eq!(record.to_string(), "$.owners: required property is missing [required]");
    }

    #[test]
    fn test_result_validity_tracks_errors() {
        assert!(to_result(Vec::new()).is_valid());

        let record = ErrorRecord::new(Vec::new(), ConstraintKind::Type, "#", "expected object");
        let result = to_result(vec![record]);
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);

        let (valid, errors) = result.into_parts();
        assert!(!valid);
        assert_eq!(errors.len(), 1);
    }
}
