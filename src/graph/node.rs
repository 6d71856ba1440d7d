//! Schema nodes and the closed set of constraint keywords
//!
//! A [`Keyword`] is generic over how it points at child schemas: the arena
//! stores children as [`NodeId`]s, resolved trees hold them as
//! `Arc<SchemaNode>`.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Index of a raw node in the schema arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// JSON value kind named by the `type` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl SchemaKind {
    pub fn from_json_type(type_str: &str) -> Option<Self> {
        match type_str {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    /// Kind of a candidate value; integral numbers report `Integer`
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(n) if is_integral(n) => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Number, Value::Number(_)) => true,
            (Self::Integer, Value::Number(n)) => is_integral(n),
            _ => Self::of(value) == *self,
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_integral(n: &serde_json::Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    n.as_f64().map(|f| f.is_finite() && f.fract() == 0.0).unwrap_or(false)
}

/// A compiled `pattern`, anchored so that it must match the whole string
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// String formats that are checked rather than treated as annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    DateTime,
    Date,
    Time,
    Email,
}

impl Format {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "date-time" => Some(Self::DateTime),
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DateTime => "date-time",
            Self::Date => "date",
            Self::Time => "time",
            Self::Email => "email",
        }
    }
}

/// What happens to properties the schema does not declare
#[derive(Debug, Clone)]
pub enum AdditionalRule<N> {
    Forbidden,
    Schema(N),
}

/// One constraint attached to a schema node
#[derive(Debug, Clone)]
pub enum Keyword<N> {
    /// `$ref`: the referenced schema also applies
    Ref(N),
    Type(Vec<SchemaKind>),
    Enum(Vec<Value>),
    Const(Value),
    MinLength(u64),
    MaxLength(u64),
    Pattern(Pattern),
    Format(Format),
    Minimum(f64),
    Maximum(f64),
    ExclusiveMinimum(f64),
    ExclusiveMaximum(f64),
    MultipleOf(f64),
    Required(Vec<String>),
    Properties(Vec<(String, N)>),
    AdditionalProperties {
        declared: Vec<String>,
        rule: AdditionalRule<N>,
    },
    DependentRequired(Vec<(String, Vec<String>)>),
    MinProperties(u64),
    MaxProperties(u64),
    MinItems(u64),
    MaxItems(u64),
    UniqueItems,
    Items(N),
    AllOf(Vec<N>),
    AnyOf(Vec<N>),
    OneOf(Vec<N>),
    Not(N),
    Conditional {
        condition: N,
        then: Option<N>,
        otherwise: Option<N>,
    },
    /// The `false` schema
    Never,
}

impl<N> Keyword<N> {
    /// Evaluation phase; keywords of a node run in ascending phase order
    pub fn phase(&self) -> u8 {
        match self {
            Self::Ref(_) => 0,
            Self::Never => 1,
            Self::Type(_) => 2,
            Self::Enum(_) => 3,
            Self::Const(_) => 4,
            Self::MinLength(_) | Self::MaxLength(_) | Self::Pattern(_) | Self::Format(_) => 5,
            Self::Minimum(_)
            | Self::Maximum(_)
            | Self::ExclusiveMinimum(_)
            | Self::ExclusiveMaximum(_)
            | Self::MultipleOf(_) => 6,
            Self::Required(_) => 7,
            Self::Properties(_) => 8,
            Self::AdditionalProperties { .. } => 9,
            Self::DependentRequired(_) | Self::MinProperties(_) | Self::MaxProperties(_) => 10,
            Self::MinItems(_) | Self::MaxItems(_) | Self::UniqueItems => 11,
            Self::Items(_) => 12,
            Self::AllOf(_) => 13,
            Self::AnyOf(_) => 14,
            Self::OneOf(_) => 15,
            Self::Not(_) => 16,
            Self::Conditional { .. } => 17,
        }
    }

    /// Rebuild the keyword with every child pointer passed through `f`
    pub fn try_map<M, E>(
        &self,
        f: &mut impl FnMut(&N) -> Result<M, E>,
    ) -> Result<Keyword<M>, E> {
        let mapped = match self {
            Self::Ref(n) => Keyword::Ref(f(n)?),
            Self::Type(kinds) => Keyword::Type(kinds.clone()),
            Self::Enum(values) => Keyword::Enum(values.clone()),
            Self::Const(value) => Keyword::Const(value.clone()),
            Self::MinLength(n) => Keyword::MinLength(*n),
            Self::MaxLength(n) => Keyword::MaxLength(*n),
            Self::Pattern(p) => Keyword::Pattern(p.clone()),
            Self::Format(fmt) => Keyword::Format(*fmt),
            Self::Minimum(v) => Keyword::Minimum(*v),
            Self::Maximum(v) => Keyword::Maximum(*v),
            Self::ExclusiveMinimum(v) => Keyword::ExclusiveMinimum(*v),
            Self::ExclusiveMaximum(v) => Keyword::ExclusiveMaximum(*v),
            Self::MultipleOf(v) => Keyword::MultipleOf(*v),
            Self::Required(names) => Keyword::Required(names.clone()),
            Self::Properties(props) => Keyword::Properties(
                props
                    .iter()
                    .map(|(name, n)| -> Result<(String, M), E> { Ok((name.clone(), f(n)?)) })
                    .collect::<Result<_, E>>()?,
            ),
            Self::AdditionalProperties { declared, rule } => Keyword::AdditionalProperties {
                declared: declared.clone(),
                rule: match rule {
                    AdditionalRule::Forbidden => AdditionalRule::Forbidden,
                    AdditionalRule::Schema(n) => AdditionalRule::Schema(f(n)?),
                },
            },
            Self::DependentRequired(deps) => Keyword::DependentRequired(deps.clone()),
            Self::MinProperties(n) => Keyword::MinProperties(*n),
            Self::MaxProperties(n) => Keyword::MaxProperties(*n),
            Self::MinItems(n) => Keyword::MinItems(*n),
            Self::MaxItems(n) => Keyword::MaxItems(*n),
            Self::UniqueItems => Keyword::UniqueItems,
            Self::Items(n) => Keyword::Items(f(n)?),
            Self::AllOf(alts) => Keyword::AllOf(alts.iter().map(&mut *f).collect::<Result<_, E>>()?),
            Self::AnyOf(alts) => Keyword::AnyOf(alts.iter().map(&mut *f).collect::<Result<_, E>>()?),
            Self::OneOf(alts) => Keyword::OneOf(alts.iter().map(&mut *f).collect::<Result<_, E>>()?),
            Self::Not(n) => Keyword::Not(f(n)?),
            Self::Conditional {
                condition,
                then,
                otherwise,
            } => Keyword::Conditional {
                condition: f(condition)?,
                then: then.as_ref().map(&mut *f).transpose()?,
                otherwise: otherwise.as_ref().map(&mut *f).transpose()?,
            },
            Self::Never => Keyword::Never,
        };
        Ok(mapped)
    }
}

/// A fully resolved schema node
///
/// Children are shared `Arc`s; the tree is immutable and `Send + Sync`.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    location: String,
    keywords: Vec<Keyword<Arc<SchemaNode>>>,
}

impl SchemaNode {
    pub fn new(location: impl Into<String>, keywords: Vec<Keyword<Arc<SchemaNode>>>) -> Self {
        Self {
            location: location.into(),
            keywords,
        }
    }

    /// Absolute location of the node (`<base>#<json pointer>`)
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn keywords(&self) -> &[Keyword<Arc<SchemaNode>>] {
        &self.keywords
    }

    /// Look up a declared property schema by name
    pub fn property(&self, name: &str) -> Option<&Arc<SchemaNode>> {
        self.keywords.iter().find_map(|k| match k {
            Keyword::Properties(props) => props.iter().find(|(n, _)| n == name).map(|(_, s)| s),
            _ => None,
        })
    }

    /// Names listed under `required`
    pub fn required(&self) -> &[String] {
        self.keywords
            .iter()
            .find_map(|k| match k {
                Keyword::Required(names) => Some(names.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }
}
