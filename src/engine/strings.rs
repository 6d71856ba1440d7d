use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use super::ValidationContext;
use crate::graph::{Format, Pattern, SchemaNode};
use crate::report::{ConstraintKind, ErrorRecord};

/// Lengths count Unicode code points, not bytes
fn char_len(text: &str) -> u64 {
    text.chars().count() as u64
}

pub(super) fn check_min_length(node: &SchemaNode, min: u64, instance: &Value, ctx: &ValidationContext<'_>) -> Option<ErrorRecord> {
    let text = instance.as_str()?;
    let len = char_len(text);
    (len < min).then(|| {
        ctx.error(
            node,
            ConstraintKind::MinLength,
            format!("is shorter than the minimum length of {} characters (found {})", min, len),
        )
    })
}

pub(super) fn check_max_length(node: &SchemaNode, max: u64, instance: &Value, ctx: &ValidationContext<'_>) -> Option<ErrorRecord> {
    let text = instance.as_str()?;
    let len = char_len(text);
    (len > max).then(|| {
        ctx.error(
            node,
            ConstraintKind::MaxLength,
            format!("exceeds maximum length of {} characters (found {})", max, len),
        )
    })
}

pub(super) fn check_pattern(
    node: &SchemaNode,
    pattern: &Pattern,
    instance: &Value,
    ctx: &ValidationContext<'_>,
) -> Option<ErrorRecord> {
    let text = instance.as_str()?;
    (!pattern.is_match(text)).then(|| {
        ctx.error(
            node,
            ConstraintKind::Pattern,
            format!("{} does not match pattern '{}'", instance, pattern.source()),
        )
    })
}

pub(super) fn check_format(node: &SchemaNode, format: Format, instance: &Value, ctx: &ValidationContext<'_>) -> Option<ErrorRecord> {
    if !ctx.options().check_formats {
        return None;
    }
    let text = instance.as_str()?;
    (!conforms(format, text)).then(|| {
        ctx.error(
            node,
            ConstraintKind::Format,
            format!("{} is not a valid {}", instance, format.name()),
        )
    })
}

fn conforms(format: Format, text: &str) -> bool {
    match format {
        Format::DateTime => DateTime::parse_from_rfc3339(text).is_ok(),
        Format::Date => text.len() == 10 && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok(),
        Format::Time => is_time(text),
        Format::Email => email_regex().is_match(text),
    }
}

/// RFC 3339 `full-time`; a bare `HH:MM:SS` is accepted as well
fn is_time(text: &str) -> bool {
    DateTime::parse_from_rfc3339(&format!("1970-01-01T{}", text)).is_ok()
        || NaiveTime::parse_from_str(text, "%H:%M:%S").is_ok()
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap_or_else(|e| panic!("invalid email pattern: {}", e))
    })
}
