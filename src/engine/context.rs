//! Validation context: where in the candidate document the walk is
//!
//! The path is a stack-allocated linked list; it is only turned into a
//! `Vec<PathSegment>` when an error is reported.

use std::fmt;

use crate::graph::SchemaNode;
use crate::report::{ConstraintKind, ErrorRecord, PathSegment};

use super::ValidationOptions;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Property(&'a str),
    Index(usize),
}

/// Path from the document root to the value being validated
#[derive(Debug, Clone, Copy)]
pub struct InstancePath<'a> {
    segment: Option<Segment<'a>>,
    parent: Option<&'a InstancePath<'a>>,
}

impl<'a> InstancePath<'a> {
    pub const fn root() -> Self {
        Self {
            segment: None,
            parent: None,
        }
    }

    fn push(&'a self, segment: Segment<'a>) -> InstancePath<'a> {
        InstancePath {
            segment: Some(segment),
            parent: Some(self),
        }
    }

    pub fn to_vec(&self) -> Vec<PathSegment> {
        let mut segments = Vec::new();
        let mut current = Some(self);
        while let Some(path) = current {
            match path.segment {
                Some(Segment::Property(name)) => segments.push(PathSegment::Property(name.to_string())),
                Some(Segment::Index(i)) => segments.push(PathSegment::Index(i)),
                None => {}
            }
            current = path.parent;
        }
        segments.reverse();
        segments
    }
}

/// Per-call state threaded through every evaluator
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    path: InstancePath<'a>,
    options: &'a ValidationOptions,
}

impl<'a> ValidationContext<'a> {
    pub fn new(options: &'a ValidationOptions) -> Self {
        Self {
            path: InstancePath::root(),
            options,
        }
    }

    pub fn options(&self) -> &ValidationOptions {
        self.options
    }

    pub fn path(&self) -> &InstancePath<'a> {
        &self.path
    }

    /// Context for the value under `name`
    pub fn property<'b>(&'b self, name: &'b str) -> ValidationContext<'b> {
        ValidationContext {
            path: self.path.push(Segment::Property(name)),
            options: self.options,
        }
    }

    /// Context for the array element at `index`
    pub fn index<'b>(&'b self, index: usize) -> ValidationContext<'b> {
        ValidationContext {
            path: self.path.push(Segment::Index(index)),
            options: self.options,
        }
    }

    /// Build an error for a keyword of `node` failing at the current path
    pub fn error(&self, node: &SchemaNode, kind: ConstraintKind, detail: impl fmt::Display) -> ErrorRecord {
        let location = match kind {
            ConstraintKind::False => node.location().to_string(),
            _ => format!("{}/{}", node.location(), kind.keyword()),
        };
        ErrorRecord::new(self.path.to_vec(), kind, &location, detail)
    }
}
