//! Schema Arena
//!
//! Every catalog document is compiled into one flat arena of raw nodes.
//! Children are addressed by [`NodeId`]; `$ref`s are kept as absolute
//! reference strings and looked up through the location index when a
//! schema is resolved.
//!
//! This module is shared between:
//! - the registry (lazy resolution into `Arc<SchemaNode>` trees)
//! - reference analysis (document dependency graph, cycle groups)

pub mod analysis;
pub mod loader;
pub mod node;
mod parse;
pub mod resolve;

pub use analysis::ReferenceGraph;
pub use loader::{load_from_directory, load_from_embedded, LoadConfig};
pub use node::{AdditionalRule, Format, Keyword, NodeId, Pattern, SchemaKind, SchemaNode};
pub use resolve::resolve;

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, SchemaError};
use crate::schema::{SchemaDocument, SchemaKey};

/// A schema node as compiled from JSON, before reference resolution
#[derive(Debug, Clone)]
pub struct RawNode {
    /// Absolute location (`<base>#<json pointer>`)
    pub location: String,
    /// Index of the owning document in [`SchemaArena::documents`]
    pub document: usize,
    /// Absolute `$ref` target, if the node has one
    pub reference: Option<String>,
    pub keywords: Vec<Keyword<NodeId>>,
}

/// Flat storage for every compiled schema node of a catalog
#[derive(Debug, Default)]
pub struct SchemaArena {
    nodes: Vec<RawNode>,
    /// Canonical location -> node
    index: HashMap<String, NodeId>,
    /// Alternate document base -> canonical base
    aliases: HashMap<String, String>,
    /// Catalog key and canonical base of each document
    documents: Vec<(SchemaKey, String)>,
    roots: BTreeMap<SchemaKey, NodeId>,
}

impl SchemaArena {
    /// Compile a set of documents into one arena
    pub fn build(documents: &[SchemaDocument]) -> Result<Self> {
        let mut arena = Self::default();
        for doc in documents {
            arena.add_document(doc)?;
        }
        Ok(arena)
    }

    fn add_document(&mut self, doc: &SchemaDocument) -> Result<()> {
        if self.roots.contains_key(&doc.key) {
            return Err(SchemaError::Duplicate {
                domain: doc.key.domain.clone(),
                document_type: doc.key.document_type.clone(),
            });
        }

        let base = doc.base_uri();
        if self.index.contains_key(&base) || self.aliases.contains_key(&base) {
            return Err(SchemaError::malformed(
                &base,
                format!("$id of {} is already used by another document", doc.key),
            ));
        }

        let document = self.documents.len();
        self.documents.push((doc.key.clone(), base.clone()));

        let catalog_path = doc.key.catalog_path();
        if catalog_path != base {
            self.aliases.insert(catalog_path, base.clone());
        }

        let root = parse::Compiler::new(self, document, &base).compile(&doc.content, "")?;
        self.roots.insert(doc.key.clone(), root);

        tracing::debug!(schema = %doc.key, base = %base, nodes = self.nodes.len(), "compiled schema document");
        Ok(())
    }

    pub(crate) fn push(&mut self, node: RawNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.insert(canonical(&node.location), id);
        self.nodes.push(node);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut RawNode {
        &mut self.nodes[id.0]
    }

    pub fn node(&self, id: NodeId) -> &RawNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RawNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root node of a catalog document
    pub fn root(&self, key: &SchemaKey) -> Option<NodeId> {
        self.roots.get(key).copied()
    }

    /// All catalog keys, sorted
    pub fn keys(&self) -> impl Iterator<Item = &SchemaKey> {
        self.roots.keys()
    }

    /// Catalog key of the document with the given index
    pub fn document_key(&self, document: usize) -> &SchemaKey {
        &self.documents[document].0
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Find the node an absolute reference points at
    pub fn lookup(&self, reference: &str) -> Option<NodeId> {
        let (base, fragment) = split_fragment(reference);
        let candidates = [base, base.strip_suffix(".json").unwrap_or(base)];

        candidates.iter().find_map(|candidate| {
            let base = self
                .aliases
                .get(*candidate)
                .map(String::as_str)
                .unwrap_or(*candidate);
            self.index.get(&canonical(&format!("{}#{}", base, fragment))).copied()
        })
    }
}

/// Index key for a location: the root pointer collapses to the bare base
fn canonical(location: &str) -> String {
    location.strip_suffix('#').unwrap_or(location).to_string()
}

fn split_fragment(reference: &str) -> (&str, &str) {
    match reference.split_once('#') {
        Some((base, fragment)) => (base, fragment),
        None => (reference, ""),
    }
}

/// Resolve `reference` against the base of the document that contains it
pub fn join_reference(base: &str, reference: &str) -> String {
    let (path, fragment) = split_fragment(reference);

    let target = if path.is_empty() {
        base.to_string()
    } else if path.contains("://") || path.starts_with("urn:") {
        path.to_string()
    } else {
        let (authority, base_path) = match base.find("://") {
            Some(scheme_end) => {
                let path_start = base[scheme_end + 3..]
                    .find('/')
                    .map(|i| scheme_end + 3 + i)
                    .unwrap_or(base.len());
                base.split_at(path_start)
            }
            None => ("", base),
        };

        let directory = match base_path.rfind('/') {
            Some(i) => &base_path[..=i],
            None => "",
        };

        let joined = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("{}{}", directory, path)
        };
        let mut segments: Vec<&str> = Vec::new();
        for segment in joined.split('/') {
            match segment {
                "." => {}
                ".." => {
                    if segments.len() > 1 || segments.first().map(|s| !s.is_empty()).unwrap_or(false) {
                        segments.pop();
                    }
                }
                s => segments.push(s),
            }
        }
        format!("{}{}", authority, segments.join("/"))
    };

    if fragment.is_empty() {
        target
    } else {
        format!("{}#{}", target, fragment)
    }
}

/// Escape a property name for use as a JSON pointer token
pub(crate) fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
