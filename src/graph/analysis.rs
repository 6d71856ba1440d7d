//! Reference Graph Analysis
//!
//! Builds a document-level dependency graph from the `$ref`s in the arena
//! and computes strongly connected components (cycle groups) and
//! transitive dependencies.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{BTreeSet, HashMap};

use super::SchemaArena;
use crate::schema::SchemaKey;

/// Which documents reference which
pub struct ReferenceGraph {
    graph: DiGraph<SchemaKey, ()>,
    node_indices: HashMap<SchemaKey, NodeIndex>,
}

impl ReferenceGraph {
    /// Collect cross-document edges from every arena node
    ///
    /// References that do not resolve are skipped here; resolution
    /// reports them.
    pub fn build(arena: &SchemaArena) -> Self {
        let mut graph = DiGraph::with_capacity(arena.document_count(), arena.document_count() * 2);
        let mut node_indices = HashMap::with_capacity(arena.document_count());

        for document in 0..arena.document_count() {
            let key = arena.document_key(document).clone();
            let idx = graph.add_node(key.clone());
            node_indices.insert(key, idx);
        }

        let mut edges = BTreeSet::new();
        for raw in arena.nodes() {
            let Some(target) = raw.reference.as_deref().and_then(|r| arena.lookup(r)) else {
                continue;
            };
            let to = arena.node(target).document;
            if to != raw.document {
                edges.insert((raw.document, to));
            }
        }

        for (from, to) in edges {
            let from_idx = node_indices[arena.document_key(from)];
            let to_idx = node_indices[arena.document_key(to)];
            graph.add_edge(from_idx, to_idx, ());
        }

        Self { graph, node_indices }
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Groups of documents that reference each other in a cycle
    pub fn cycles(&self) -> Vec<Vec<SchemaKey>> {
        let mut groups: Vec<Vec<SchemaKey>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut members: Vec<SchemaKey> = scc
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect();
                members.sort();
                members
            })
            .collect();
        groups.sort();
        groups
    }

    /// Immediate dependencies of a document
    pub fn refs_out(&self, key: &SchemaKey) -> Vec<&SchemaKey> {
        let Some(&idx) = self.node_indices.get(key) else {
            return Vec::new();
        };
        let mut deps: Vec<&SchemaKey> = self
            .graph
            .neighbors(idx)
            .filter_map(|n| self.graph.node_weight(n))
            .collect();
        deps.sort();
        deps
    }

    /// Every document reachable from `key`, excluding `key` itself, sorted
    pub fn dependencies(&self, key: &SchemaKey) -> Vec<SchemaKey> {
        let Some(&start) = self.node_indices.get(key) else {
            return Vec::new();
        };

        let mut found = BTreeSet::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            if idx != start {
                if let Some(dep) = self.graph.node_weight(idx) {
                    found.insert(dep.clone());
                }
            }
        }
        found.into_iter().collect()
    }
}
