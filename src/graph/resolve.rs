//! Reference Resolution
//!
//! Turns an arena node and everything reachable from it into an owned
//! `Arc<SchemaNode>` tree. `$ref` targets are looked up through the arena
//! index; a target that is already on the current resolution path is a
//! cycle and is rejected.

use std::collections::HashMap;
use std::sync::Arc;

use super::node::{Keyword, NodeId, SchemaNode};
use super::SchemaArena;
use crate::error::{Result, SchemaError};

/// Resolve the schema rooted at `root`
pub fn resolve(arena: &SchemaArena, root: NodeId) -> Result<Arc<SchemaNode>> {
    Resolver {
        arena,
        resolved: HashMap::new(),
        active: Vec::new(),
        chain: Vec::new(),
    }
    .resolve(root)
}

struct Resolver<'a> {
    arena: &'a SchemaArena,
    /// Nodes already resolved during this walk; shared subtrees resolve once
    resolved: HashMap<NodeId, Arc<SchemaNode>>,
    /// Nodes on the current resolution path
    active: Vec<NodeId>,
    /// References followed along the current path, for cycle reports
    chain: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn resolve(&mut self, id: NodeId) -> Result<Arc<SchemaNode>> {
        if let Some(node) = self.resolved.get(&id) {
            return Ok(Arc::clone(node));
        }

        let arena = self.arena;
        let raw = arena.node(id);

        if self.active.contains(&id) {
            let mut cycle = self.chain.clone();
            cycle.push(raw.location.clone());
            return Err(SchemaError::resolution(
                raw.location.clone(),
                format!("cyclic reference chain: {}", cycle.join(" -> ")),
            ));
        }

        self.active.push(id);
        let mut keywords = Vec::with_capacity(raw.keywords.len() + 1);

        if let Some(reference) = &raw.reference {
            let target = arena.lookup(reference).ok_or_else(|| {
                SchemaError::resolution(
                    reference.clone(),
                    format!("no schema at this location (referenced from {})", raw.location),
                )
            })?;

            self.chain.push(raw.location.clone());
            let resolved = self.resolve(target)?;
            self.chain.pop();

            keywords.push(Keyword::Ref(resolved));
        }

        for keyword in &raw.keywords {
            keywords.push(keyword.try_map(&mut |child: &NodeId| self.resolve(*child))?);
        }

        self.active.pop();

        let node = Arc::new(SchemaNode::new(raw.location.clone(), keywords));
        self.resolved.insert(id, Arc::clone(&node));
        Ok(node)
    }
}
