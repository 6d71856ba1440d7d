//! Schema Registry
//!
//! Owns the compiled catalog and a write-once cache of resolved schema
//! trees. Every registered key gets its cache slot when the registry is
//! built, so lookups never lock: a miss resolves the tree and publishes
//! it once, and later readers share the same `Arc`.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use include_dir::{include_dir, Dir};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::checksum::Checksum;
use crate::config::ValidatorConfig;
use crate::engine::{self, ValidationOptions};
use crate::error::{Result, SchemaError};
use crate::graph::{self, LoadConfig, ReferenceGraph, SchemaArena, SchemaNode};
use crate::report::ValidationResult;
use crate::schema::{SchemaDocument, SchemaKey};

/// Catalog compiled into the binary
static EMBEDDED_SCHEMAS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/schemas");

static DEFAULT_REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// The schema catalog plus its resolution cache
pub struct SchemaRegistry {
    arena: SchemaArena,
    documents: BTreeMap<SchemaKey, SchemaDocument>,
    cache: HashMap<SchemaKey, OnceLock<Arc<SchemaNode>>>,
    graph: ReferenceGraph,
    options: ValidationOptions,
}

impl SchemaRegistry {
    /// Process-wide registry over the embedded catalog
    pub fn embedded() -> Result<&'static SchemaRegistry> {
        if let Some(registry) = DEFAULT_REGISTRY.get() {
            return Ok(registry);
        }
        let registry = Self::from_embedded(&LoadConfig::default(), ValidationOptions::default())?;
        Ok(DEFAULT_REGISTRY.get_or_init(|| registry))
    }

    pub fn from_embedded(load: &LoadConfig, options: ValidationOptions) -> Result<Self> {
        let documents = graph::load_from_embedded(&EMBEDDED_SCHEMAS, load)?;
        Self::from_documents(documents, options)
    }

    pub fn from_directory(dir: &Path, load: &LoadConfig, options: ValidationOptions) -> Result<Self> {
        let documents = graph::load_from_directory(dir, load)?;
        Self::from_documents(documents, options)
    }

    /// Build the registry a configuration describes
    ///
    /// With `registry.preload` every schema is resolved before returning.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self> {
        let load = config.load_config();
        let options = config.validation_options();
        let registry = match config.schema_dir() {
            Some(dir) => Self::from_directory(&dir, &load, options)?,
            None => Self::from_embedded(&load, options)?,
        };
        if config.registry.preload {
            registry.verify()?;
        }
        Ok(registry)
    }

    pub fn from_documents(documents: Vec<SchemaDocument>, options: ValidationOptions) -> Result<Self> {
        let arena = SchemaArena::build(&documents)?;
        let graph = ReferenceGraph::build(&arena);

        for cycle in graph.cycles() {
            let members: Vec<String> = cycle.iter().map(SchemaKey::to_string).collect();
            tracing::warn!(documents = %members.join(", "), "schema documents reference each other in a cycle");
        }

        let cache = arena.keys().map(|key| (key.clone(), OnceLock::new())).collect();
        let documents: BTreeMap<SchemaKey, SchemaDocument> =
            documents.into_iter().map(|doc| (doc.key.clone(), doc)).collect();

        tracing::info!(
            schemas = documents.len(),
            nodes = arena.len(),
            references = graph.edge_count(),
            "schema catalog assembled"
        );

        Ok(Self {
            arena,
            documents,
            cache,
            graph,
            options,
        })
    }

    /// The resolved schema registered under `(domain, document_type)`
    pub fn load(&self, domain: &str, document_type: &str) -> Result<Arc<SchemaNode>> {
        let key = SchemaKey::new(domain, document_type);
        let (slot, root) = match (self.cache.get(&key), self.arena.root(&key)) {
            (Some(slot), Some(root)) => (slot, root),
            _ => {
                return Err(SchemaError::NotFound {
                    suggestion: self.suggest(&key),
                    domain: key.domain,
                    document_type: key.document_type,
                })
            }
        };

        if let Some(node) = slot.get() {
            return Ok(Arc::clone(node));
        }

        tracing::debug!(schema = %key, "resolving schema");
        let node = graph::resolve(&self.arena, root)?;
        // Another thread may have published first; everyone shares its tree
        let _ = slot.set(Arc::clone(&node));
        Ok(slot.get().map(Arc::clone).unwrap_or(node))
    }

    /// Validate `document` against the schema for `(domain, document_type)`
    pub fn validate(&self, document: &Value, document_type: &str, domain: &str) -> Result<ValidationResult> {
        let schema = self.load(domain, document_type)?;
        Ok(engine::validate_with(document, &schema, &self.options))
    }

    /// Resolve every registered schema, stopping at the first failure
    ///
    /// Returns the number of schemas checked.
    pub fn verify(&self) -> Result<usize> {
        for key in self.documents.keys() {
            self.load(&key.domain, &key.document_type)?;
        }
        tracing::info!(schemas = self.documents.len(), "every schema resolves");
        Ok(self.documents.len())
    }

    /// Documents the schema references, directly or transitively
    pub fn dependencies(&self, domain: &str, document_type: &str) -> Result<Vec<SchemaKey>> {
        let key = self.registered(domain, document_type)?;
        Ok(self.graph.dependencies(&key))
    }

    /// Documents the schema's own `$ref`s point at
    pub fn direct_dependencies(&self, domain: &str, document_type: &str) -> Result<Vec<SchemaKey>> {
        let key = self.registered(domain, document_type)?;
        Ok(self.graph.refs_out(&key).into_iter().cloned().collect())
    }

    fn registered(&self, domain: &str, document_type: &str) -> Result<SchemaKey> {
        let key = SchemaKey::new(domain, document_type);
        if self.documents.contains_key(&key) {
            return Ok(key);
        }
        Err(SchemaError::NotFound {
            suggestion: self.suggest(&key),
            domain: key.domain,
            document_type: key.document_type,
        })
    }

    /// Groups of documents whose references form a cycle
    pub fn cycles(&self) -> Vec<Vec<SchemaKey>> {
        self.graph.cycles()
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> impl Iterator<Item = &SchemaKey> {
        self.documents.keys()
    }

    pub fn document(&self, key: &SchemaKey) -> Option<&SchemaDocument> {
        self.documents.get(key)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Fingerprint of the whole catalog
    pub fn bundle_hash(&self) -> Checksum {
        Checksum::combine(self.documents.values().map(|doc| &doc.checksum))
    }

    /// Closest registered key to an unknown one
    fn suggest(&self, wanted: &SchemaKey) -> Option<String> {
        let matcher = SkimMatcherV2::default();
        let query = wanted.catalog_path();

        self.documents
            .keys()
            .filter_map(|key| {
                let candidate = key.catalog_path();
                let score = matcher
                    .fuzzy_match(&candidate, &query)
                    .max(matcher.fuzzy_match(&query, &candidate))?;
                Some((score, candidate))
            })
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))
            .map(|(_, candidate)| candidate)
    }
}
