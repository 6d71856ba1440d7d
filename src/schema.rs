//! Schema catalog types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::checksum::Checksum;

/// Two-part key identifying a schema: the registry domain and the document type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaKey {
    /// Registry domain (e.g., "mhr", "ppr")
    pub domain: String,
    /// Document type within the domain (e.g., "note", "vehicleCollateral")
    pub document_type: String,
}

impl SchemaKey {
    pub fn new(domain: impl Into<String>, document_type: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            document_type: document_type.into(),
        }
    }

    /// Catalog path of the document, also usable as a reference base
    pub fn catalog_path(&self) -> String {
        format!("{}/{}", self.domain, self.document_type)
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain, self.document_type)
    }
}

/// A single schema document as it was read from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Catalog key
    pub key: SchemaKey,
    /// The `$id` declared by the document, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The raw schema content
    pub content: serde_json::Value,
    /// Source path relative to the catalog root
    pub source_path: PathBuf,
    /// SHA256 of the source text
    pub checksum: Checksum,
}

impl SchemaDocument {
    /// Parse a schema document from its source text
    pub fn parse(key: SchemaKey, source_path: PathBuf, text: &str) -> crate::Result<Self> {
        let content: serde_json::Value = serde_json::from_str(text)?;
        let id = content
            .get("$id")
            .and_then(|v| v.as_str())
            .map(|s| s.trim_end_matches('#').to_string());

        Ok(Self {
            key,
            id,
            content,
            source_path,
            checksum: Checksum::from_str(text),
        })
    }

    /// Base URI used to resolve relative references inside this document
    pub fn base_uri(&self) -> String {
        self.id.clone().unwrap_or_else(|| self.key.catalog_path())
    }

    /// Schema title, when the document declares one
    pub fn title(&self) -> Option<&str> {
        self.content.get("title").and_then(|v| v.as_str())
    }
}
