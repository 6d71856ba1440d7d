//! Schema Loading
//!
//! Reads schema documents from a filesystem directory or from the catalog
//! embedded at compile time. Both sources use the layout
//! `<domain>/<documentType>.json`.

use include_dir::Dir;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, SchemaError};
use crate::schema::{SchemaDocument, SchemaKey};

/// Configuration for schema loading
#[derive(Debug, Clone, Default)]
pub struct LoadConfig {
    /// Only load these domains (all domains when empty)
    pub domains: Vec<String>,
}

impl LoadConfig {
    fn accepts(&self, key: &SchemaKey) -> bool {
        self.domains.is_empty() || self.domains.iter().any(|d| d == &key.domain)
    }
}

/// Load schema documents from a filesystem directory
pub fn load_from_directory(schema_dir: &Path, config: &LoadConfig) -> Result<Vec<SchemaDocument>> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(schema_dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !path.is_file() || path.extension().map(|e| e != "json").unwrap_or(true) {
            continue;
        }

        let relative_path = path
            .strip_prefix(schema_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf());
        let Some(key) = key_for_path(&relative_path) else {
            tracing::warn!(path = %relative_path.display(), "skipping schema outside <domain>/<type>.json layout");
            continue;
        };
        if !config.accepts(&key) {
            continue;
        }

        let content = fs::read_to_string(path)?;
        documents.push(parse_document(key, relative_path, &content)?);
    }

    tracing::info!(dir = %schema_dir.display(), schemas = documents.len(), "loaded schema catalog from directory");
    Ok(documents)
}

/// Load schema documents from the embedded directory (compiled via include_dir!)
pub fn load_from_embedded(embedded_dir: &'static Dir<'static>, config: &LoadConfig) -> Result<Vec<SchemaDocument>> {
    let mut files: Vec<(&Path, &str)> = Vec::new();
    collect_embedded_files(embedded_dir, &mut files);
    files.sort_by(|a, b| a.0.cmp(b.0));

    let mut documents = Vec::with_capacity(files.len());
    for (path, content) in files {
        let Some(key) = key_for_path(path) else {
            continue;
        };
        if !config.accepts(&key) {
            continue;
        }
        documents.push(parse_document(key, path.to_path_buf(), content)?);
    }

    tracing::info!(schemas = documents.len(), "loaded embedded schema catalog");
    Ok(documents)
}

/// Recursively collect JSON files from embedded directory
fn collect_embedded_files<'a>(dir: &'a Dir<'static>, files: &mut Vec<(&'a Path, &'a str)>) {
    for file in dir.files() {
        let path = file.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Some(content) = file.contents_utf8() {
                files.push((path, content));
            }
        }
    }

    for subdir in dir.dirs() {
        collect_embedded_files(subdir, files);
    }
}

fn parse_document(key: SchemaKey, path: PathBuf, content: &str) -> Result<SchemaDocument> {
    SchemaDocument::parse(key, path.clone(), content).map_err(|e| match e {
        SchemaError::Json(err) => SchemaError::malformed(path.display().to_string(), format!("invalid JSON: {}", err)),
        other => other,
    })
}

/// `mhr/note.json` -> (mhr, note)
fn key_for_path(relative_path: &Path) -> Option<SchemaKey> {
    let mut components = relative_path.components();
    let domain = components.next()?.as_os_str().to_str()?;
    let file = components.next()?;
    if components.next().is_some() {
        return None;
    }
    let document_type = Path::new(file.as_os_str()).file_stem()?.to_str()?;
    Some(SchemaKey::new(domain, document_type))
}
