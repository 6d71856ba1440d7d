//! Registry Schemas
//!
//! Declarative validation of registry records (manufactured-home
//! registrations, notes, personal-property collateral) against a catalog of
//! JSON Schema documents shipped with the crate.
//!
//! ## Features
//!
//! - **Keyed Catalog**: every schema is addressed by `(domain, documentType)`
//! - **Reference Resolution**: `$ref`s are resolved once, cycles are rejected
//! - **Located Errors**: every violation names the failing path and constraint
//! - **Shared Cache**: resolved schemas are immutable and shared across threads
//!
//! ## Layout
//!
//! ```text
//! schemas/
//! ├── mhr/
//! │   ├── address.json
//! │   ├── note.json
//! │   ├── party.json
//! │   └── registration.json
//! └── ppr/
//!     └── vehicleCollateral.json
//! ```
//!
//! ## Example
//!
//! ```no_run
//! let note = serde_json::json!({"documentType": "EXNR", "nonResidentialReason": "OTHER"});
//! let (valid, errors) = registry_schemas::validate(&note, "note", "mhr")?.into_parts();
//! assert!(!valid);
//! for error in errors {
//!     println!("{}", error);
//! }
//! # Ok::<(), registry_schemas::SchemaError>(())
//! ```

pub mod checksum;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod registry;
pub mod report;
pub mod schema;

pub use checksum::Checksum;
pub use config::ValidatorConfig;
pub use engine::ValidationOptions;
pub use error::{Result, SchemaError};
pub use graph::SchemaNode;
pub use registry::SchemaRegistry;
pub use report::{ConstraintKind, ErrorRecord, PathSegment, ValidationResult};
pub use schema::{SchemaDocument, SchemaKey};

/// Validate `document` against the embedded schema for `(domain, document_type)`
pub fn validate(document: &serde_json::Value, document_type: &str, domain: &str) -> Result<ValidationResult> {
    SchemaRegistry::embedded()?.validate(document, document_type, domain)
}
