//! Configuration for the schema catalog and validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (registry-schemas.toml)
//! - Environment variables (REGISTRY_SCHEMAS__*)
//!
//! ## Example config file (registry-schemas.toml):
//! ```toml
//! [registry]
//! schema_dir = "./schemas"
//! preload = true
//! domains = ["mhr", "ppr"]
//!
//! [validation]
//! check_formats = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::ValidationOptions;
use crate::graph::LoadConfig;

const CONFIG_FILE: &str = "registry-schemas.toml";

/// Main configuration for the validator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Where schemas come from and how eagerly they are resolved
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Schema catalog configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Load schemas from this directory instead of the embedded catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_dir: Option<PathBuf>,

    /// Resolve every schema when the registry is built
    #[serde(default)]
    pub preload: bool,

    /// Only load these domains (all when empty)
    #[serde(default)]
    pub domains: Vec<String>,
}

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Check `format` keywords rather than treating them as annotations
    #[serde(default = "default_true")]
    pub check_formats: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { check_formats: true }
    }
}

impl ValidatorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering `config_path` over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "registry-schemas.toml",
            ".registry-schemas.toml",
            "config/registry-schemas.toml",
        ];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(project_dirs) = directories::ProjectDirs::from("dev", "registry", "schemas") {
            let xdg_config = project_dirs.config_dir().join(CONFIG_FILE);
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // REGISTRY_SCHEMAS__VALIDATION__CHECK_FORMATS=false
        builder = builder.add_source(
            Environment::with_prefix("REGISTRY_SCHEMAS")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("registry.domains")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let loaded: Self = config.try_deserialize()?;
        tracing::debug!(?loaded, "loaded validator configuration");
        Ok(loaded)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Schema directory, resolved against the working directory
    pub fn schema_dir(&self) -> Option<PathBuf> {
        self.registry.schema_dir.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                std::env::current_dir().unwrap_or_default().join(p)
            }
        })
    }

    pub fn load_config(&self) -> LoadConfig {
        LoadConfig {
            domains: self.registry.domains.clone(),
        }
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            check_formats: self.validation.check_formats,
        }
    }
}
