//! Schema Validator CLI
//!
//! Validates registry documents against the schema catalog and inspects
//! the catalog itself.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use registry_schemas::{SchemaRegistry, ValidatorConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-validator")]
#[command(about = "Validate registry documents against the schema catalog")]
struct Cli {
    /// Configuration file layered over the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Load schemas from this directory instead of the embedded catalog
    #[arg(short, long, global = true)]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON document
    Validate {
        /// Schema domain (e.g. mhr, ppr)
        #[arg(short, long)]
        domain: String,
        /// Document type within the domain (e.g. note)
        #[arg(short = 't', long = "type")]
        document_type: String,
        /// JSON file to validate
        file: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the schemas in the catalog
    List,

    /// Resolve every schema and report broken references
    Verify,

    /// Show the documents a schema depends on
    Deps {
        #[arg(short, long)]
        domain: String,
        #[arg(short = 't', long = "type")]
        document_type: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the command succeeded
fn run(cli: Cli) -> Result<bool> {
    let config_path = cli.config.as_deref().map(|p| p.to_string_lossy().into_owned());
    let mut config = ValidatorConfig::load_from(config_path.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.schema_dir {
        config.registry.schema_dir = Some(dir);
    }

    let registry = SchemaRegistry::from_config(&config).context("building schema registry")?;

    match cli.command {
        Commands::Validate {
            domain,
            document_type,
            file,
            json,
        } => {
            let text = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            let document: serde_json::Value =
                serde_json::from_str(&text).with_context(|| format!("parsing {}", file.display()))?;

            let result = registry.validate(&document, &document_type, &domain)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if result.is_valid() {
                println!("✅ {} is a valid {}/{}", file.display(), domain, document_type);
            } else {
                println!(
                    "❌ {} is not a valid {}/{} ({} errors)",
                    file.display(),
                    domain,
                    document_type,
                    result.errors().len()
                );
                for error in result.errors() {
                    println!("   └─ {}", error);
                }
            }
            Ok(result.is_valid())
        }

        Commands::List => {
            for key in registry.keys() {
                let title = registry.document(key).and_then(|doc| doc.title()).unwrap_or("");
                println!("{:<32} {}", key.to_string(), title);
            }
            println!();
            println!("{} schemas, bundle {}", registry.len(), registry.bundle_hash());
            Ok(true)
        }

        Commands::Verify => {
            let count = registry.verify()?;
            let cycles = registry.cycles();
            for cycle in &cycles {
                let members: Vec<String> = cycle.iter().map(|k| k.to_string()).collect();
                println!("❌ reference cycle: {}", members.join(" -> "));
            }
            if cycles.is_empty() {
                println!("✅ {} schemas resolve", count);
            }
            Ok(cycles.is_empty())
        }

        Commands::Deps { domain, document_type } => {
            let deps = registry.dependencies(&domain, &document_type)?;
            let direct = registry.direct_dependencies(&domain, &document_type)?;
            if deps.is_empty() {
                println!("{}/{} has no dependencies", domain, document_type);
            }
            for dep in deps {
                let marker = if direct.contains(&dep) { "direct" } else { "transitive" };
                println!("{:<32} {}", dep.to_string(), marker);
            }
            Ok(true)
        }
    }
}
