//! Schema Check CLI
//!
//! Loads schema documents, binds an instance layout against a metaschema,
//! and reports every bound component field with its resolved type.

use std::path::PathBuf;

use clap::Parser;
use schemabind::config::BindConfig;
use schemabind::{bind_instance, loader, DocTable, SchemaCatalog, SchemaError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-check")]
#[command(about = "Validate an instance layout against a schema catalog")]
struct Cli {
    /// Schema document to load, in dependency order (repeatable)
    #[arg(short, long = "document")]
    documents: Vec<PathBuf>,

    /// Instance document to bind (falls back to [binder].instance)
    #[arg(short, long)]
    instance: Option<PathBuf>,

    /// Metaschema id to bind against (falls back to [binder].metaschema)
    #[arg(short, long)]
    metaschema: Option<String>,

    /// Path to a config file (schemabind.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Emit a machine-readable JSON summary
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = BindConfig::load_from(cli.config.as_deref())?;

    let mut catalog = SchemaCatalog::new();
    for path in config.document_paths() {
        loader::load_file(&mut catalog, &path)?;
    }
    for path in &cli.documents {
        loader::load_file(&mut catalog, path)?;
    }
    merge_documentation(&config, &mut catalog)?;

    let instance_path = cli
        .instance
        .or_else(|| config.instance_path())
        .ok_or("No instance document given (pass --instance or configure [binder].instance)")?;
    let metaschema = cli
        .metaschema
        .unwrap_or_else(|| config.binder.metaschema.clone());

    if !cli.json {
        println!(
            "🔍 Binding {} against metaschema '{}'",
            instance_path.display(),
            metaschema
        );
        println!();
    }

    let root = loader::read_document(&instance_path)?;
    let bound = match bind_instance(&catalog, &metaschema, &root) {
        Ok(bound) => bound,
        Err(e) => {
            println!("❌ Validation failed: {}", e);
            std::process::exit(1);
        }
    };

    let doc_schema = catalog.get(&config.documentation.schema);

    if cli.json {
        let mut report = serde_json::json!({
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "metaschema": bound.metaschema_id(),
            "schemas": catalog.ids().collect::<Vec<_>>(),
            "components": {}
        });

        for component in bound.components() {
            let fields: Vec<_> = component
                .fields
                .iter()
                .map(|field| {
                    serde_json::json!({
                        "name": field.name,
                        "type": field.ty.name(),
                        "category": field.ty.category(),
                        "declared_size": field.declared_size,
                        "documentation": doc_schema
                            .and_then(|s| s.documentation(&component.name, &field.name)),
                    })
                })
                .collect();

            report["components"][component.name.as_str()] =
                serde_json::json!({ "fields": fields });
        }

        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for component in bound.components() {
        println!("✅ {} ({} fields)", component.name, component.fields.len());
        for field in &component.fields {
            let doc = doc_schema
                .and_then(|s| s.documentation(&component.name, &field.name))
                .map(|d| format!("  # {}", d))
                .unwrap_or_default();
            println!(
                "   └─ {:<24} {:<20} size: {:<6}{}",
                field.name,
                field.ty.name(),
                field.declared_size,
                doc,
            );
        }
    }

    println!();
    println!("✅ {} component(s) bound against '{}'", bound.len(), metaschema);
    Ok(())
}

fn merge_documentation(
    config: &BindConfig,
    catalog: &mut SchemaCatalog,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.documentation.files.is_empty() {
        return Ok(());
    }

    let id = config.documentation.schema.clone();
    let schema = catalog
        .get_mut(&id)
        .ok_or(SchemaError::UnknownSchema { id })?;

    for path in config.documentation_paths() {
        let file = std::fs::File::open(&path)?;
        let table = DocTable::parse(std::io::BufReader::new(file))?;
        schema.merge_documentation(table);
    }
    Ok(())
}
