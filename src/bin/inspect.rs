//! Schema Inspector CLI
//!
//! Loads schema documents and inspects the resulting registries: ids,
//! inheritance, declared types, and documentation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use schemabind::config::BindConfig;
use schemabind::{loader, DocTable, Schema, SchemaCatalog, SchemaError, TypeKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-inspect")]
#[command(about = "Inspect schema registries loaded from tree documents")]
struct Cli {
    /// Schema document to load, in dependency order (repeatable)
    #[arg(short, long = "document")]
    documents: Vec<PathBuf>,

    /// Path to a config file (schemabind.toml)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all loaded registries
    Schemas,

    /// List the types of one registry in declaration order
    Types {
        /// Registry id
        #[arg(short, long)]
        schema: String,
    },

    /// Resolve a type name through a registry's inheritance chain
    Lookup {
        /// Registry id
        #[arg(short, long)]
        schema: String,
        /// Type name to resolve
        name: String,
    },

    /// Show documentation for a record kind
    Docs {
        /// Registry id
        #[arg(short, long)]
        schema: String,
        /// Record kind
        kind: String,
        /// Field name (all fields when omitted)
        field: Option<String>,
    },
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
    let mut catalog = build_catalog(&config, &cli.documents)?;
    merge_documentation(&config, &mut catalog)?;

    match cli.command {
        Commands::Schemas => {
            if catalog.is_empty() {
                println!("No schemas loaded (pass --document or configure [catalog].documents)");
                return Ok(());
            }

            for schema in catalog.iter() {
                let parent = schema.parent_id().unwrap_or("-");
                let fingerprint = schema
                    .fingerprint()
                    .map(|f| f.as_str()[..12].to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  parent: {}  sized: {}  types: {}  fingerprint: {}  loaded: {}",
                    schema.id(),
                    parent,
                    schema.is_sized(),
                    schema.len(),
                    fingerprint,
                    schema.loaded_at().format("%Y-%m-%d %H:%M:%S"),
                );
            }
            Ok(())
        }

        Commands::Types { schema } => {
            let schema = get_schema(&catalog, &schema)?;

            for (name, ty) in schema.types() {
                let size = ty
                    .expected_size()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let mut flags = String::new();
                if ty.is_array() {
                    flags.push_str("  [field array]");
                }
                if name != ty.name() {
                    flags.push_str(&format!("  (alias of {})", ty.name()));
                }
                println!(
                    "{:<32} {:<10} size: {:<6} display: {}{}",
                    name,
                    ty.category(),
                    size,
                    ty.nice_name(),
                    flags,
                );
            }
            Ok(())
        }

        Commands::Lookup { schema, name } => {
            let schema = get_schema(&catalog, &schema)?;

            match schema.get_type(&catalog, &name) {
                Ok(ty) => {
                    println!("✅ {} ({})", ty.name(), ty.category());
                    if let Some(size) = ty.expected_size() {
                        println!("   expected size: {}", size);
                    }
                    if ty.nice_name() != ty.name() {
                        println!("   display name: {}", ty.nice_name());
                    }
                    match ty.kind() {
                        TypeKind::Object { fields, .. } | TypeKind::MultiAttr { fields } => {
                            for (field, field_ty) in fields {
                                println!("   └─ {}: {}", field, field_ty.name());
                            }
                        }
                        TypeKind::List {
                            entry_name, fields, ..
                        } => {
                            println!("   entry name: {}", entry_name);
                            for (field, field_ty) in fields {
                                println!("   └─ {}: {}", field, field_ty.name());
                            }
                        }
                        TypeKind::Primitive { scalar } => {
                            println!("   scalar: {}", scalar.name());
                        }
                    }
                    Ok(())
                }
                Err(SchemaError::UnregisteredType { name }) => {
                    println!("❌ Type '{}' not found", name);
                    let suggestions = suggest(&catalog, schema, &name, 5);
                    if !suggestions.is_empty() {
                        println!();
                        println!("Did you mean:");
                        for suggestion in suggestions {
                            println!("  - {}", suggestion);
                        }
                    }
                    std::process::exit(1);
                }
                Err(e) => Err(e.into()),
            }
        }

        Commands::Docs {
            schema,
            kind,
            field,
        } => {
            let schema = get_schema(&catalog, &schema)?;

            match field {
                Some(field) => match schema.documentation(&kind, &field) {
                    Some(description) => {
                        println!("{}.{}: {}", kind, field, description);
                        Ok(())
                    }
                    None => {
                        println!("❌ No documentation for {}.{}", kind, field);
                        std::process::exit(1);
                    }
                },
                None => match schema.docs().fields(&kind) {
                    Some(fields) if !fields.is_empty() => {
                        println!("{}:", kind);
                        for (field, description) in fields {
                            println!("  {:<24} {}", field, description);
                        }
                        Ok(())
                    }
                    _ => {
                        println!("❌ No documentation for record kind '{}'", kind);
                        std::process::exit(1);
                    }
                },
            }
        }
    }
}

fn build_catalog(
    config: &BindConfig,
    documents: &[PathBuf],
) -> Result<SchemaCatalog, Box<dyn std::error::Error>> {
    let mut catalog = SchemaCatalog::new();
    for path in config.document_paths() {
        loader::load_file(&mut catalog, &path)?;
    }
    for path in documents {
        loader::load_file(&mut catalog, path)?;
    }
    Ok(catalog)
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

fn get_schema<'a>(
    catalog: &'a SchemaCatalog,
    id: &str,
) -> Result<&'a Schema, Box<dyn std::error::Error>> {
    catalog
        .get(id)
        .ok_or_else(|| SchemaError::UnknownSchema { id: id.to_string() }.into())
}

/// Fuzzy-match a missed name against every name in the inheritance chain
fn suggest(catalog: &SchemaCatalog, schema: &Schema, query: &str, limit: usize) -> Vec<String> {
    use fuzzy_matcher::skim::SkimMatcherV2;
    use fuzzy_matcher::FuzzyMatcher;

    let matcher = SkimMatcherV2::default();
    let mut results: Vec<(i64, &str)> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    let mut current = Some(schema);
    while let Some(level) = current {
        for name in level.type_names() {
            if !seen.insert(name) {
                continue;
            }
            if let Some(score) = matcher.fuzzy_match(name, query) {
                results.push((score, name));
            }
        }
        current = level.parent_id().and_then(|parent| catalog.get(parent));
    }

    // Sort by score descending
    results.sort_by(|a, b| b.0.cmp(&a.0));

    results
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}
