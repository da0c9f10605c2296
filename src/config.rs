//! Configuration management for schema loading and binding
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemabind.toml)
//! - Environment variables (SCHEMABIND_*)
//!
//! ## Example config file (schemabind.toml):
//! ```toml
//! [catalog]
//! documents = ["schemas/engine.tree.json", "schemas/game.tree.json"]
//!
//! [binder]
//! metaschema = "ecs"
//! instance = "schemas/layout.tree.json"
//!
//! [documentation]
//! schema = "ecs"
//! files = ["docs/component_documentation.txt"]
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the schema toolchain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindConfig {
    /// Catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Binder settings
    #[serde(default)]
    pub binder: BinderConfig,

    /// Documentation settings
    #[serde(default)]
    pub documentation: DocumentationConfig,
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Schema documents to load, in dependency order (parents first)
    #[serde(default)]
    pub documents: Vec<PathBuf>,
}

/// Binder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinderConfig {
    /// Id of the metaschema registry instances bind against
    #[serde(default = "default_metaschema")]
    pub metaschema: String,

    /// Instance document to bind
    #[serde(default)]
    pub instance: Option<PathBuf>,
}

/// Documentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentationConfig {
    /// Id of the registry receiving documentation merges
    #[serde(default = "default_metaschema")]
    pub schema: String,

    /// Documentation files to merge, in order (later files win)
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

// Default value functions
fn default_metaschema() -> String {
    "ecs".to_string()
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            metaschema: default_metaschema(),
            instance: None,
        }
    }
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            schema: default_metaschema(),
            files: Vec::new(),
        }
    }
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            binder: BinderConfig::default(),
            documentation: DocumentationConfig::default(),
        }
    }
}

impl BindConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "schemabind.toml",
            ".schemabind.toml",
            "config/schemabind.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schemabind") {
            let xdg_config = config_dir.config_dir().join("schemabind.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (SCHEMABIND_*)
        builder = builder.add_source(
            Environment::with_prefix("SCHEMABIND")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Schema document paths (relative paths resolve against the working dir)
    pub fn document_paths(&self) -> Vec<PathBuf> {
        self.catalog.documents.iter().map(|p| resolve(p)).collect()
    }

    /// The instance document path, if configured
    pub fn instance_path(&self) -> Option<PathBuf> {
        self.binder.instance.as_ref().map(|p| resolve(p))
    }

    /// Documentation file paths
    pub fn documentation_paths(&self) -> Vec<PathBuf> {
        self.documentation.files.iter().map(|p| resolve(p)).collect()
    }
}

fn resolve(path: &std::path::Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}
