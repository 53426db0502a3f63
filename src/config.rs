use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::domain::ordering::{OrderingScope, ResourceRegistry, SortableResource};

// ============================================================================
// Configuration
// ============================================================================
//
// Loaded from the TOML file named by SORTING_CONFIG (default: sorting.toml).
// DATABASE_URL overrides [database].url so secrets can stay out of the file.
//
// ============================================================================

const DEFAULT_CONFIG_PATH: &str = "sorting.toml";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// One `[[resources]]` entry.
#[derive(Debug, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    /// Defaults to `name`.
    pub model: Option<String>,
    pub table: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_order_column")]
    pub order_column: String,
    pub group_column: Option<String>,
    #[serde(default = "default_step_moves")]
    pub step_moves: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_order_column() -> String {
    "sort_order".to_string()
}

fn default_step_moves() -> bool {
    true
}

impl AppConfig {
    /// Load from SORTING_CONFIG and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("SORTING_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env_overrides(std::env::var("DATABASE_URL").ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_env_overrides(&mut self, database_url: Option<String>) {
        if let Some(url) = database_url.filter(|u| !u.is_empty()) {
            self.database.url = Some(url);
        }
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database
            .url
            .as_deref()
            .ok_or_else(|| anyhow!("No database url: set [database].url or DATABASE_URL"))
    }

    /// Validate every resource scope and build the registry.
    pub fn build_registry(&self) -> Result<ResourceRegistry> {
        let resources = self
            .resources
            .iter()
            .map(|r| -> Result<SortableResource> {
                let scope = OrderingScope::new(
                    r.table.as_str(),
                    r.id_column.as_str(),
                    r.order_column.as_str(),
                    r.group_column.clone(),
                )
                .with_context(|| format!("Invalid scope for resource '{}'", r.name))?;

                Ok(SortableResource {
                    name: r.name.clone(),
                    model: r.model.clone().unwrap_or_else(|| r.name.clone()),
                    scope,
                    step_moves: r.step_moves,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResourceRegistry::new(resources)?)
    }
}
