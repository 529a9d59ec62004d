//! Server configuration, read from an optional `folio.toml` and then
//! overridden by `FOLIO_*` environment variables and CLI flags.

use folio_auth::{Credentials, DEV_EMAIL, DEV_PASSWORD};
use folio_storage::{DocumentStore, DuckDbStore, MemoryStore, StorageResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Signing secret for the deployment.
pub const ENV_SECRET: &str = "FOLIO_SECRET";
/// Selects the DuckDB backend at the given path.
pub const ENV_DATABASE_PATH: &str = "FOLIO_DATABASE_PATH";

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which document store backs the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Duckdb,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Database file. Only used by the DuckDB backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Opens the configured store. A DuckDB backend without a path runs
    /// in memory.
    pub fn open(&self) -> StorageResult<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match (self.backend, &self.path) {
            (Backend::Memory, _) => Arc::new(MemoryStore::new()),
            (Backend::Duckdb, Some(path)) => Arc::new(DuckDbStore::open(path)?),
            (Backend::Duckdb, None) => Arc::new(DuckDbStore::open_in_memory()?),
        };
        info!("Opened {} document store", store.backend_name());
        Ok(store)
    }
}

/// User created in an empty users collection at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_email() -> String {
    DEV_EMAIL.to_string()
}

fn default_password() -> String {
    DEV_PASSWORD.to_string()
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            email: default_email(),
            password: default_password(),
        }
    }
}

impl SeedConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }
}

/// Login the admin prefills (or submits) on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoLogin {
    #[serde(default = "default_true", skip_serializing)]
    pub enabled: bool,
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_password")]
    pub password: String,
    /// Only fill the form; the user still submits it.
    #[serde(default = "default_true")]
    pub prefill_only: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AutoLogin {
    fn default() -> Self {
        Self {
            enabled: true,
            email: default_email(),
            password: default_password(),
            prefill_only: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub auto_login: AutoLogin,
}

impl AdminConfig {
    /// The auto-login to offer, if enabled.
    pub fn auto_login(&self) -> Option<&AutoLogin> {
        self.auto_login.enabled.then_some(&self.auto_login)
    }
}

/// Full server configuration parsed from `folio.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

fn default_http_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            http_port: default_http_port(),
            database: DatabaseConfig::default(),
            seed: SeedConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads `path` if given, otherwise the defaults, then applies the
    /// process environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Applies `FOLIO_*` overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(secret) = lookup(ENV_SECRET) {
            self.secret = secret;
        }
        if let Some(path) = lookup(ENV_DATABASE_PATH).filter(|p| !p.is_empty()) {
            self.database = DatabaseConfig {
                backend: Backend::Duckdb,
                path: Some(PathBuf::from(path)),
            };
        }
        self
    }
}
