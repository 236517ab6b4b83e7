use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: Option<String>,
    pub pool_size: u32,
    pub timeout_seconds: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    pub timeout_seconds: u64,
}

impl QuerySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub query: QuerySettings,
    pub log: LogSettings,
}

impl Settings {
    /// Reads `appsettings.{toml,json,yaml}` if present, then `PROMO__*`
    /// environment variables (e.g. `PROMO__DATABASE__URL`).
    pub fn load() -> Result<Settings, ConfigError> {
        Self::builder()?
            .add_source(File::with_name("appsettings").required(false))
            .add_source(
                Environment::with_prefix("PROMO")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins"),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3001)?
            .set_default("database.backend", "postgres")?
            .set_default("database.pool_size", 10)?
            .set_default("database.timeout_seconds", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("query.timeout_seconds", 10)?
            .set_default("log.format", "pretty")
    }
}
