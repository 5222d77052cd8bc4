//! Static server configuration.
//!
//! Sources, lowest priority first:
//! 1. `config/default.toml`, compiled into the binary
//! 2. an optional TOML file (`--config` or `COURSE_SEARCH_CONFIG`)
//! 3. `COURSE_SEARCH__<SECTION>__<KEY>` environment variables

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Environment variable naming an extra config file.
pub const CONFIG_PATH_ENV: &str = "COURSE_SEARCH_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub search: SearchConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// daily, hourly, minutely or never
    pub file_rotation: String,
    pub service_name: String,
    pub deployment_environment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Elasticsearch,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: Option<String>,
    pub index: String,
    pub timeout_seconds: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    /// Cap on returned suggestions; unlimited when unset.
    #[serde(default)]
    pub max_suggestions: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    /// Index sample courses at startup.
    pub enabled: bool,
    /// JSON file to index instead of the sample bundled into the binary.
    #[serde(default)]
    pub sample_data_path: Option<PathBuf>,
    pub recreate_index: bool,
}

impl Config {
    /// Load defaults, then `path` (if given), then the environment.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            ConfigBuilder::builder().add_source(File::from_str(DEFAULT_CONFIG_TOML, FileFormat::Toml));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("COURSE_SEARCH")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        Self::from_builder(builder)
    }

    /// Defaults only, without files or environment.
    pub fn defaults() -> Result<Self> {
        Self::from_builder(
            ConfigBuilder::builder().add_source(File::from_str(DEFAULT_CONFIG_TOML, FileFormat::Toml)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::Config(format!("Failed to load configuration: {e}")))
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be non-zero".to_string());
        }
        if self.store.index.trim().is_empty() {
            return Err("store.index must not be empty".to_string());
        }
        if self.store.backend == StoreBackend::Elasticsearch
            && self.store.url.as_deref().map_or(true, |u| u.trim().is_empty())
        {
            return Err("store.url is required for the elasticsearch backend".to_string());
        }
        if self.search.max_page_size == 0 {
            return Err("search.max_page_size must be at least 1".to_string());
        }
        if !(1..=self.search.max_page_size).contains(&self.search.default_page_size) {
            return Err(format!(
                "search.default_page_size must be between 1 and {}",
                self.search.max_page_size
            ));
        }
        if self.search.max_suggestions == Some(0) {
            return Err("search.max_suggestions must be at least 1 when set".to_string());
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e| Error::Config(format!("Invalid server.host '{}': {e}", self.server.host)))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
