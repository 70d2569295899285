//! Server configuration, loaded from TOML

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "BOOKSHELF_CONFIG";

/// Config file used when `BOOKSHELF_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "bookshelf.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid listen address {0}")]
    InvalidAddress(String),
}

/// Configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// The persisted collection document
    pub books_file: PathBuf,
    /// Staging directory for uploaded files
    pub upload_dir: PathBuf,
    /// Request body limit, applied to uploads
    pub max_upload_bytes: usize,
    /// Fallback `tracing` filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            books_file: PathBuf::from("books.json"),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// `$BOOKSHELF_CONFIG`, or `bookshelf.toml` in the working directory
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}
