//! Server configuration loaded from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the server listens on.
    pub addr: String,
    /// Default tracing filter, overridden by `RUST_LOG`.
    pub log_filter: String,
    #[serde(rename = "static")]
    pub static_files: Option<StaticMount>,
}

/// A directory served under a URL prefix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StaticMount {
    pub path: String,
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: "127.0.0.1:9999".to_string(),
            log_filter: "info".to_string(),
            static_files: None,
        }
    }
}

impl ServerConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<ServerConfig> {
        let content = fs::read_to_string(path)?;
        ServerConfig::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<ServerConfig> {
        let config: ServerConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.addr.is_empty() {
            return Err(Error::Config("addr can not be empty".to_string()));
        }
        if let Some(mount) = &self.static_files {
            if !mount.path.starts_with('/') {
                return Err(Error::Config(format!(
                    "static path must begin with '/', got '{}'",
                    mount.path
                )));
            }
        }
        Ok(())
    }
}
