use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server configuration.
///
/// Loadable from a TOML file; every field has a default so a partial file
/// (or none at all) is enough to start a server.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Root directory of the filesystem store. `None` runs an in-memory
    /// registry, useful for tests and throwaway sessions.
    pub data_dir: Option<PathBuf>,
    /// Allow cross-origin requests (development use).
    pub allow_cors: bool,
    /// Maximum accepted request body, in bytes. Compile outputs for large
    /// contracts run to tens of megabytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7000".parse().unwrap(),
            data_dir: None,
            allow_cors: false,
            max_body_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &std::path::Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ServerError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:7000".parse::<SocketAddr>().unwrap());
        assert!(c.data_dir.is_none());
        assert!(!c.allow_cors);
        assert_eq!(c.max_body_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: ServerConfig = toml::from_str("bind_addr = \"0.0.0.0:7001\"").unwrap();
        assert_eq!(c.bind_addr, "0.0.0.0:7001".parse::<SocketAddr>().unwrap());
        assert_eq!(c.max_body_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("artifex.toml");
        std::fs::write(&file, "allow_cors = true\ndata_dir = \"/tmp/artifex-db\"\n").unwrap();

        let c = ServerConfig::load(&file).unwrap();
        assert!(c.allow_cors);
        assert_eq!(c.data_dir, Some(PathBuf::from("/tmp/artifex-db")));
    }
}
