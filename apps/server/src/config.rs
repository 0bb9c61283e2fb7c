//! Server configuration from environment variables.

use std::path::PathBuf;

/// Runtime settings for the shell server.
///
/// Read from the environment after `.env` has been loaded:
/// - HOST: bind address (default 0.0.0.0)
/// - PORT: bind port (default 3000)
/// - ASSET_DIR: directory holding `sounds/` and `images/` (default ./assets)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub asset_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {:?}: {}", value, e))?,
            Err(_) => 3000,
        };
        let asset_dir = std::env::var("ASSET_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("assets"));

        Ok(Self {
            host,
            port,
            asset_dir,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            asset_dir: PathBuf::from("assets"),
        }
    }
}
