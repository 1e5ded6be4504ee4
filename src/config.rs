//! Application configuration.

use crate::consts::cli_consts::DB_PATH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::{fs, path::Path};

/// Where the dashboard finds the database bridge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Hostname of the WebSocket server.
    pub host: String,
    /// Port of the WebSocket server.
    pub port: u16,
    /// HTTP path of the WebSocket route.
    pub path: String,
    /// Use TLS WebSockets.
    pub secure: bool,
    /// Default database name.
    pub db: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
            path: DB_PATH.to_string(),
            secure: false,
            db: "test".to_string(),
        }
    }
}

impl SessionConfig {
    /// WebSocket URL of the bridge.
    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        format!(
            "{}://{}:{}{}?db={}",
            scheme,
            self.host,
            self.port,
            path,
            urlencoding::encode(&self.db)
        )
    }

    /// Base HTTP URL of the server hosting the bridge.
    pub fn http_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// Settings of the `serve` command.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to.
    pub host: String,
    /// Directory holding the built client (`index.html` and assets).
    pub dist_dir: PathBuf,
    /// HTTP path of the WebSocket bridge.
    pub db_path: String,
    /// Database name served by the bridge.
    pub db: String,
    /// Accept queries on any table. Not safe in production.
    pub allow_any_query: bool,
    /// Tables created at start-up besides the model tables.
    pub extra_tables: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            dist_dir: PathBuf::from("dist"),
            db_path: DB_PATH.to_string(),
            db: "test".to_string(),
            allow_any_query: true,
            extra_tables: vec!["turtles".to_string()],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub server: ServerSettings,
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the file at `path` if there is one, defaults otherwise.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Default location of the config file: `~/.pascani/config.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home_path = home::home_dir().ok_or(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "Failed to get home directory",
    ))?;
    Ok(home_path.join(".pascani").join("config.json"))
}
