use std::path::{Path, PathBuf};

use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "venue-booking";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    database: String,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_log_file")]
    log_file: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_log_file() -> Option<String> {
    Some("error.log".to_string())
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: format!("~/.local/share/{APP_DIR}/booking.db"),
            debug: false,
            log_file: default_log_file(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join(APP_DIR).join("config.toml"))
    }

    /// Load the config at the default path, falling back to built-in defaults
    /// when no file exists there.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path().ok_or(eyre!("No config directory found"))?;

        if !config_path.exists() {
            log::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::from_file(&config_path)
    }

    /// Write the default config to the default path unless a file is already there.
    pub fn create_default() -> Result<PathBuf> {
        let config_path = Self::config_path().ok_or(eyre!("No config directory found"))?;
        Self::default().write_if_missing(&config_path)?;
        Ok(config_path)
    }

    fn write_if_missing(&self, path: &Path) -> Result<()> {
        if path.exists() {
            log::info!("Config file already exists at {}", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .context(format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Expand ~ to home directory
    fn expand_path(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    /// Get expanded database path
    pub fn database_path(&self) -> PathBuf {
        self.expand_path(&self.database)
    }

    /// Get expanded log file path, if file logging is configured
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(|path| self.expand_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "database = \"/tmp/booking.db\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.database_path(), PathBuf::from("/tmp/booking.db"));
        assert!(!config.debug);
        assert_eq!(config.log_file_path(), Some(PathBuf::from("error.log")));
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_from_file_reads_server_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "database = \"booking.db\"\ndebug = true\nlog_file = \"app.log\"\n\n[server]\nhost = \"0.0.0.0\"\nport = 8080\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert!(config.debug);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.log_file_path(), Some(PathBuf::from("app.log")));
    }

    #[test]
    fn test_from_file_missing_database_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debug = true\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_write_if_missing_round_trips_and_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::default().write_if_missing(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), Config::default());

        std::fs::write(&path, "database = \"other.db\"\n").unwrap();
        Config::default().write_if_missing(&path).unwrap();
        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded.database_path(), PathBuf::from("other.db"));
    }

    #[test]
    fn test_expand_home_prefix() {
        let config = Config::default();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                config.database_path(),
                home.join(".local/share/venue-booking/booking.db")
            );
        }
    }
}
