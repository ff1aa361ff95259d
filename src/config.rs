use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::gateway::{self, Temperature};

/// Main expertbot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub store: StoreConfig,
    pub api: ApiConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Persona store file
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// OpenAI-compatible API root
    pub base_url: String,
    /// Environment variable holding the API key
    pub key_env: String,
    /// Whole-request timeout, 0 disables it
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub model: String,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            store: StoreConfig::default(),
            api: ApiConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Config::expertbot_dir().join("agents.json"),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: gateway::MODELS[0].0.to_string(),
            temperature: 0.0,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check EXPERTBOT_CONFIG env var
        if let Ok(env_path) = std::env::var("EXPERTBOT_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from EXPERTBOT_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try EXPERTBOT_DIR/expertbot.yaml
        if let Ok(dir) = std::env::var("EXPERTBOT_DIR") {
            let path = PathBuf::from(dir).join("expertbot.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from EXPERTBOT_DIR: {}", e);
                    }
                }
            }
        }

        // Try ~/.config/expertbot/expertbot.yaml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("expertbot").join("expertbot.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./expertbot.yaml (for development)
        let local_config = PathBuf::from("expertbot.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        Temperature::new(self.defaults.temperature).map_err(|e| eyre::eyre!("defaults.temperature: {}", e))?;
        if !gateway::model_names().contains(&self.defaults.model.as_str()) {
            eyre::bail!(
                "defaults.model: unknown model '{}' (available: {})",
                self.defaults.model,
                gateway::model_names().join(", ")
            );
        }
        if self.api.key_env.trim().is_empty() {
            eyre::bail!("api.key_env must not be empty");
        }
        Ok(())
    }

    /// Get the expertbot directory (store, .env, config)
    pub fn expertbot_dir() -> PathBuf {
        std::env::var("EXPERTBOT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("expertbot"))
    }

    /// Secondary source for the API key
    pub fn env_file() -> PathBuf {
        Self::expertbot_dir().join(".env")
    }

    /// Resolved persona store path
    pub fn store_path(&self) -> PathBuf {
        Self::expand_path(&self.store.path)
    }

    pub fn default_temperature(&self) -> Temperature {
        Temperature::new(self.defaults.temperature).unwrap_or_default()
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}
