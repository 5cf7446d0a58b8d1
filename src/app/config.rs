use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_FILE_NAME, CREDENTIALS_FILE_NAME, DEFAULT_API_BASE_URL,
    DEFAULT_PREVIEW_CHARS, LOCAL_CONFIG_DIR,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Credential storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every path is appended to
    pub base_url: String,
    /// Request timeout; unset keeps the HTTP client's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Credential storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Keep the token on disk between runs
    pub persist: bool,
    /// Override for the credentials file location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persist: true,
            credentials_file: None,
        }
    }
}

impl StorageConfig {
    /// Configured credentials file, or the default one in the config directory
    pub fn credentials_path(&self) -> Result<PathBuf> {
        match &self.credentials_file {
            Some(path) => Ok(path.clone()),
            None => Ok(get_config_dir()?.join(CREDENTIALS_FILE_NAME)),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Characters of description shown on each note card
    pub preview_chars: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join(CONFIG_FILE_NAME);
    let local_config = PathBuf::from(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME);
    load_config_from(&[global_config, local_config])
}

/// Load configuration from explicit files (later files win), then the environment
pub fn load_config_from(files: &[PathBuf]) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    // Environment variables (TAREAS_ prefix, `__` for nesting)
    figment = figment.merge(Env::prefixed(CONFIG_ENV_PREFIX).split("__"));

    figment
        .extract()
        .context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tareas") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("tareas");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join(CONFIG_FILE_NAME)
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<()> {
    let config_file = get_config_dir()?.join(CONFIG_FILE_NAME);
    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        println!("Created default configuration at: {}", config_file.display());
    }

    let local_example = PathBuf::from(LOCAL_CONFIG_DIR).join("config.toml.example");
    if !local_example.exists() {
        write_local_example(&local_example)?;
        println!("Created example configuration at: {}", local_example.display());
    }

    Ok(())
}

fn write_local_example(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let example_config = r#"# Tareas Project Configuration
# This file overrides global settings for this directory

[api]
base_url = "http://localhost:8080/api"
# timeout_secs = 30

[storage]
persist = true
# credentials_file = "/path/to/credentials.toml"

[ui]
preview_chars = 200
"#;
    std::fs::write(path, example_config)?;
    Ok(())
}
