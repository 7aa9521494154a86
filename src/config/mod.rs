pub mod env_file;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::parser::DEFAULT_CHUNK_SIZE;
use env_file::EnvironmentMap;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Environment variables accepted for the API key, in lookup order
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Optional settings file, `~/.config/pdfask/config.toml` by default
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub model: Option<String>,
    pub chunk_size: Option<usize>,
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    pub base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pdfask"))
    }

    /// Get the default configuration file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration from `path`, or from the default location
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(Error::Configuration(format!(
                        "Configuration file not found at {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match Self::config_path() {
                Some(path) if path.is_file() => path,
                _ => {
                    debug!("No configuration file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&config_path).map_err(|e| {
            Error::Configuration(format!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config = Self::parse(&content).map_err(|e| {
            Error::Configuration(format!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            ))
        })?;

        debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Values given on the command line, which win over every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub chunk_size: Option<usize>,
    pub max_retries: Option<u32>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub chunk_size: usize,
    pub max_retries: u32,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Settings {
    /// Resolve settings from the command line, the config file, the process
    /// environment and the `.env` variables
    ///
    /// Fails when no API key can be found, before anything touches the
    /// network.
    pub fn resolve(overrides: Overrides, config: Config, env: &EnvironmentMap) -> Result<Self> {
        Self::resolve_with(overrides, config, |name| {
            std::env::var(name)
                .ok()
                .or_else(|| env.get(name).cloned())
                .filter(|value| !value.is_empty())
        })
    }

    fn resolve_with(
        overrides: Overrides,
        config: Config,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|name| lookup(*name))
            .or_else(|| expand_env_var(&config.gemini.api_key, &lookup))
            .ok_or_else(|| {
                Error::Configuration(
                    "GEMINI_API_KEY is not set. Configure it in env or .env.".to_string(),
                )
            })?;

        let model = overrides
            .model
            .or_else(|| lookup("GEMINI_MODEL"))
            .or(config.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = lookup("GEMINI_BASE_URL")
            .or(config.gemini.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            chunk_size: overrides
                .chunk_size
                .or(config.chunk_size)
                .unwrap_or(DEFAULT_CHUNK_SIZE)
                .max(1),
            max_retries: overrides
                .max_retries
                .or(config.max_retries)
                .unwrap_or(DEFAULT_MAX_RETRIES),
            temperature: config.gemini.temperature,
            max_output_tokens: config.gemini.max_output_tokens,
        })
    }
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    let expanded = if value.starts_with("${") && value.ends_with('}') {
        lookup(&value[2..value.len() - 1])
    } else if let Some(var_name) = value.strip_prefix('$') {
        lookup(var_name)
    } else {
        Some(value.to_string())
    };
    expanded.filter(|value| !value.is_empty())
}
