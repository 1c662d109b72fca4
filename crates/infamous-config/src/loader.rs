//! Configuration loading from YAML files with environment variable overrides.

use crate::schema::Config;
use infamous_common::InfamousError;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "INFAMOUS_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error(transparent)]
    Validation(#[from] InfamousError),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParse {
        /// Variable name.
        var: String,
        /// Parser message.
        message: String,
    },
}

impl From<ConfigError> for InfamousError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(inner) => inner,
            other => Self::config_with_source("failed to load configuration", other),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration, searching the usual locations.
    ///
    /// Order: explicit `path`, `INFAMOUS_CONFIG_PATH`, `config.yaml`,
    /// `config.yml`, then built-in defaults. Environment overrides are applied
    /// on top and the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let candidate = path
            .map(Path::to_path_buf)
            .or_else(|| env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(|| {
                ["config.yaml", "config.yml"]
                    .iter()
                    .map(PathBuf::from)
                    .find(|p| p.exists())
            });

        let mut config = match candidate {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::read_file(&path)?
            }
            None => {
                info!("No configuration file found, using defaults");
                Config::default()
            }
        };

        Self::apply_overrides(&mut config, |var| env::var(var).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file without applying overrides or validation.
    pub fn read_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides using `lookup` to resolve environment variables.
    pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("DISCORD_TOKEN") {
            debug!("DISCORD_TOKEN override applied");
            config.discord.token = token;
        }

        if let Some(prefix) = lookup("DISCORD_PREFIX") {
            config.discord.prefix = prefix;
        }

        if let Some(owners) = lookup("DISCORD_OWNER_IDS") {
            config.discord.owner_ids = owners
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u64>().map_err(|e| ConfigError::EnvParse {
                        var: "DISCORD_OWNER_IDS".to_string(),
                        message: e.to_string(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }

        if let Some(url) = lookup("WEBHOOK") {
            config.discord.webhook_url = Some(url);
        }

        if let Some(url) = lookup("DATABASE_URL") {
            config.database.url = url;
        }

        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
            config.database.max_connections =
                max.trim().parse::<u32>().map_err(|e| {
                    ConfigError::EnvParse {
                        var: "DATABASE_MAX_CONNECTIONS".to_string(),
                        message: e.to_string(),
                    }
                })?;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}
