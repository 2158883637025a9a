//! Configuration management for Relay

pub mod logging;

use relay_foundation::{RelayError, RelayResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Identity reported by `/status`
    pub ide: IdeConfig,
    /// Projects opened at startup
    pub projects: Vec<ProjectConfig>,
    /// Per-operation mutation timeouts
    pub timeouts: TimeoutConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// Host identity reported to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeConfig {
    pub ide_type: String,
    pub ide_version: String,
}

/// A project opened when the server starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub path: PathBuf,
}

/// Mutation timeouts in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub rename_ms: u64,
    pub move_ms: u64,
    pub extract_method_ms: u64,
    pub apply_fix_ms: u64,
}

impl TimeoutConfig {
    pub fn rename(&self) -> Duration {
        Duration::from_millis(self.rename_ms)
    }

    pub fn move_element(&self) -> Duration {
        Duration::from_millis(self.move_ms)
    }

    pub fn extract_method(&self) -> Duration {
        Duration::from_millis(self.extract_method_ms)
    }

    pub fn apply_fix(&self) -> Duration {
        Duration::from_millis(self.apply_fix_ms)
    }
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format for production
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3040,
        }
    }
}

impl Default for IdeConfig {
    fn default() -> Self {
        Self {
            ide_type: "Relay".to_string(),
            ide_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            rename_ms: 30_000,
            move_ms: 30_000,
            extract_method_ms: 15_000,
            apply_fix_ms: 15_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl AppConfig {
    /// Load configuration from defaults, config files and environment
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (`RELAY__SERVER__PORT=4000`, `RELAY__TIMEOUTS__MOVE_MS=...`)
    /// 2. `[environments.<profile>]` section of the config file, selected by `RELAY_ENV`
    /// 3. `relay.toml` or `.relay/config.toml`
    /// 4. Default values
    pub fn load() -> RelayResult<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            value::Dict,
            Figment,
        };

        let env_profile = std::env::var("RELAY_ENV").unwrap_or_else(|_| "default".to_string());

        tracing::debug!(profile = %env_profile, "Loading configuration with profile");

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        let toml_paths = ["relay.toml", ".relay/config.toml"];
        for toml_path in &toml_paths {
            let path = std::path::Path::new(toml_path);
            if !path.exists() {
                continue;
            }

            tracing::info!(path = %toml_path, "Loading TOML configuration");
            figment = figment.merge(Toml::file(path));

            if env_profile != "default" {
                let section = format!("environments.{}", env_profile);
                match Figment::from(Toml::file(path)).extract_inner::<Dict>(&section) {
                    Ok(overrides) => {
                        tracing::info!(profile = %env_profile, "Applying environment-specific profile");
                        figment = figment.merge(Serialized::defaults(overrides));
                    }
                    Err(_) => {
                        tracing::debug!(profile = %env_profile, "No profile section in config file");
                    }
                }
            }
            break;
        }

        figment = figment.merge(Env::prefixed("RELAY__").split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| RelayError::config(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;

        tracing::info!(
            port = config.server.port,
            projects = config.projects.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> RelayResult<()> {
        if self.server.port == 0 {
            return Err(RelayError::config("Server port cannot be 0"));
        }

        let timeouts = [
            ("rename_ms", self.timeouts.rename_ms),
            ("move_ms", self.timeouts.move_ms),
            ("extract_method_ms", self.timeouts.extract_method_ms),
            ("apply_fix_ms", self.timeouts.apply_fix_ms),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(RelayError::config(format!("Timeout '{}' cannot be 0", name)));
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(RelayError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        let mut names = HashSet::new();
        for project in &self.projects {
            if project.name.trim().is_empty() {
                return Err(RelayError::config("Project name cannot be empty"));
            }
            if !names.insert(project.name.to_lowercase()) {
                return Err(RelayError::config(format!(
                    "Duplicate project name '{}'",
                    project.name
                )));
            }
        }

        Ok(())
    }
}
