use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::RoundPolicy;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub rounds: RoundSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_roster_path")]
    pub roster_path: String,
    #[serde(default = "default_history_path")]
    pub history_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            roster_path: default_roster_path(),
            history_path: default_history_path(),
        }
    }
}

fn default_roster_path() -> String { "data/roster.json".to_string() }
fn default_history_path() -> String { "data/match_history.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct RoundSettings {
    #[serde(default = "default_slot_capacity")]
    pub slot_capacity: usize,
    #[serde(default = "default_cooldown_rounds")]
    pub cooldown_rounds: u32,
    /// Prune history entries older than this many rounds; unset keeps everything
    pub max_history_age: Option<u32>,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            slot_capacity: default_slot_capacity(),
            cooldown_rounds: default_cooldown_rounds(),
            max_history_age: None,
        }
    }
}

impl RoundSettings {
    pub fn policy(&self) -> RoundPolicy {
        RoundPolicy {
            slot_capacity: self.slot_capacity,
            cooldown_rounds: self.cooldown_rounds,
        }
    }
}

fn default_slot_capacity() -> usize { 10 }
fn default_cooldown_rounds() -> u32 { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with COURT__)
    /// 4. ROSTER_PATH / HISTORY_PATH overrides
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., COURT__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("COURT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_path_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("COURT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Let the plain ROSTER_PATH and HISTORY_PATH variables point the stores elsewhere
fn apply_path_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(roster_path) = env::var("ROSTER_PATH") {
        builder = builder.set_override("storage.roster_path", roster_path)?;
    }
    if let Ok(history_path) = env::var("HISTORY_PATH") {
        builder = builder.set_override("storage.history_path", history_path)?;
    }

    builder.build()
}
