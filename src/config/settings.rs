//! Runtime settings resolved from the environment.

use std::path::PathBuf;

use thiserror::Error;

use crate::cache::MAX_CACHE_SIZE;
use crate::playback::{FALLBACK_PLAYER, PRIMARY_PLAYER};
use crate::provider::{DEFAULT_BASE_URL, SAY_COMMAND};

/// Environment variable holding the cloud API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
const CACHE_DIR_VAR: &str = "OSAY_CACHE_DIR";
const MAX_CACHE_VAR: &str = "OSAY_MAX_CACHE";
const PLAYER_VAR: &str = "OSAY_PLAYER";
const FALLBACK_PLAYER_VAR: &str = "OSAY_FALLBACK_PLAYER";

/// Errors that can occur while resolving settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find home directory; set {CACHE_DIR_VAR} to choose a cache location")]
    NoHomeDir,

    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Settings for one invocation, built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Cloud API credential; `None` selects the local provider.
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub cache_dir: PathBuf,
    pub max_cache_size: usize,
    pub primary_player: String,
    pub fallback_player: String,
    pub speech_command: String,
}

impl Config {
    /// Create settings with defaults and the given cache directory.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir,
            max_cache_size: MAX_CACHE_SIZE,
            primary_player: PRIMARY_PLAYER.to_string(),
            fallback_player: FALLBACK_PLAYER.to_string(),
            speech_command: SAY_COMMAND.to_string(),
        }
    }

    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let cache_dir = match var(CACHE_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => Self::default_cache_dir().ok_or(ConfigError::NoHomeDir)?,
        };

        let mut config = Self::new(cache_dir);
        config.api_key = var(API_KEY_VAR);

        if let Some(url) = var(BASE_URL_VAR) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(value) = var(MAX_CACHE_VAR) {
            config.max_cache_size = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: MAX_CACHE_VAR,
                    value,
                })?;
        }

        if let Some(player) = var(PLAYER_VAR) {
            config.primary_player = player;
        }

        if let Some(player) = var(FALLBACK_PLAYER_VAR) {
            config.fallback_player = player;
        }

        Ok(config)
    }

    /// `~/.osay/audios`, if a home directory is known.
    pub fn default_cache_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".osay").join("audios"))
    }
}
