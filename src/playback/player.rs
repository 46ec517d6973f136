//! Audio playback through system players.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::format::AudioFormat;

use super::process::{CommandRunner, SystemRunner};

/// Player used for formats it supports and as the last resort for the rest.
pub const PRIMARY_PLAYER: &str = "afplay";

/// Player tried first for formats the primary player cannot decode.
pub const FALLBACK_PLAYER: &str = "ffplay";

/// Errors that can occur when playing audio.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Audio player '{0}' not found")]
    NotFound(String),

    #[error("Audio player '{player}' failed: {message}")]
    Failed { player: String, message: String },
}

/// Plays audio files.
#[cfg_attr(test, mockall::automock)]
pub trait Player {
    /// Play a file with the primary player.
    fn play(&self, path: &Path) -> Result<(), PlayerError>;

    /// Play a file with a player suited to `format`.
    fn play_as(&self, path: &Path, format: AudioFormat) -> Result<(), PlayerError>;
}

/// [`Player`] that invokes external player programs.
pub struct CommandPlayer<R: CommandRunner = SystemRunner> {
    runner: R,
    primary: String,
    fallback: String,
}

impl CommandPlayer<SystemRunner> {
    /// Create a player using the programs named in the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(SystemRunner, &config.primary_player, &config.fallback_player)
    }
}

impl<R: CommandRunner> CommandPlayer<R> {
    pub fn new(runner: R, primary: &str, fallback: &str) -> Self {
        Self {
            runner,
            primary: primary.to_string(),
            fallback: fallback.to_string(),
        }
    }

    fn invoke(&self, player: &str, args: Vec<String>) -> Result<(), PlayerError> {
        let output = self.runner.run(player, &args).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PlayerError::NotFound(player.to_string()),
            _ => PlayerError::Failed {
                player: player.to_string(),
                message: e.to_string(),
            },
        })?;

        if output.success {
            Ok(())
        } else {
            Err(PlayerError::Failed {
                player: player.to_string(),
                message: output.stderr.trim().to_string(),
            })
        }
    }
}

impl<R: CommandRunner> Player for CommandPlayer<R> {
    fn play(&self, path: &Path) -> Result<(), PlayerError> {
        self.invoke(&self.primary, vec![path.display().to_string()])
    }

    fn play_as(&self, path: &Path, format: AudioFormat) -> Result<(), PlayerError> {
        if format.plays_natively() {
            return self.play(path);
        }

        let args = vec![
            "-autoexit".to_string(),
            "-nodisp".to_string(),
            path.display().to_string(),
        ];

        match self.invoke(&self.fallback, args) {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!(error = %e, format = %format, "Fallback player unavailable, using primary");
                self.play(path)
            }
        }
    }
}
