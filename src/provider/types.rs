//! Provider request and error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::playback::PlayerError;

/// Errors that can occur when synthesizing speech.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid voice '{voice}'. Available: {available}")]
    InvalidVoice { voice: String, available: String },

    #[error("Invalid format '{format}'. Available: {available}")]
    InvalidFormat { format: String, available: String },

    /// Credential missing or rejected, or the speech command is not installed.
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Operation(String),

    #[error("Audio file error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Playback failed: {0}")]
    Playback(#[from] PlayerError),
}

impl ProviderError {
    /// Whether the request itself was rejected (bad voice or format).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ProviderError::InvalidVoice { .. } | ProviderError::InvalidFormat { .. }
        )
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProviderError::Unavailable(_))
    }
}

/// Request for speech synthesis.
///
/// Without an `output` the provider plays the audio itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub output: Option<PathBuf>,
    pub voice: Option<String>,
    /// Free-text tone or style directive.
    pub instructions: Option<String>,
    pub format: Option<String>,
}

impl SpeechRequest {
    /// Create a new synthesis request.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Write audio to `path` instead of playing it.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// The voice, unless unset or blank.
    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// The instructions, unless unset or blank.
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref().filter(|i| !i.trim().is_empty())
    }

    /// The format, unless unset or blank.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref().filter(|f| !f.trim().is_empty())
    }
}
