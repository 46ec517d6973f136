//! Audio container formats understood by the speech providers.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use thiserror::Error;

/// Error returned when a format name is not one of [`AudioFormat::ALL`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid format '{0}'. Available: {available}", available = AudioFormat::names())]
pub struct UnknownFormat(pub String);

/// Audio format produced by the cloud speech API.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    #[default]
    #[value(name = "mp3")]
    Mp3,
    #[value(name = "opus")]
    Opus,
    #[value(name = "aac")]
    Aac,
    #[value(name = "flac")]
    Flac,
    #[value(name = "wav")]
    Wav,
    #[value(name = "pcm")]
    Pcm,
}

impl AudioFormat {
    /// Every supported format, in the order they are advertised.
    pub const ALL: [AudioFormat; 6] = [
        AudioFormat::Mp3,
        AudioFormat::Opus,
        AudioFormat::Aac,
        AudioFormat::Flac,
        AudioFormat::Wav,
        AudioFormat::Pcm,
    ];

    /// Returns the wire name, which is also the file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Opus => "opus",
            AudioFormat::Aac => "aac",
            AudioFormat::Flac => "flac",
            AudioFormat::Wav => "wav",
            AudioFormat::Pcm => "pcm",
        }
    }

    /// Whether the primary system player handles this format directly.
    ///
    /// Other formats go through the fallback player first.
    pub fn plays_natively(&self) -> bool {
        matches!(
            self,
            AudioFormat::Wav | AudioFormat::Pcm | AudioFormat::Mp3 | AudioFormat::Aac
        )
    }

    /// Comma separated list of all format names.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(AudioFormat::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}
