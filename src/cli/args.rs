//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::format::AudioFormat;
use crate::service::ReplayTarget;

/// Style directive sent with cloud requests unless overridden.
pub const DEFAULT_INSTRUCTIONS: &str = "Speak in a cheerful and positive tone.";

/// Value of `-v` that lists voices instead of speaking.
pub const VOICE_LIST_SENTINEL: &str = "?";

/// Text-to-speech with OpenAI voices, falling back to macOS `say`.
#[derive(Parser, Debug)]
#[command(name = "osay")]
#[command(about = "Speak text using OpenAI TTS or the macOS say command")]
#[command(version)]
pub struct Args {
    /// Text to speak
    pub text: Option<String>,

    /// Read text from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Write audio to a file instead of playing it
    #[arg(short, long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Voice to use; "?" lists available voices
    #[arg(short, long)]
    pub voice: Option<String>,

    /// Style instructions for OpenAI TTS
    #[arg(long, default_value = DEFAULT_INSTRUCTIONS)]
    pub instructions: String,

    /// Send no style instructions
    #[arg(long)]
    pub no_instructions: bool,

    /// Audio format for OpenAI TTS
    #[arg(long, value_enum, default_value = "mp3")]
    pub format: AudioFormat,

    /// Play without keeping the audio in the cache
    #[arg(long)]
    pub no_cache: bool,

    /// List cached audio
    #[arg(long)]
    pub list_cached: bool,

    /// Replay cached audio by ID, or pick one interactively
    #[arg(long, value_name = "ID", num_args = 0..=1, default_missing_value = "")]
    pub play_cached: Option<String>,

    /// Replay the most recent cached audio
    #[arg(short, long)]
    pub prev: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    /// Instructions to send, or `None` when disabled or blank.
    pub fn instructions(&self) -> Option<&str> {
        if self.no_instructions || self.instructions.trim().is_empty() {
            None
        } else {
            Some(&self.instructions)
        }
    }

    pub fn wants_voice_list(&self) -> bool {
        self.voice.as_deref() == Some(VOICE_LIST_SENTINEL)
    }

    /// Replay requested by `--play-cached` or `--prev`, if any.
    ///
    /// `--play-cached` without a value asks for interactive selection.
    pub fn replay_target(&self) -> Option<ReplayTarget> {
        if let Some(id) = &self.play_cached {
            let id = id.trim();
            return Some(if id.is_empty() {
                ReplayTarget::Interactive
            } else {
                ReplayTarget::Id(id.to_string())
            });
        }

        self.prev.then_some(ReplayTarget::Latest)
    }
}
