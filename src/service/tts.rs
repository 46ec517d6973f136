//! TTS service implementation.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{AudioCache, CacheEntry, CacheError};
use crate::config::{Config, ConfigError};
use crate::playback::{CommandPlayer, FzfPicker, Picker, Player, PlayerError, SystemRunner};
use crate::provider::{Provider, ProviderError, SpeechProvider, SpeechRequest, select_provider};

use super::replay::{ReplayOutcome, ReplayTarget, replay};

/// Format assumed when a request names none.
pub const DEFAULT_FORMAT: &str = "mp3";

/// Container cached audio uses when the provider cannot choose a format.
pub const LOCAL_CACHE_FORMAT: &str = "aiff";

/// Errors that can occur during TTS operations.
#[derive(Error, Debug)]
pub enum SayError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Playback failed: {0}")]
    Playback(#[from] PlayerError),
}

/// What a speak request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Audio was written to the requested file.
    Written(PathBuf),
    /// Audio was played and stored in the cache.
    Cached(CacheEntry),
    /// Audio was played without being kept.
    Played,
}

/// Orchestrates the provider, the cache and playback.
pub struct TtsService<P: SpeechProvider = Provider> {
    provider: P,
    cache: AudioCache,
    player: Box<dyn Player>,
    picker: Box<dyn Picker>,
}

impl TtsService<Provider> {
    /// Select a provider and open the cache described by `config`.
    pub fn new(config: &Config) -> Result<Self, SayError> {
        let provider = select_provider(config);
        let cache = AudioCache::with_capacity(&config.cache_dir, config.max_cache_size)?;
        let player = CommandPlayer::from_config(config);
        let picker = FzfPicker::new(SystemRunner, config.cache_dir.clone());

        Ok(Self::with_parts(
            provider,
            cache,
            Box::new(player),
            Box::new(picker),
        ))
    }
}

impl<P: SpeechProvider> TtsService<P> {
    pub fn with_parts(
        provider: P,
        cache: AudioCache,
        player: Box<dyn Player>,
        picker: Box<dyn Picker>,
    ) -> Self {
        Self {
            provider,
            cache,
            player,
            picker,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &AudioCache {
        &self.cache
    }

    /// Speak `request`.
    ///
    /// With an output file the provider only writes it. Otherwise, with
    /// `use_cache`, the audio is synthesized into a cache slot, played, and
    /// recorded; without it the provider plays a throwaway copy.
    pub fn speak(&self, request: SpeechRequest, use_cache: bool) -> Result<SpeakOutcome, SayError> {
        let mut request = request;
        if request.voice().is_none() {
            request.voice = self.provider.default_voice().map(str::to_string);
        }

        let requested = request.format().unwrap_or(DEFAULT_FORMAT).to_string();
        let format = if self.provider.supports_styling() {
            requested
        } else {
            if requested != DEFAULT_FORMAT {
                warn!(
                    provider = self.provider.name(),
                    format = %requested,
                    "Audio format option only works with OpenAI TTS. Using default format."
                );
            }
            LOCAL_CACHE_FORMAT.to_string()
        };

        if let Some(path) = request.output.clone() {
            self.provider.synthesize(&request)?;
            return Ok(SpeakOutcome::Written(path));
        }

        if !use_cache {
            self.provider.synthesize(&request)?;
            return Ok(SpeakOutcome::Played);
        }

        let slot = self.cache.allocate_slot(&format);
        let request = request.with_output(&slot.audio_path);
        self.provider.synthesize(&request)?;

        let played = self.player.play(&slot.audio_path);

        // The audio exists even if playback failed, so it stays replayable.
        let entry = self.cache.commit_metadata(
            &slot.id,
            &request.text,
            request.voice(),
            &format,
            self.provider.name(),
            request
                .instructions()
                .filter(|_| self.provider.supports_styling()),
        )?;
        info!(id = %entry.id, "Cached audio");

        played?;
        Ok(SpeakOutcome::Cached(entry))
    }

    pub fn list_voices(&self) -> Vec<String> {
        self.provider.list_voices()
    }

    /// Play a cached entry. See [`replay`].
    pub fn replay(&self, target: ReplayTarget) -> ReplayOutcome {
        replay(
            &self.cache,
            target,
            self.player.as_ref(),
            self.picker.as_ref(),
        )
    }
}
