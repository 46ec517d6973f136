//! Cloud speech provider.

use std::fs;
use std::io::Write;

use tracing::debug;

use crate::format::AudioFormat;
use crate::playback::Player;

use super::SpeechProvider;
use super::openai::{ApiError, OpenAiClient, SPEECH_MODEL, SpeechApi, SpeechApiRequest};
use super::types::{ProviderError, SpeechRequest};

/// Voices offered by the speech model.
pub const VOICES: [&str; 10] = [
    "alloy", "ash", "ballad", "coral", "echo", "fable", "nova", "onyx", "sage", "shimmer",
];

pub const DEFAULT_VOICE: &str = "onyx";

/// Speech provider backed by the OpenAI speech API.
///
/// Validates voice and format before any request is made. Without an
/// output target the audio goes to a temporary file that is played and
/// then removed.
pub struct CloudProvider<A: SpeechApi = OpenAiClient> {
    api: A,
    player: Box<dyn Player>,
}

impl<A: SpeechApi> CloudProvider<A> {
    pub const NAME: &'static str = "openai";

    pub fn new(api: A, player: Box<dyn Player>) -> Self {
        Self { api, player }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn resolve_voice(voice: Option<&str>) -> Result<String, ProviderError> {
        let voice = voice.unwrap_or(DEFAULT_VOICE);

        if VOICES.contains(&voice) {
            Ok(voice.to_string())
        } else {
            Err(ProviderError::InvalidVoice {
                voice: voice.to_string(),
                available: VOICES.join(", "),
            })
        }
    }

    fn resolve_format(format: Option<&str>) -> Result<AudioFormat, ProviderError> {
        match format {
            None => Ok(AudioFormat::default()),
            Some(name) => name.parse().map_err(|_| ProviderError::InvalidFormat {
                format: name.to_string(),
                available: AudioFormat::names(),
            }),
        }
    }

    /// Write `audio` to a temporary file, play it, and remove it.
    fn play_ephemeral(&self, audio: &[u8], format: AudioFormat) -> Result<(), ProviderError> {
        let mut file = tempfile::Builder::new()
            .prefix("osay-")
            .suffix(&format!(".{}", format.as_str()))
            .tempfile()?;
        file.write_all(audio)?;
        file.flush()?;

        debug!(path = %file.path().display(), "Playing temporary audio");
        // removed on drop, whether or not playback succeeds
        self.player.play_as(file.path(), format)?;

        Ok(())
    }
}

impl<A: SpeechApi> SpeechProvider for CloudProvider<A> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn default_voice(&self) -> Option<&'static str> {
        Some(DEFAULT_VOICE)
    }

    fn supports_styling(&self) -> bool {
        true
    }

    fn synthesize(&self, request: &SpeechRequest) -> Result<(), ProviderError> {
        let voice = Self::resolve_voice(request.voice())?;
        let format = Self::resolve_format(request.format())?;

        let api_request = SpeechApiRequest {
            model: SPEECH_MODEL.to_string(),
            voice,
            input: request.text.clone(),
            response_format: format.as_str().to_string(),
            instructions: request.instructions().map(str::to_string),
        };

        let audio = self.api.create_speech(&api_request).map_err(map_api_error)?;
        debug!(bytes = audio.len(), "Received synthesized audio");

        match &request.output {
            Some(path) => {
                fs::write(path, &audio)?;
                Ok(())
            }
            None => self.play_ephemeral(&audio, format),
        }
    }

    fn list_voices(&self) -> Vec<String> {
        VOICES.iter().map(|v| v.to_string()).collect()
    }
}

fn map_api_error(error: ApiError) -> ProviderError {
    match error {
        ApiError::Unauthorized(_) => ProviderError::Unavailable(
            "OpenAI API key is invalid or not set. Set OPENAI_API_KEY environment variable."
                .to_string(),
        ),
        other => ProviderError::Operation(format!("OpenAI API error: {other}")),
    }
}
