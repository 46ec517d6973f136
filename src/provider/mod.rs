//! Speech providers: turning text into audio.
//!
//! Two variants exist, the OpenAI speech API ([`CloudProvider`]) and the
//! macOS `say` command ([`LocalProvider`]). [`select_provider`] picks one at
//! startup and wraps it in [`Provider`].

mod cloud;
mod local;
mod openai;
mod select;
mod types;

pub use cloud::{CloudProvider, DEFAULT_VOICE, VOICES};
pub use local::{LocalProvider, SAY_COMMAND};
pub use openai::{
    ApiError, DEFAULT_BASE_URL, OpenAiClient, SPEECH_MODEL, SpeechApi, SpeechApiRequest,
    status_error,
};
pub use select::{Provider, choose_provider, select_provider};
pub use types::{ProviderError, SpeechRequest};

#[cfg(test)]
pub use openai::MockSpeechApi;

/// Capability shared by all speech backends.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechProvider {
    /// Short name recorded in cache metadata.
    fn name(&self) -> &'static str;

    /// Voice used when the request names none.
    fn default_voice(&self) -> Option<&'static str>;

    /// Whether `instructions` and `format` are honoured.
    fn supports_styling(&self) -> bool;

    /// Synthesize speech.
    ///
    /// With `request.output` set, audio is written there and nothing is
    /// played. Otherwise the audio is played immediately.
    fn synthesize(&self, request: &SpeechRequest) -> Result<(), ProviderError>;

    /// Available voice identifiers. Empty when they cannot be enumerated.
    fn list_voices(&self) -> Vec<String>;
}
