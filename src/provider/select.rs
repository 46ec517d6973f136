//! Startup provider selection.

use tracing::{debug, warn};

use crate::config::Config;
use crate::playback::{CommandPlayer, SystemRunner};

use super::SpeechProvider;
use super::cloud::CloudProvider;
use super::local::LocalProvider;
use super::openai::{OpenAiClient, SpeechApi};
use super::types::{ProviderError, SpeechRequest};

/// The provider chosen for this invocation.
pub enum Provider<A: SpeechApi = OpenAiClient> {
    Cloud(CloudProvider<A>),
    Local(LocalProvider<SystemRunner>),
}

impl<A: SpeechApi> Provider<A> {
    pub fn is_cloud(&self) -> bool {
        matches!(self, Provider::Cloud(_))
    }
}

impl<A: SpeechApi> SpeechProvider for Provider<A> {
    fn name(&self) -> &'static str {
        match self {
            Provider::Cloud(p) => p.name(),
            Provider::Local(p) => p.name(),
        }
    }

    fn default_voice(&self) -> Option<&'static str> {
        match self {
            Provider::Cloud(p) => p.default_voice(),
            Provider::Local(p) => p.default_voice(),
        }
    }

    fn supports_styling(&self) -> bool {
        match self {
            Provider::Cloud(p) => p.supports_styling(),
            Provider::Local(p) => p.supports_styling(),
        }
    }

    fn synthesize(&self, request: &SpeechRequest) -> Result<(), ProviderError> {
        match self {
            Provider::Cloud(p) => p.synthesize(request),
            Provider::Local(p) => p.synthesize(request),
        }
    }

    fn list_voices(&self) -> Vec<String> {
        match self {
            Provider::Cloud(p) => p.list_voices(),
            Provider::Local(p) => p.list_voices(),
        }
    }
}

/// Pick the provider for this process from the configured credential.
pub fn select_provider(config: &Config) -> Provider {
    let api = config
        .api_key
        .as_deref()
        .map(|key| OpenAiClient::new(key, &config.api_base_url));

    choose_provider(api, config)
}

/// Use the cloud API when it accepts the credential, the OS command otherwise.
pub fn choose_provider<A: SpeechApi>(api: Option<A>, config: &Config) -> Provider<A> {
    match api {
        Some(api) => match api.check_credentials() {
            Ok(()) => {
                debug!("Cloud credential accepted");
                let player = CommandPlayer::from_config(config);
                return Provider::Cloud(CloudProvider::new(api, Box::new(player)));
            }
            Err(e) => {
                warn!(error = %e, "OpenAI API key found but invalid, falling back to macOS 'say'");
            }
        },
        None => debug!("No cloud credential configured"),
    }

    Provider::Local(LocalProvider::with_command(
        SystemRunner,
        &config.speech_command,
    ))
}
