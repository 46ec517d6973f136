//! Local OS speech provider (macOS `say`).

use std::io;

use tracing::debug;

use crate::playback::{CommandRunner, SystemRunner};

use super::SpeechProvider;
use super::types::{ProviderError, SpeechRequest};

/// OS speech synthesizer command.
pub const SAY_COMMAND: &str = "say";

/// Speech provider that shells out to the OS speech command.
///
/// The OS owns the voice catalog, so voices are passed through unchecked.
/// Instructions and format are not supported and are ignored.
pub struct LocalProvider<R: CommandRunner = SystemRunner> {
    runner: R,
    command: String,
}

impl<R: CommandRunner> LocalProvider<R> {
    pub const NAME: &'static str = "say";

    pub fn new(runner: R) -> Self {
        Self::with_command(runner, SAY_COMMAND)
    }

    pub fn with_command(runner: R, command: &str) -> Self {
        Self {
            runner,
            command: command.to_string(),
        }
    }

    fn build_args(request: &SpeechRequest) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(voice) = request.voice() {
            args.push("-v".to_string());
            args.push(voice.to_string());
        }

        // `say` picks the container from the extension itself
        if let Some(path) = &request.output {
            args.push("-o".to_string());
            args.push(path.display().to_string());
        }

        args.push(request.text.clone());
        args
    }
}

impl<R: CommandRunner> SpeechProvider for LocalProvider<R> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn default_voice(&self) -> Option<&'static str> {
        None
    }

    fn supports_styling(&self) -> bool {
        false
    }

    fn synthesize(&self, request: &SpeechRequest) -> Result<(), ProviderError> {
        let args = Self::build_args(request);

        let output = self
            .runner
            .run(&self.command, &args)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ProviderError::Unavailable(format!(
                    "macOS '{}' command not found. This tool only works on macOS.",
                    self.command
                )),
                _ => ProviderError::IoError(e),
            })?;

        if output.success {
            Ok(())
        } else {
            Err(ProviderError::Operation(format!(
                "macOS '{}' command failed: {}",
                self.command,
                output.stderr.trim()
            )))
        }
    }

    fn list_voices(&self) -> Vec<String> {
        let args = vec!["-v".to_string(), "?".to_string()];

        match self.runner.run(&self.command, &args) {
            Ok(output) if output.success => output
                .stdout
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Ok(output) => {
                debug!(stderr = %output.stderr.trim(), "Voice enumeration failed");
                Vec::new()
            }
            Err(e) => {
                debug!(error = %e, "Voice enumeration unavailable");
                Vec::new()
            }
        }
    }
}
