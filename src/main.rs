//! osay CLI entry point.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use osay::cache::AudioCache;
use osay::cli::{Args, format_listing, format_voice_list, playing_message, resolve_text};
use osay::config::Config;
use osay::playback::{CommandPlayer, FzfPicker, PICKER_COMMAND, SystemRunner};
use osay::provider::{SpeechProvider, SpeechRequest};
use osay::service::{ReplayOutcome, ReplayTarget, SpeakOutcome, TtsService, replay};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "osay=debug" } else { "osay=warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Cache-only commands never touch a provider.
    if args.list_cached {
        let cache = open_cache(&config)?;
        let entries = cache.list_all().context("Failed to list cached audio")?;
        print!("{}", format_listing(&entries));
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(target) = args.replay_target() {
        return replay_cached(&config, target);
    }

    let text = if args.wants_voice_list() {
        None
    } else {
        let stdin = io::stdin();
        let is_terminal = stdin.is_terminal();
        Some(resolve_text(
            args.text.as_deref(),
            args.file.as_deref(),
            stdin.lock(),
            is_terminal,
        )?)
    };

    let service = TtsService::new(&config).context("Failed to initialize TTS")?;
    announce_provider(&service);

    let Some(text) = text else {
        print!("{}", format_voice_list(&service.list_voices()));
        return Ok(ExitCode::SUCCESS);
    };

    let mut request = SpeechRequest::new(text).with_format(args.format.as_str());
    if let Some(voice) = &args.voice {
        request = request.with_voice(voice);
    }
    if let Some(instructions) = args.instructions() {
        request = request.with_instructions(instructions);
    }
    if let Some(path) = &args.output_file {
        request = request.with_output(path);
    }

    match service.speak(request, !args.no_cache)? {
        SpeakOutcome::Written(path) => eprintln!("Audio saved to: {}", path.display()),
        SpeakOutcome::Cached(entry) => eprintln!("Cached audio ID: {}", entry.id),
        SpeakOutcome::Played => {}
    }

    Ok(ExitCode::SUCCESS)
}

fn open_cache(config: &Config) -> Result<AudioCache> {
    AudioCache::with_capacity(&config.cache_dir, config.max_cache_size).with_context(|| {
        format!(
            "Failed to open cache directory: {}",
            config.cache_dir.display()
        )
    })
}

fn announce_provider(service: &TtsService) {
    if service.provider().is_cloud() {
        eprintln!(
            "Using OpenAI TTS (voices: {})",
            service.provider().list_voices().join(", ")
        );
    } else {
        eprintln!("Using macOS 'say' command");
    }
}

fn replay_cached(config: &Config, target: ReplayTarget) -> Result<ExitCode> {
    let cache = open_cache(config)?;
    let player = CommandPlayer::from_config(config);
    let picker = FzfPicker::new(SystemRunner, config.cache_dir.clone());
    let latest = target == ReplayTarget::Latest;

    let code = match replay(&cache, target, &player, &picker) {
        ReplayOutcome::Played(entry) if latest => {
            eprintln!("{}", playing_message(&entry));
            ExitCode::SUCCESS
        }
        ReplayOutcome::Played(entry) => {
            eprintln!("Playing cached audio: {}", entry.id);
            ExitCode::SUCCESS
        }
        ReplayOutcome::Unplayable(id) => {
            eprintln!("Error: Could not play cached audio: {id}");
            ExitCode::FAILURE
        }
        ReplayOutcome::Empty => {
            eprintln!("No cached audio files found. Generate some audio first!");
            ExitCode::FAILURE
        }
        ReplayOutcome::NoSelection => {
            eprintln!("No cached audio selected.");
            ExitCode::FAILURE
        }
        ReplayOutcome::PickerUnavailable(message) => {
            eprintln!("Error: {message}");
            eprintln!("Install: brew install {PICKER_COMMAND}");
            ExitCode::FAILURE
        }
    };

    Ok(code)
}
