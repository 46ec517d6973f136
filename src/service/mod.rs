//! TTS service orchestrator.
//!
//! This module provides the service that coordinates the selected speech
//! provider, the audio cache, and playback for the CLI.

mod replay;
mod tts;

pub use replay::{ReplayOutcome, ReplayTarget, replay};
pub use tts::{DEFAULT_FORMAT, LOCAL_CACHE_FORMAT, SayError, SpeakOutcome, TtsService};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{AudioCache, CacheEntry};
    use crate::playback::{MockPicker, MockPlayer, PickerError, PlayerError};
    use crate::provider::{MockSpeechProvider, ProviderError, SpeechRequest};
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn cloud_like_provider() -> MockSpeechProvider {
        let mut provider = MockSpeechProvider::new();
        provider.expect_name().return_const("openai");
        provider.expect_default_voice().return_const(Some("onyx"));
        provider.expect_supports_styling().return_const(true);
        provider
    }

    fn local_like_provider() -> MockSpeechProvider {
        let mut provider = MockSpeechProvider::new();
        provider.expect_name().return_const("say");
        provider.expect_default_voice().return_const(None);
        provider.expect_supports_styling().return_const(false);
        provider
    }

    /// Provider that writes fake audio wherever the request points.
    fn writing_provider(mut provider: MockSpeechProvider) -> MockSpeechProvider {
        provider.expect_synthesize().returning(|req| {
            if let Some(path) = &req.output {
                fs::write(path, b"ID3 fake audio")?;
            }
            Ok(())
        });
        provider
    }

    fn quiet_player() -> MockPlayer {
        let mut player = MockPlayer::new();
        player.expect_play().never();
        player.expect_play_as().never();
        player
    }

    fn ok_player() -> MockPlayer {
        let mut player = MockPlayer::new();
        player.expect_play().returning(|_| Ok(()));
        player
    }

    fn unused_picker() -> MockPicker {
        let mut picker = MockPicker::new();
        picker.expect_pick().never();
        picker
    }

    fn service(
        temp_dir: &TempDir,
        provider: MockSpeechProvider,
        player: MockPlayer,
        picker: MockPicker,
    ) -> TtsService<MockSpeechProvider> {
        let cache = AudioCache::open(temp_dir.path()).unwrap();
        TtsService::with_parts(provider, cache, Box::new(player), Box::new(picker))
    }

    fn seed_entry(dir: &Path, text: &str, offset_secs: u64) -> CacheEntry {
        let cache = AudioCache::open(dir).unwrap();
        let slot = cache.allocate_slot("mp3");
        fs::write(&slot.audio_path, b"ID3").unwrap();
        let entry = cache
            .commit_metadata(&slot.id, text, None, "mp3", "say", None)
            .unwrap();

        let record = dir.join(format!("{}.json", entry.id));
        fs::File::options()
            .write(true)
            .open(record)
            .unwrap()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + offset_secs))
            .unwrap();
        entry
    }

    // ===========================================
    // speak tests
    // ===========================================

    #[test]
    fn test_fresh_cache_single_synthesis() {
        let temp_dir = TempDir::new().unwrap();
        let mut player = MockPlayer::new();
        player
            .expect_play()
            .withf(|path| path.exists() && path.extension().is_some_and(|e| e == "mp3"))
            .times(1)
            .returning(|_| Ok(()));
        let service = service(
            &temp_dir,
            writing_provider(cloud_like_provider()),
            player,
            unused_picker(),
        );

        let outcome = service.speak(SpeechRequest::new("hello"), true).unwrap();

        let SpeakOutcome::Cached(entry) = outcome else {
            panic!("expected a cached outcome");
        };
        let entries = service.cache().list_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "hello");
        assert_eq!(entries[0].id, entry.id);
        assert_eq!(entries[0].voice.as_deref(), Some("onyx"));
        assert_eq!(entries[0].provider, "openai");
        assert!(temp_dir.path().join(format!("{}.mp3", entry.id)).exists());
    }

    #[test]
    fn test_cached_speak_synthesizes_into_slot() {
        let temp_dir = TempDir::new().unwrap();
        let cache_dir = temp_dir.path().to_path_buf();
        let mut provider = cloud_like_provider();
        provider
            .expect_synthesize()
            .withf(move |req| {
                req.output
                    .as_deref()
                    .is_some_and(|p| p.parent() == Some(cache_dir.as_path()))
                    && req.voice.as_deref() == Some("nova")
                    && req.instructions.as_deref() == Some("Slowly")
                    && req.format.as_deref() == Some("wav")
            })
            .times(1)
            .returning(|req| {
                fs::write(req.output.as_ref().unwrap(), b"RIFF")?;
                Ok(())
            });
        let service = service(&temp_dir, provider, ok_player(), unused_picker());

        let request = SpeechRequest::new("Slow words")
            .with_voice("nova")
            .with_instructions("Slowly")
            .with_format("wav");
        let outcome = service.speak(request, true).unwrap();

        let SpeakOutcome::Cached(entry) = outcome else {
            panic!("expected a cached outcome");
        };
        assert_eq!(entry.format, "wav");
        assert_eq!(entry.instructions.as_deref(), Some("Slowly"));
        assert!(temp_dir.path().join(format!("{}.wav", entry.id)).exists());
    }

    #[test]
    fn test_direct_file_output_bypasses_cache() {
        for use_cache in [true, false] {
            let temp_dir = TempDir::new().unwrap();
            let out_dir = TempDir::new().unwrap();
            let output = out_dir.path().join("out.mp3");
            let service = service(
                &temp_dir,
                writing_provider(cloud_like_provider()),
                quiet_player(),
                unused_picker(),
            );

            let outcome = service
                .speak(SpeechRequest::new("to a file").with_output(&output), use_cache)
                .unwrap();

            assert_eq!(outcome, SpeakOutcome::Written(output.clone()));
            assert!(output.exists());
            assert!(service.cache().list_all().unwrap().is_empty());
            assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
        }
    }

    #[test]
    fn test_uncached_speak_lets_provider_play() {
        let temp_dir = TempDir::new().unwrap();
        let mut provider = local_like_provider();
        provider
            .expect_synthesize()
            .withf(|req| req.output.is_none() && req.voice.is_none())
            .times(1)
            .returning(|_| Ok(()));
        let service = service(&temp_dir, provider, quiet_player(), unused_picker());

        let outcome = service.speak(SpeechRequest::new("just say it"), false).unwrap();

        assert_eq!(outcome, SpeakOutcome::Played);
        assert!(service.cache().list_all().unwrap().is_empty());
    }

    #[test]
    fn test_local_provider_records_no_voice() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(
            &temp_dir,
            writing_provider(local_like_provider()),
            ok_player(),
            unused_picker(),
        );

        let outcome = service.speak(SpeechRequest::new("hi"), true).unwrap();

        let SpeakOutcome::Cached(entry) = outcome else {
            panic!("expected a cached outcome");
        };
        assert_eq!(entry.voice, None);
        assert_eq!(entry.provider, "say");
    }

    #[test]
    fn test_local_provider_records_no_instructions() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(
            &temp_dir,
            writing_provider(local_like_provider()),
            ok_player(),
            unused_picker(),
        );

        let request =
            SpeechRequest::new("hi").with_instructions("Speak in a cheerful and positive tone.");
        let outcome = service.speak(request, true).unwrap();

        let SpeakOutcome::Cached(entry) = outcome else {
            panic!("expected a cached outcome");
        };
        assert_eq!(entry.instructions, None);
        assert_eq!(service.cache().get_by_id(&entry.id).unwrap().instructions, None);
    }

    #[test]
    fn test_local_provider_caches_native_container() {
        let temp_dir = TempDir::new().unwrap();
        let mut provider = local_like_provider();
        provider
            .expect_synthesize()
            .withf(|req| {
                req.output
                    .as_deref()
                    .is_some_and(|p| p.extension().is_some_and(|e| e == "aiff"))
            })
            .times(1)
            .returning(|req| {
                fs::write(req.output.as_ref().unwrap(), b"FORM")?;
                Ok(())
            });
        let service = service(&temp_dir, provider, ok_player(), unused_picker());

        let outcome = service
            .speak(SpeechRequest::new("hi").with_format("flac"), true)
            .unwrap();

        let SpeakOutcome::Cached(entry) = outcome else {
            panic!("expected a cached outcome");
        };
        assert_eq!(entry.format, LOCAL_CACHE_FORMAT);
        assert_eq!(entry.audio_file, format!("{}.aiff", entry.id));
    }

    #[test]
    fn test_provider_error_leaves_cache_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let mut provider = cloud_like_provider();
        provider.expect_synthesize().returning(|_| {
            Err(ProviderError::InvalidVoice {
                voice: "robot".to_string(),
                available: "onyx".to_string(),
            })
        });
        let service = service(&temp_dir, provider, quiet_player(), unused_picker());

        let result = service.speak(SpeechRequest::new("hi").with_voice("robot"), true);

        assert!(matches!(result, Err(SayError::Provider(ref e)) if e.is_validation()));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_playback_failure_still_records_entry() {
        let temp_dir = TempDir::new().unwrap();
        let mut player = MockPlayer::new();
        player
            .expect_play()
            .times(1)
            .returning(|_| Err(PlayerError::NotFound("afplay".to_string())));
        let service = service(
            &temp_dir,
            writing_provider(cloud_like_provider()),
            player,
            unused_picker(),
        );

        let result = service.speak(SpeechRequest::new("hello"), true);

        assert!(matches!(result, Err(SayError::Playback(_))));
        assert_eq!(service.cache().list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_list_voices_passthrough() {
        let temp_dir = TempDir::new().unwrap();
        let mut provider = local_like_provider();
        provider
            .expect_list_voices()
            .times(1)
            .returning(|| vec!["Alex en_US # Hello".to_string()]);
        let service = service(&temp_dir, provider, quiet_player(), unused_picker());

        assert_eq!(service.list_voices(), vec!["Alex en_US # Hello".to_string()]);
    }

    // ===========================================
    // replay tests
    // ===========================================

    #[test]
    fn test_replay_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let entry = seed_entry(temp_dir.path(), "again", 1);
        let mut player = MockPlayer::new();
        player.expect_play().times(1).returning(|_| Ok(()));
        let service = service(&temp_dir, local_like_provider(), player, unused_picker());

        let outcome = service.replay(ReplayTarget::Id(entry.id.clone()));

        assert_eq!(outcome, ReplayOutcome::Played(entry));
    }

    #[test]
    fn test_replay_unknown_id() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir, local_like_provider(), quiet_player(), unused_picker());

        let outcome = service.replay(ReplayTarget::Id("ffffffff".to_string()));

        assert_eq!(outcome, ReplayOutcome::Unplayable("ffffffff".to_string()));
        assert!(!outcome.is_played());
    }

    #[test]
    fn test_replay_latest() {
        let temp_dir = TempDir::new().unwrap();
        seed_entry(temp_dir.path(), "older", 1);
        let newest = seed_entry(temp_dir.path(), "newest", 5);
        let expected = temp_dir.path().join(format!("{}.mp3", newest.id));
        let mut player = MockPlayer::new();
        player
            .expect_play()
            .withf(move |path| path == expected.as_path())
            .times(1)
            .returning(|_| Ok(()));
        let service = service(&temp_dir, local_like_provider(), player, unused_picker());

        assert_eq!(service.replay(ReplayTarget::Latest), ReplayOutcome::Played(newest));
    }

    #[test]
    fn test_replay_latest_on_empty_cache() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir, local_like_provider(), quiet_player(), unused_picker());

        assert_eq!(service.replay(ReplayTarget::Latest), ReplayOutcome::Empty);
    }

    #[test]
    fn test_replay_interactive_selection() {
        let temp_dir = TempDir::new().unwrap();
        let first = seed_entry(temp_dir.path(), "first", 1);
        let second = seed_entry(temp_dir.path(), "second", 2);
        let chosen = first.id.clone();
        let newest_id = second.id.clone();
        let mut picker = MockPicker::new();
        picker
            .expect_pick()
            .withf(move |items| items.len() == 2 && items[0].id == newest_id)
            .times(1)
            .returning(move |_| Ok(Some(chosen.clone())));
        let service = service(&temp_dir, local_like_provider(), ok_player(), picker);

        assert_eq!(service.replay(ReplayTarget::Interactive), ReplayOutcome::Played(first));
    }

    #[test]
    fn test_replay_interactive_cancelled() {
        let temp_dir = TempDir::new().unwrap();
        seed_entry(temp_dir.path(), "only", 1);
        let mut picker = MockPicker::new();
        picker.expect_pick().times(1).returning(|_| Ok(None));
        let service = service(&temp_dir, local_like_provider(), quiet_player(), picker);

        assert_eq!(service.replay(ReplayTarget::Interactive), ReplayOutcome::NoSelection);
    }

    #[test]
    fn test_replay_interactive_without_picker() {
        let temp_dir = TempDir::new().unwrap();
        seed_entry(temp_dir.path(), "only", 1);
        let mut picker = MockPicker::new();
        picker
            .expect_pick()
            .returning(|_| Err(PickerError::NotInstalled("fzf".to_string())));
        let service = service(&temp_dir, local_like_provider(), quiet_player(), picker);

        let outcome = service.replay(ReplayTarget::Interactive);

        assert!(matches!(outcome, ReplayOutcome::PickerUnavailable(ref m) if m.contains("fzf is not installed")));
    }

    #[test]
    fn test_replay_interactive_on_empty_cache_skips_picker() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir, local_like_provider(), quiet_player(), unused_picker());

        assert_eq!(service.replay(ReplayTarget::Interactive), ReplayOutcome::Empty);
    }

    #[test]
    fn test_replay_free_function_without_service() {
        let temp_dir = TempDir::new().unwrap();
        let entry = seed_entry(temp_dir.path(), "cache only", 1);
        fs::remove_file(temp_dir.path().join(format!("{}.mp3", entry.id))).unwrap();
        let cache = AudioCache::open(temp_dir.path()).unwrap();

        let outcome = replay(
            &cache,
            ReplayTarget::Id(entry.id.clone()),
            &quiet_player(),
            &unused_picker(),
        );

        assert_eq!(outcome, ReplayOutcome::Unplayable(entry.id));
    }
}
