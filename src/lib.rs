//! osay: speak text with OpenAI TTS, falling back to the macOS `say` command.
//!
//! Played audio is kept in a small on-disk cache (`~/.osay/audios`) so recent
//! utterances can be listed and replayed without another synthesis call.

pub mod cache;
pub mod cli;
pub mod config;
pub mod format;
pub mod playback;
pub mod provider;
pub mod service;
