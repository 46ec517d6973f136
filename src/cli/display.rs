//! Rendering listings for the terminal.

use std::fmt::Write;

use crate::cache::CacheEntry;

/// Characters of text shown per entry in `--list-cached`.
pub const LIST_TEXT_LIMIT: usize = 80;

/// Characters of text shown when replaying the previous entry.
pub const PLAYING_TEXT_LIMIT: usize = 60;

pub const EMPTY_CACHE_MESSAGE: &str = "No cached audio files found.";

/// Numbered listing of cached entries, newest first.
pub fn format_listing(entries: &[CacheEntry]) -> String {
    if entries.is_empty() {
        return format!("{EMPTY_CACHE_MESSAGE}\n");
    }

    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "\n{}. ID: {}", i + 1, entry.id);
        let _ = writeln!(out, "   Time: {}", entry.display_time());
        let _ = writeln!(out, "   Voice: {}", entry.voice.as_deref().unwrap_or("default"));
        let _ = writeln!(out, "   Text: {}", entry.text_preview(LIST_TEXT_LIMIT));
        if let Some(instructions) = entry.instructions.as_deref().filter(|i| !i.is_empty()) {
            let _ = writeln!(out, "   Instructions: {instructions}");
        }
    }
    out
}

pub fn format_voice_list(voices: &[String]) -> String {
    let mut out = String::from("Available voices:\n");
    for voice in voices {
        let _ = writeln!(out, "  {voice}");
    }
    out
}

/// Line announcing a replay of `entry`.
pub fn playing_message(entry: &CacheEntry) -> String {
    format!("Playing: {}", entry.text_preview(PLAYING_TEXT_LIMIT))
}
