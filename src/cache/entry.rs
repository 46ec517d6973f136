//! Metadata record for one cached utterance.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

const DEFAULT_FORMAT: &str = "mp3";

/// Longest text shown in a picker label before truncation.
const LABEL_TEXT_LIMIT: usize = 128;

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

/// Metadata for a synthesized utterance, stored as `<id>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub id: String,
    /// ISO-8601 creation time.
    pub timestamp: String,
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub instructions: Option<String>,
    /// File name of the audio payload, `<id>.<format>`.
    #[serde(default)]
    pub audio_file: String,
}

impl CacheEntry {
    /// Name of the audio payload, derived from id and format when the record omits it.
    pub fn audio_file_name(&self) -> String {
        if self.audio_file.is_empty() {
            format!("{}.{}", self.id, self.format)
        } else {
            self.audio_file.clone()
        }
    }

    /// Parsed creation time. Accepts RFC 3339 and offset-less ISO-8601.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|dt| dt.naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }

    /// Creation time as `YYYY-MM-DD HH:MM`, or the raw timestamp if unparsable.
    pub fn display_time(&self) -> String {
        self.created_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| self.timestamp.clone())
    }

    /// The first `limit` characters of the text, with `...` appended when cut.
    pub fn text_preview(&self, limit: usize) -> String {
        truncate(&self.text, limit, limit)
    }

    /// Single-line label for interactive selection.
    pub fn picker_label(&self) -> String {
        let voice = self.voice.as_deref().unwrap_or("default");
        let text = self.text.replace(['\n', '\r', '\t'], " ");
        let text = truncate(&text, LABEL_TEXT_LIMIT, LABEL_TEXT_LIMIT - 3);

        format!("{} - {} - {}", self.display_time(), voice, text)
    }
}

/// Keeps `text` whole when it has at most `limit` chars, else cuts to `keep` chars plus `...`.
fn truncate(text: &str, limit: usize, keep: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str("...");
    cut
}
