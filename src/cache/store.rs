//! On-disk audio cache with bounded retention.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Local;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::playback::Player;

use super::entry::CacheEntry;

/// Number of entries kept after an eviction pass.
pub const MAX_CACHE_SIZE: usize = 10;

const ID_LEN: usize = 8;
const METADATA_EXT: &str = "json";

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid cache id: {0}")]
    InvalidId(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// A reserved id and the path its audio should be written to.
///
/// Nothing exists on disk until the caller writes the audio and commits
/// metadata, so an abandoned slot never shows up in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSlot {
    pub id: String,
    pub audio_path: PathBuf,
}

/// Directory of `<id>.json` metadata records beside `<id>.<format>` audio.
#[derive(Debug)]
pub struct AudioCache {
    dir: PathBuf,
    max_size: usize,
}

impl AudioCache {
    /// Open the cache with the default retention limit.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Self::with_capacity(dir, MAX_CACHE_SIZE)
    }

    /// Open the cache, creating the directory and evicting down to `max_size` entries.
    ///
    /// This is the only place eviction runs.
    pub fn with_capacity(dir: impl Into<PathBuf>, max_size: usize) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let removed = evict_excess(&dir, max_size)?;
        if !removed.is_empty() {
            debug!(count = removed.len(), dir = %dir.display(), "Evicted old cache entries");
        }

        Ok(Self { dir, max_size })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Reserve a fresh id and the audio path for it.
    pub fn allocate_slot(&self, format: &str) -> CacheSlot {
        loop {
            let id = generate_id();
            let audio_path = self.dir.join(format!("{id}.{format}"));

            if !audio_path.exists() && !self.metadata_path(&id).exists() {
                return CacheSlot { id, audio_path };
            }
        }
    }

    /// Write the metadata record for an id whose audio is already in place.
    pub fn commit_metadata(
        &self,
        id: &str,
        text: &str,
        voice: Option<&str>,
        format: &str,
        provider: &str,
        instructions: Option<&str>,
    ) -> Result<CacheEntry, CacheError> {
        if !is_valid_id(id) {
            return Err(CacheError::InvalidId(id.to_string()));
        }

        let entry = CacheEntry {
            id: id.to_string(),
            timestamp: Local::now().to_rfc3339(),
            text: text.to_string(),
            voice: voice.map(str::to_string),
            format: format.to_string(),
            provider: provider.to_string(),
            instructions: instructions.map(str::to_string),
            audio_file: format!("{id}.{format}"),
        };

        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(self.metadata_path(id), json)?;

        Ok(entry)
    }

    /// All readable entries, newest first by metadata modification time.
    pub fn list_all(&self) -> Result<Vec<CacheEntry>, CacheError> {
        Ok(metadata_files_by_mtime(&self.dir)?
            .iter()
            .filter_map(|path| load_entry(path))
            .collect())
    }

    /// Look up one entry. Unknown ids and unreadable records yield `None`.
    pub fn get_by_id(&self, id: &str) -> Option<CacheEntry> {
        if !is_valid_id(id) {
            return None;
        }

        load_entry(&self.metadata_path(id))
    }

    /// The most recently modified entry.
    pub fn latest(&self) -> Option<CacheEntry> {
        self.list_all().ok()?.into_iter().next()
    }

    /// Location of an entry's audio payload, always inside the cache directory.
    pub fn audio_path(&self, entry: &CacheEntry) -> PathBuf {
        audio_path_in(&self.dir, entry)
    }

    /// Play a cached entry with the primary player.
    ///
    /// Returns `false` when the entry is unknown, its audio is missing, or
    /// playback fails.
    pub fn play_by_id(&self, id: &str, player: &dyn Player) -> bool {
        let Some(entry) = self.get_by_id(id) else {
            debug!(id, "Cache entry not found");
            return false;
        };

        let path = self.audio_path(&entry);
        if !path.exists() {
            warn!(id, path = %path.display(), "Cached audio file is missing");
            return false;
        }

        match player.play(&path) {
            Ok(()) => true,
            Err(e) => {
                warn!(id, error = %e, "Failed to play cached audio");
                false
            }
        }
    }

    fn metadata_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.{METADATA_EXT}"))
    }
}

/// Delete every entry beyond the `max_size` most recently modified records.
///
/// Audio is removed before its metadata so an interrupted pass leaves at worst
/// a record without audio, which the next pass cleans up.
/// Returns the metadata paths that were removed.
pub fn evict_excess(dir: &Path, max_size: usize) -> Result<Vec<PathBuf>, CacheError> {
    let records = metadata_files_by_mtime(dir)?;
    let mut removed = Vec::new();

    for record in records.into_iter().skip(max_size) {
        if let Some(entry) = load_entry(&record) {
            remove_if_present(&audio_path_in(dir, &entry))?;
        }
        remove_if_present(&record)?;
        removed.push(record);
    }

    Ok(removed)
}

/// Metadata files in `dir`, newest modification time first.
fn metadata_files_by_mtime(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut records: Vec<(PathBuf, SystemTime)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.extension().is_some_and(|ext| ext == METADATA_EXT) {
            continue;
        }

        // Records removed concurrently simply drop out of the listing.
        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            records.push((path, modified));
        }
    }

    records.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(records.into_iter().map(|(path, _)| path).collect())
}

fn load_entry(path: &Path) -> Option<CacheEntry> {
    let json = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&json) {
        Ok(entry) => Some(entry),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Skipping malformed cache record");
            None
        }
    }
}

fn audio_path_in(dir: &Path, entry: &CacheEntry) -> PathBuf {
    let name = entry.audio_file_name();
    let file_name = Path::new(&name)
        .file_name()
        .map(|n| n.to_owned())
        .unwrap_or_else(|| format!("{}.{}", entry.id, entry.format).into());

    dir.join(file_name)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()[..ID_LEN].to_string()
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}
