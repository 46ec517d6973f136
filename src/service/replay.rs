//! Replaying cached audio.

use tracing::warn;

use crate::cache::{AudioCache, CacheEntry};
use crate::playback::{PickItem, Picker, PickerError, Player};

/// Which cached entry to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayTarget {
    Id(String),
    Latest,
    /// Ask the user through the picker.
    Interactive,
}

/// Result of a replay request. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOutcome {
    Played(CacheEntry),
    /// Unknown id, missing audio, or the player failed.
    Unplayable(String),
    /// The cache holds no entries.
    Empty,
    /// The user cancelled the picker.
    NoSelection,
    PickerUnavailable(String),
}

impl ReplayOutcome {
    pub fn is_played(&self) -> bool {
        matches!(self, ReplayOutcome::Played(_))
    }
}

/// Play a cached entry chosen by `target`.
pub fn replay(
    cache: &AudioCache,
    target: ReplayTarget,
    player: &dyn Player,
    picker: &dyn Picker,
) -> ReplayOutcome {
    let id = match target {
        ReplayTarget::Id(id) => id,
        ReplayTarget::Latest => match cache.latest() {
            Some(entry) => entry.id,
            None => return ReplayOutcome::Empty,
        },
        ReplayTarget::Interactive => match pick_id(cache, picker) {
            Ok(id) => id,
            Err(outcome) => return outcome,
        },
    };

    match cache.get_by_id(&id) {
        Some(entry) if cache.play_by_id(&id, player) => ReplayOutcome::Played(entry),
        _ => ReplayOutcome::Unplayable(id),
    }
}

fn pick_id(cache: &AudioCache, picker: &dyn Picker) -> Result<String, ReplayOutcome> {
    let entries = cache.list_all().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to list cached audio");
        Vec::new()
    });

    if entries.is_empty() {
        return Err(ReplayOutcome::Empty);
    }

    let items: Vec<PickItem> = entries
        .iter()
        .map(|entry| PickItem {
            id: entry.id.clone(),
            label: entry.picker_label(),
        })
        .collect();

    match picker.pick(&items) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(ReplayOutcome::NoSelection),
        Err(e @ PickerError::NotInstalled(_)) => Err(ReplayOutcome::PickerUnavailable(e.to_string())),
        Err(e) => {
            warn!(error = %e, "Picker failed");
            Err(ReplayOutcome::NoSelection)
        }
    }
}
