//! Interactive selection of cached audio.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use super::process::{CommandRunner, SystemRunner};

/// Program used for interactive selection.
pub const PICKER_COMMAND: &str = "fzf";

/// Errors that can occur when asking the user to pick an entry.
#[derive(Error, Debug)]
pub enum PickerError {
    #[error("{0} is not installed. Install it or provide a cache ID.")]
    NotInstalled(String),

    #[error("Picker failed: {0}")]
    Failed(String),
}

/// One selectable line: the id is returned, the label is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub id: String,
    pub label: String,
}

/// Lets the user choose one item.
#[cfg_attr(test, mockall::automock)]
pub trait Picker {
    /// Returns the chosen id, or `None` when the user cancelled.
    fn pick(&self, items: &[PickItem]) -> Result<Option<String>, PickerError>;
}

/// [`Picker`] backed by `fzf`.
///
/// The id travels in a hidden first column; the preview pane shows the full
/// text from the entry's metadata record in `records_dir`.
pub struct FzfPicker<R: CommandRunner = SystemRunner> {
    runner: R,
    records_dir: PathBuf,
}

impl<R: CommandRunner> FzfPicker<R> {
    pub fn new(runner: R, records_dir: PathBuf) -> Self {
        Self {
            runner,
            records_dir,
        }
    }

    fn args(&self) -> Vec<String> {
        let preview = format!(
            "jq -r \".text\" \"{}\"/\"$(echo {{}} | cut -f1)\".json 2>/dev/null",
            self.records_dir.display()
        );

        vec![
            "-d".to_string(),
            "\t".to_string(),
            "--with-nth=2".to_string(),
            "--preview".to_string(),
            preview,
            "--preview-window".to_string(),
            "up:3:wrap".to_string(),
        ]
    }
}

impl<R: CommandRunner> Picker for FzfPicker<R> {
    fn pick(&self, items: &[PickItem]) -> Result<Option<String>, PickerError> {
        if !self.runner.is_installed(PICKER_COMMAND) {
            return Err(PickerError::NotInstalled(PICKER_COMMAND.to_string()));
        }

        let input = items
            .iter()
            .map(|item| format!("{}\t{}", item.id, item.label.replace('\t', " ")))
            .collect::<Vec<_>>()
            .join("\n");

        let output = self
            .runner
            .run_with_input(PICKER_COMMAND, &self.args(), &input)
            .map_err(|e| PickerError::Failed(e.to_string()))?;

        // fzf exits non-zero when the user aborts
        if !output.success {
            debug!("Picker cancelled");
            return Ok(None);
        }

        let selected = output.stdout.trim();
        if selected.is_empty() {
            return Ok(None);
        }

        Ok(selected
            .split('\t')
            .next()
            .map(str::to_string)
            .filter(|id| !id.is_empty()))
    }
}
