//! Acquiring the text to speak.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while gathering input text.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("File '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("No text provided. Use 'osay <text>', 'osay -f <file>', or pipe text to stdin.")]
    NoText,

    #[error("No text to speak")]
    Empty,
}

/// Resolve the text to speak.
///
/// A positional argument wins over `--file`, which wins over stdin. Stdin is
/// only read when it is not a terminal. The result is trimmed and must not
/// be empty.
pub fn resolve_text(
    text: Option<&str>,
    file: Option<&Path>,
    mut stdin: impl Read,
    stdin_is_terminal: bool,
) -> Result<String, InputError> {
    let raw = match (text.filter(|t| !t.is_empty()), file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => read_file(path)?,
        (None, None) => {
            if stdin_is_terminal {
                return Err(InputError::NoText);
            }
            let mut buf = String::new();
            stdin.read_to_string(&mut buf).map_err(InputError::Stdin)?;
            buf
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(trimmed.to_string())
}

fn read_file(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => InputError::FileNotFound(path.to_path_buf()),
        _ => InputError::FileRead {
            path: path.to_path_buf(),
            source,
        },
    })
}
