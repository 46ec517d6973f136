//! Process-backed capabilities: running commands, playing audio, picking entries.
//!
//! Each capability is a trait so the cache and the service can be exercised
//! without any external program installed.

mod picker;
mod player;
mod process;

pub use picker::{FzfPicker, PICKER_COMMAND, PickItem, Picker, PickerError};
pub use player::{CommandPlayer, FALLBACK_PLAYER, PRIMARY_PLAYER, Player, PlayerError};
pub use process::{CommandOutput, CommandRunner, SystemRunner};

#[cfg(test)]
pub use picker::MockPicker;
#[cfg(test)]
pub use player::MockPlayer;
#[cfg(test)]
pub use process::MockCommandRunner;
