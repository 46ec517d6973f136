//! CLI argument parsing, input acquisition and output rendering.

mod args;
mod display;
mod input;

pub use args::{Args, DEFAULT_INSTRUCTIONS, VOICE_LIST_SENTINEL};
pub use display::{
    EMPTY_CACHE_MESSAGE, LIST_TEXT_LIMIT, PLAYING_TEXT_LIMIT, format_listing, format_voice_list,
    playing_message,
};
pub use input::{InputError, resolve_text};
