//! Settings resolved once per invocation from the environment.

mod settings;

pub use settings::{API_KEY_VAR, Config, ConfigError};
