//! Configuration management.
//!
//! Settings come from an optional TOML file (`config/chronod.toml` by
//! default, or the path given on the command line) with `CHRONOD_*`
//! environment variables taking precedence.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::{ApplicationSettings, LoggerSettings, ServerSettings, Settings};
