//! Configuration module for heron.
//!
//! Loads compiler defaults and per-dialect overrides from TOML.

mod settings;

pub use settings::{expand_env_vars, CompilerSettings, DialectSettings, Settings, SettingsError};
