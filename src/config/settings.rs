//! TOML-based configuration for heron.
//!
//! Supports a config file (heron.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [compiler]
//! dialect = "${HERON_DIALECT}"
//! enums_as_strings = false
//!
//! [dialects.mssql]
//! max_batch_rows = 250
//!
//! [dialects.sqlite]
//! max_batch_rows = 100
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::options::{CompileOptions, EnumMode};
use crate::sql::dialect::{Dialect, UnknownDialect};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error(transparent)]
    UnknownDialect(#[from] UnknownDialect),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Compiler defaults.
    pub compiler: CompilerSettings,

    /// Per-dialect overrides, keyed by dialect name.
    pub dialects: HashMap<String, DialectSettings>,
}

/// Compiler defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Default dialect name (supports ${ENV_VAR} expansion).
    pub dialect: String,

    /// Render enum values by member name instead of integer.
    pub enums_as_strings: bool,

    /// Row limit per batch for every dialect.
    pub max_batch_rows: Option<usize>,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default().to_string(),
            enums_as_strings: false,
            max_batch_rows: None,
        }
    }
}

/// Overrides for one dialect.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DialectSettings {
    pub max_batch_rows: Option<usize>,
    pub enums_as_strings: Option<bool>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `HERON_CONFIG`
    /// 2. `./heron.toml`
    /// 3. `~/.config/heron/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("HERON_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("heron.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("heron").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        for name in self.dialects.keys() {
            name.parse::<Dialect>()?;
        }
        let limits = self
            .dialects
            .iter()
            .filter_map(|(name, d)| d.max_batch_rows.map(|rows| (name.as_str(), rows)))
            .chain(self.compiler.max_batch_rows.map(|rows| ("compiler", rows)));
        for (section, rows) in limits {
            if rows == 0 {
                return Err(SettingsError::InvalidConfig(format!(
                    "max_batch_rows in [{section}] must be at least 1"
                )));
            }
        }
        Ok(())
    }

    /// The configured default dialect.
    pub fn dialect(&self) -> Result<Dialect, SettingsError> {
        Ok(expand_env_vars(&self.compiler.dialect)?.parse()?)
    }

    /// Overrides for `dialect`, if any section names it.
    pub fn dialect_settings(&self, dialect: Dialect) -> Option<&DialectSettings> {
        self.dialects
            .iter()
            .find(|(name, _)| name.parse::<Dialect>().ok() == Some(dialect))
            .map(|(_, settings)| settings)
    }

    /// Compile options for the configured default dialect.
    pub fn compile_options(&self) -> Result<CompileOptions, SettingsError> {
        Ok(self.compile_options_for(self.dialect()?))
    }

    /// Compile options for `dialect`, with its overrides applied.
    pub fn compile_options_for(&self, dialect: Dialect) -> CompileOptions {
        let overrides = self.dialect_settings(dialect);
        let enums_as_strings = overrides
            .and_then(|d| d.enums_as_strings)
            .unwrap_or(self.compiler.enums_as_strings);
        CompileOptions {
            dialect,
            enum_mode: if enums_as_strings {
                EnumMode::Name
            } else {
                EnumMode::Integer
            },
            max_batch_rows: overrides
                .and_then(|d| d.max_batch_rows)
                .or(self.compiler.max_batch_rows),
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.next_if_eq(&'{').is_some();
        let mut var_name = String::new();
        if braced {
            while let Some(ch) = chars.next_if(|&ch| ch != '}') {
                var_name.push(ch);
            }
            if chars.next().is_none() {
                return Err(SettingsError::InvalidConfig(format!(
                    "unterminated variable reference `${{{var_name}`"
                )));
            }
        } else {
            while let Some(ch) = chars.next_if(|&ch| ch.is_alphanumeric() || ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // A lone `$` is kept.
                result.push('$');
                continue;
            }
        }

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
