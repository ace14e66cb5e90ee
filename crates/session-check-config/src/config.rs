// crates/session-check-config/src/config.rs
// ============================================================================
// Module: Session Check Configuration
// Description: Configuration loading and validation for Session Check.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional; a missing default file yields
//! [`SessionCheckConfig::default`], while a missing explicit file is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "session-check.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SESSION_CHECK_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of ignored field names.
pub const MAX_IGNORE_KEYS: usize = 256;
/// Default maximum session document size in bytes.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 64 * 1024 * 1024;
/// Maximum allowed value for `validation.max_input_bytes`.
pub const MAX_INPUT_BYTES_LIMIT: usize = 512 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Session Check configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionCheckConfig {
    /// Validation run settings.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Report output settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Audit event settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl SessionCheckConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order is `path`, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`] in the working directory. Only the default
    /// file may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = match fs::read(&resolved) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {
                return Ok(Self::default());
            }
            Err(err) => return Err(ConfigError::Io(err.to_string())),
        };
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validation.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

/// Validation run settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Field names skipped at every level of the document.
    #[serde(default)]
    pub ignore_keys: Vec<String>,
    /// Treat warnings as failures when computing the exit status.
    #[serde(default)]
    pub fail_on_warnings: bool,
    /// Largest session document accepted, in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            ignore_keys: Vec::new(),
            fail_on_warnings: false,
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl ValidationConfig {
    /// Validates validation settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.ignore_keys.len() > MAX_IGNORE_KEYS {
            return Err(ConfigError::Invalid(format!(
                "validation.ignore_keys exceeds {MAX_IGNORE_KEYS} entries"
            )));
        }
        if self.ignore_keys.iter().any(|key| key.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "validation.ignore_keys entries must be non-empty".to_string(),
            ));
        }
        if !(1 ..= MAX_INPUT_BYTES_LIMIT).contains(&self.max_input_bytes) {
            return Err(ConfigError::Invalid(format!(
                "validation.max_input_bytes must be between 1 and {MAX_INPUT_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Report output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Report formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `level: path: message` line per diagnostic plus a summary.
    #[default]
    Text,
    /// The serialized diagnostic list.
    Json,
}

/// Audit event settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Record one audit event per run.
    #[serde(default)]
    pub enabled: bool,
    /// Append events to this file instead of stderr.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default for `validation.max_input_bytes`.
const fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}

/// Resolves the config path and whether it was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
