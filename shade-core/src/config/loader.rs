//! Configuration loading for Shade.
//!
//! [`ConfigLoader::load`] reads the system-wide file (see
//! [`get_system_config_path_with_override`]) and the per-user `config.toml`,
//! merges them with user values winning, deserializes the result into
//! [`ShadeConfig`] and validates it. Missing or empty files are skipped, so a
//! machine with no configuration at all gets [`ShadeConfig::default`].
//!
//! ## Validation
//!
//! - Log level and format are lowercased and checked against the known values.
//! - A relative log file path is resolved against the application state directory
//!   and its parent directory is created.
//! - The notification policy must name a platform package.

use std::path::Path;
use toml::Value;

use crate::config::ShadeConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs::{ensure_dir_exists, read_optional_to_string};
use crate::utils::paths::{get_app_config_dir, get_app_state_dir, get_system_config_path_with_override};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Namespace for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads, merges and validates the system and user configuration files.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReadError`] when a file exists but cannot be read.
    /// - [`ConfigError::ParseError`] when a file is not valid TOML or does not match the schema.
    /// - [`ConfigError::ValidationError`] for out-of-range values.
    /// - [`ConfigError::DirectoryUnavailable`] or [`CoreError::Filesystem`] while resolving log paths.
    pub fn load() -> Result<ShadeConfig, CoreError> {
        let system_config_path = get_system_config_path_with_override()?;
        let system_toml = Self::read_toml_file(&system_config_path)?;

        let user_config_path = get_app_config_dir()?.join(CONFIG_FILE_NAME);
        let user_toml = Self::read_toml_file(&user_config_path)?;

        let mut config: ShadeConfig = match Self::merge_toml_values(system_toml, user_toml) {
            Some(value) => value.try_into().map_err(ConfigError::ParseError)?,
            None => ShadeConfig::default(),
        };

        Self::validate_config(&mut config)?;
        tracing::debug!(
            system = %system_config_path.display(),
            user = %user_config_path.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parses and validates a single TOML document.
    pub fn load_from_str(content: &str) -> Result<ShadeConfig, CoreError> {
        let mut config: ShadeConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    fn read_toml_file(path: &Path) -> Result<Option<Value>, CoreError> {
        let content = read_optional_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        match content {
            Some(text) if !text.trim().is_empty() => {
                let value = text.parse::<Value>().map_err(ConfigError::ParseError)?;
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    /// Merges two optional TOML values; `override_val` takes precedence.
    fn merge_toml_values(base: Option<Value>, override_val: Option<Value>) -> Option<Value> {
        match (base, override_val) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(Value::Table(mut base_table)), Some(Value::Table(override_table))) => {
                Self::merge_toml_tables(&mut base_table, &override_table);
                Some(Value::Table(base_table))
            }
            (_, Some(o)) => Some(o),
        }
    }

    fn merge_toml_tables(base_table: &mut toml::map::Map<String, Value>, override_table: &toml::map::Map<String, Value>) {
        for (key, override_item) in override_table {
            match base_table.get_mut(key) {
                Some(base_item) => {
                    if let (Value::Table(bt), Value::Table(ot)) = (&mut *base_item, override_item) {
                        Self::merge_toml_tables(bt, ot);
                    } else {
                        *base_item = override_item.clone();
                    }
                }
                None => {
                    base_table.insert(key.clone(), override_item.clone());
                }
            }
        }
    }

    fn validate_config(config: &mut ShadeConfig) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => config.logging.level = level_lower,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))
                .into());
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => config.logging.format = format_lower,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))
                .into());
            }
        }

        if let Some(file_path) = &config.logging.file_path {
            let absolute_path = if file_path.is_absolute() {
                file_path.clone()
            } else {
                get_app_state_dir()?.join(file_path)
            };
            if let Some(parent_dir) = absolute_path.parent() {
                if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                    ensure_dir_exists(parent_dir)?;
                }
            }
            config.logging.file_path = Some(absolute_path);
        }

        if config.notifications.platform_package.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "notifications.platform_package must not be empty.".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
