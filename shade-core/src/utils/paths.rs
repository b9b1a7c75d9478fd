//! XDG base directory and application path resolution.
//!
//! Application directories are derived with `directories-next` from the
//! [`QUALIFIER`], [`ORGANIZATION`] and [`APPLICATION`] constants, e.g.
//! `~/.config/shade` on Linux. Every function maps a missing directory to
//! [`ConfigError::DirectoryUnavailable`].

use crate::error::{ConfigError, CoreError};
use directories_next::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

pub const QUALIFIER: &str = "org";
pub const ORGANIZATION: &str = "Shade";
pub const APPLICATION: &str = "Shade";

/// Environment variable that overrides the system-wide configuration file.
pub const SYSTEM_CONFIG_PATH_ENV: &str = "SHADE_SYSTEM_CONFIG_PATH";

/// Location of the system-wide configuration file when no override is set.
pub const DEFAULT_SYSTEM_CONFIG_PATH: &str = "/etc/shade/config.toml";

fn unavailable(dir_type: &str) -> CoreError {
    CoreError::Config(ConfigError::DirectoryUnavailable {
        dir_type: dir_type.to_string(),
    })
}

fn project_dirs() -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| unavailable("Project"))
}

/// Returns `$XDG_STATE_HOME`, falling back to `~/.local/state` on Linux and to the
/// local data directory elsewhere.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| unavailable("State Base"))
}

/// Directory holding the per-user `config.toml`.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Directory for runtime state such as log files.
///
/// `ProjectDirs` has no portable state directory, so this joins the lowercase
/// application name onto [`get_state_base_dir`].
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir().map(|base| base.join(APPLICATION.to_lowercase()))
}

/// Path of the system-wide configuration file, honouring [`SYSTEM_CONFIG_PATH_ENV`].
pub fn get_system_config_path_with_override() -> Result<PathBuf, ConfigError> {
    match std::env::var(SYSTEM_CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(PathBuf::from(DEFAULT_SYSTEM_CONFIG_PATH)),
    }
}
