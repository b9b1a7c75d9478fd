//! Configuration data structures for Shade.
//!
//! These structs are populated by deserializing `config.toml`. Missing fields take
//! their values from [`super::defaults`]; unknown fields are rejected.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults;

/// Configuration for the logging subsystem.
///
/// ```
/// use shade_core::config::LoggingConfig;
/// use std::path::PathBuf;
///
/// let toml_str = r#"
/// level = "debug"
/// file_path = "/var/log/shade.log"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, Some(PathBuf::from("/var/log/shade.log")));
/// assert_eq!(log_config.format, "json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of "trace", "debug", "info", "warn", "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Policy knobs for the notification prioritization engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    /// The platform's own package; its setup-tagged alerts survive an unprovisioned device.
    #[serde(default = "defaults::default_platform_package")]
    pub platform_package: String,
    /// Origins whose high-importance alerts count as system-max.
    #[serde(default = "defaults::default_system_packages")]
    pub system_packages: Vec<String>,
    #[serde(default = "defaults::default_full_screen_intent_cooldown_ms")]
    pub full_screen_intent_cooldown_ms: u64,
    /// When false, children of a group with a visible summary are hidden.
    #[serde(default = "defaults::default_enable_child_notifications")]
    pub enable_child_notifications: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        defaults::default_notifications_config()
    }
}

/// Root configuration structure.
///
/// ```
/// use shade_core::config::ShadeConfig;
///
/// let toml_str = r#"
/// [logging]
/// level = "warn"
///
/// [notifications]
/// enable_child_notifications = false
/// "#;
/// let loaded: ShadeConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(loaded.logging.level, "warn");
/// assert!(!loaded.notifications.enable_child_notifications);
/// assert_eq!(loaded.notifications.platform_package, "android");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShadeConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_notifications_config")]
    pub notifications: NotificationsConfig,
}
