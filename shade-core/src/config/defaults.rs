//! Default configuration values for Shade.
//!
//! These functions are referenced from `#[serde(default = "...")]` attributes in
//! [`super::types`] so a partial `config.toml` still yields a complete config.

use crate::config::{LoggingConfig, NotificationsConfig};
use std::path::PathBuf;

/// Package that owns the platform itself. Only its alerts may show during setup.
pub const DEFAULT_PLATFORM_PACKAGE: &str = "android";

/// Packages whose high-importance alerts are pinned above regular ranking.
pub const DEFAULT_SYSTEM_PACKAGES: [&str; 2] = ["android", "com.android.systemui"];

/// Cooldown after a full-screen intent launch, in milliseconds.
pub const DEFAULT_FULL_SCREEN_INTENT_COOLDOWN_MS: u64 = 2000;

pub(crate) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

pub(crate) fn default_notifications_config() -> NotificationsConfig {
    NotificationsConfig {
        platform_package: default_platform_package(),
        system_packages: default_system_packages(),
        full_screen_intent_cooldown_ms: default_full_screen_intent_cooldown_ms(),
        enable_child_notifications: default_enable_child_notifications(),
    }
}

pub(crate) fn default_platform_package() -> String {
    DEFAULT_PLATFORM_PACKAGE.to_string()
}

pub(crate) fn default_system_packages() -> Vec<String> {
    DEFAULT_SYSTEM_PACKAGES.iter().map(|p| p.to_string()).collect()
}

pub(crate) fn default_full_screen_intent_cooldown_ms() -> u64 {
    DEFAULT_FULL_SCREEN_INTENT_COOLDOWN_MS
}

pub(crate) fn default_enable_child_notifications() -> bool {
    true
}
