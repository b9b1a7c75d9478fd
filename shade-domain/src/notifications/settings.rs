use shade_core::config::NotificationsConfig;
use std::convert::TryFrom;
use std::time::Duration;

use super::errors::NotificationError;

/// Longest full-screen intent cooldown the engine accepts.
pub const MAX_FULL_SCREEN_INTENT_COOLDOWN: Duration = Duration::from_secs(60);

/// Validated policy settings for a [`PrioritizationEngine`](super::engine::PrioritizationEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub platform_package: String,
    pub system_packages: Vec<String>,
    pub full_screen_intent_cooldown: Duration,
    pub enable_child_notifications: bool,
}

impl EngineSettings {
    pub fn is_platform_package(&self, package: &str) -> bool {
        self.platform_package == package
    }

    pub fn is_system_package(&self, package: &str) -> bool {
        self.system_packages.iter().any(|p| p == package)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        let defaults = NotificationsConfig::default();
        Self {
            platform_package: defaults.platform_package,
            system_packages: defaults.system_packages,
            full_screen_intent_cooldown: Duration::from_millis(defaults.full_screen_intent_cooldown_ms),
            enable_child_notifications: defaults.enable_child_notifications,
        }
    }
}

impl TryFrom<&NotificationsConfig> for EngineSettings {
    type Error = NotificationError;

    fn try_from(config: &NotificationsConfig) -> Result<Self, Self::Error> {
        let platform_package = config.platform_package.trim();
        if platform_package.is_empty() {
            return Err(NotificationError::invalid_settings("platform_package", "must not be empty"));
        }

        let cooldown = Duration::from_millis(config.full_screen_intent_cooldown_ms);
        if cooldown > MAX_FULL_SCREEN_INTENT_COOLDOWN {
            return Err(NotificationError::invalid_settings(
                "full_screen_intent_cooldown_ms",
                format!(
                    "{} ms exceeds the maximum of {} ms",
                    config.full_screen_intent_cooldown_ms,
                    MAX_FULL_SCREEN_INTENT_COOLDOWN.as_millis()
                ),
            ));
        }

        Ok(Self {
            platform_package: platform_package.to_string(),
            system_packages: config
                .system_packages
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            full_screen_intent_cooldown: cooldown,
            enable_child_notifications: config.enable_child_notifications,
        })
    }
}
