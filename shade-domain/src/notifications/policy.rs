use std::fmt;

use super::environment::{GroupCoordinator, PolicyEnvironment};
use super::settings::EngineSettings;
use super::types::{Notification, Visibility};

/// Why an alert was left out of the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    DeviceNotProvisioned,
    NotForCurrentProfiles,
    HiddenOnSecureLockScreen,
    ChildOfVisibleSummary,
}

impl fmt::Display for FilterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FilterReason::DeviceNotProvisioned => "device not provisioned",
            FilterReason::NotForCurrentProfiles => "not for current profiles",
            FilterReason::HiddenOnSecureLockScreen => "hidden on secure lock screen",
            FilterReason::ChildOfVisibleSummary => "child of visible summary",
        };
        f.write_str(text)
    }
}

/// Platform alerts flagged for setup stay visible on an unprovisioned device.
pub fn show_notification_even_if_unprovisioned(notification: &Notification, settings: &EngineSettings) -> bool {
    settings.is_platform_package(&notification.package_name) && notification.allows_during_setup()
}

/// Stateless filter over the collaborators' current answers.
pub struct FilterPolicy<'a> {
    environment: &'a dyn PolicyEnvironment,
    groups: &'a dyn GroupCoordinator,
    settings: &'a EngineSettings,
}

impl<'a> FilterPolicy<'a> {
    pub fn new(
        environment: &'a dyn PolicyEnvironment,
        groups: &'a dyn GroupCoordinator,
        settings: &'a EngineSettings,
    ) -> Self {
        Self {
            environment,
            groups,
            settings,
        }
    }

    /// The first rule that excludes `notification`, checked in precedence order.
    pub fn filter_reason(&self, notification: &Notification) -> Option<FilterReason> {
        if !self.environment.is_device_provisioned()
            && !show_notification_even_if_unprovisioned(notification, self.settings)
        {
            return Some(FilterReason::DeviceNotProvisioned);
        }

        if !self.environment.is_notification_for_current_profiles(notification) {
            return Some(FilterReason::NotForCurrentProfiles);
        }

        let user = notification.user_id;
        if self.environment.is_securely_locked(user)
            && (notification.visibility == Visibility::Secret
                || self.environment.should_hide_notifications_for_user(user)
                || self.environment.should_hide_notification(&notification.key))
        {
            return Some(FilterReason::HiddenOnSecureLockScreen);
        }

        if !self.settings.enable_child_notifications && self.groups.is_child_in_group_with_summary(notification) {
            return Some(FilterReason::ChildOfVisibleSummary);
        }

        None
    }

    pub fn should_filter_out(&self, notification: &Notification) -> bool {
        self.filter_reason(notification).is_some()
    }
}
