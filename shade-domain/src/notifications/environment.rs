//! Collaborators the engine consults but does not own.
//!
//! Implementations are called while the engine holds its store lock, so they must
//! not call back into the engine's mutating operations (`add`, `remove`,
//! `update_ranking`, `filter_and_sort`). Every read accessor (`get`, `entry_count`,
//! `all_entries`, `active_notifications`, `dump` and the per-key ranking lookups)
//! is lock-free and safe to call from a callback.
//!
//! [`HeadsUpCoordinator::compare`] is consulted live during a sort and must be a
//! total order over the entries it is given for the duration of that sort.

use std::cmp::Ordering;
use std::sync::Arc;

use super::entry::{GroupingState, NotificationEntry};
use super::types::{Notification, UserId};

/// Device and user policy consulted by the filter.
pub trait PolicyEnvironment: Send + Sync {
    fn is_securely_locked(&self, user: UserId) -> bool;

    /// Whether every alert of `user` is hidden on a secure lock screen.
    fn should_hide_notifications_for_user(&self, user: UserId) -> bool;

    /// Whether this particular alert is hidden on a secure lock screen.
    fn should_hide_notification(&self, key: &str) -> bool;

    fn is_device_provisioned(&self) -> bool;

    /// Whether the alert belongs to a profile the current user can see.
    fn is_notification_for_current_profiles(&self, notification: &Notification) -> bool;

    /// Key of the alert attached to the active media session, if any.
    fn current_media_notification_key(&self) -> Option<String>;
}

/// Owner of group/summary relationships.
pub trait GroupCoordinator: Send + Sync {
    fn on_entry_added(&self, entry: &Arc<NotificationEntry>);

    fn on_entry_removed(&self, entry: &Arc<NotificationEntry>);

    /// Called once per entry whose override group key changed; `previous` is the
    /// state before the change, the entry already carries the new one.
    fn on_entry_updated(&self, entry: &Arc<NotificationEntry>, previous: &GroupingState);

    /// True for a non-summary child of a group whose summary is showing.
    fn is_child_in_group_with_summary(&self, notification: &Notification) -> bool;
}

/// The transient popup subsystem.
pub trait HeadsUpCoordinator: Send + Sync {
    fn is_heads_up(&self, key: &str) -> bool;

    /// Orders two heads-up entries; `Less` means `a` is shown first.
    fn compare(&self, a: &NotificationEntry, b: &NotificationEntry) -> Ordering;
}
