use arc_swap::{ArcSwap, ArcSwapOption};
use parking_lot::{Mutex, RwLock};
use std::convert::TryFrom;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, trace};

use shade_core::config::{ConfigLoader, NotificationsConfig};

use crate::error::DomainResult;

use super::dump::write_dump;
use super::entry::{GroupingState, NotificationEntry};
use super::environment::{GroupCoordinator, HeadsUpCoordinator, PolicyEnvironment};
use super::errors::NotificationError;
use super::events::NotificationDataEvent;
use super::ordering::{sort_records, RankingComparator, SortRecord};
use super::policy::FilterPolicy;
use super::ranking::{RankingSnapshot, RankingUpdate};
use super::settings::EngineSettings;
use super::store::EntryStore;
use super::types::{Importance, Notification, SuppressedEffects, Visibility};

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Owns the alert store and the current ranking snapshot, and publishes the
/// filtered, sorted list of visible alerts.
///
/// Every mutation recomputes the visible list while holding the store lock, so
/// published lists appear in mutation order and each one is derived from a single
/// store state and a single ranking snapshot. The store is republished after each
/// structural change, so every read accessor ([`get`](Self::get),
/// [`active_notifications`](Self::active_notifications), [`dump`](Self::dump) and
/// the per-key ranking lookups) is lock-free and safe to call from collaborator
/// callbacks.
pub struct PrioritizationEngine {
    settings: EngineSettings,
    environment: Arc<dyn PolicyEnvironment>,
    groups: Arc<dyn GroupCoordinator>,
    heads_up: RwLock<Option<Arc<dyn HeadsUpCoordinator>>>,
    store: Mutex<EntryStore>,
    published: ArcSwap<EntryStore>,
    ranking: ArcSwapOption<RankingSnapshot>,
    visible: ArcSwap<Vec<Arc<NotificationEntry>>>,
    event_publisher: broadcast::Sender<NotificationDataEvent>,
}

impl PrioritizationEngine {
    pub fn new(
        settings: EngineSettings,
        environment: Arc<dyn PolicyEnvironment>,
        groups: Arc<dyn GroupCoordinator>,
    ) -> Self {
        Self::with_event_capacity(settings, environment, groups, DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_event_capacity(
        settings: EngineSettings,
        environment: Arc<dyn PolicyEnvironment>,
        groups: Arc<dyn GroupCoordinator>,
        event_capacity: usize,
    ) -> Self {
        let (event_publisher, _) = broadcast::channel(event_capacity.max(1));
        Self {
            settings,
            environment,
            groups,
            heads_up: RwLock::new(None),
            store: Mutex::new(EntryStore::new()),
            published: ArcSwap::from_pointee(EntryStore::new()),
            ranking: ArcSwapOption::empty(),
            visible: ArcSwap::from_pointee(Vec::new()),
            event_publisher,
        }
    }

    /// Builds an engine from the `[notifications]` configuration section.
    pub fn from_config(
        config: &NotificationsConfig,
        environment: Arc<dyn PolicyEnvironment>,
        groups: Arc<dyn GroupCoordinator>,
    ) -> Result<Self, NotificationError> {
        let settings = EngineSettings::try_from(config)?;
        Ok(Self::new(settings, environment, groups))
    }

    /// Builds an engine from a TOML configuration document.
    pub fn from_toml_str(
        content: &str,
        environment: Arc<dyn PolicyEnvironment>,
        groups: Arc<dyn GroupCoordinator>,
    ) -> DomainResult<Self> {
        let config = ConfigLoader::load_from_str(content)?;
        Ok(Self::from_config(&config.notifications, environment, groups)?)
    }

    /// Builds an engine from the merged system and user configuration files.
    pub fn load(environment: Arc<dyn PolicyEnvironment>, groups: Arc<dyn GroupCoordinator>) -> DomainResult<Self> {
        let config = ConfigLoader::load()?;
        Ok(Self::from_config(&config.notifications, environment, groups)?)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Installs the heads-up collaborator. Until one is installed no alert is heads-up.
    pub fn set_heads_up_coordinator(&self, heads_up: Arc<dyn HeadsUpCoordinator>) {
        *self.heads_up.write() = Some(heads_up);
        debug!("Heads-up coordinator installed");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationDataEvent> {
        self.event_publisher.subscribe()
    }

    /// Wraps `notification` in an entry configured with this engine's settings.
    pub fn create_entry(&self, notification: Notification) -> NotificationEntry {
        NotificationEntry::new(notification, &self.settings)
    }

    /// Stores `entry` (replacing any entry with the same key), tells the group
    /// coordinator, then applies `ranking` and recomputes.
    #[instrument(skip(self, entry, ranking), fields(key = %entry.key()))]
    pub fn add(&self, entry: NotificationEntry, ranking: impl Into<RankingUpdate>) -> Arc<NotificationEntry> {
        let entry = Arc::new(entry);
        {
            let mut store = self.store.lock();
            if store.insert(Arc::clone(&entry)).is_some() {
                debug!("Replaced existing entry");
            }
            self.published.store(Arc::new(store.clone()));
            self.publish(NotificationDataEvent::EntryAdded {
                key: entry.key().to_string(),
            });
        }
        self.groups.on_entry_added(&entry);
        debug!("Entry added");
        self.update_ranking(ranking);
        entry
    }

    /// Removes the entry for `key`. An unknown key returns `None` and leaves the
    /// ranking and visible list untouched.
    #[instrument(skip(self, ranking))]
    pub fn remove(&self, key: &str, ranking: impl Into<RankingUpdate>) -> Option<Arc<NotificationEntry>> {
        let removed = {
            let mut store = self.store.lock();
            let removed = store.remove(key);
            if removed.is_some() {
                self.published.store(Arc::new(store.clone()));
                self.publish(NotificationDataEvent::EntryRemoved { key: key.to_string() });
            }
            removed
        };

        match removed {
            Some(entry) => {
                self.groups.on_entry_removed(&entry);
                debug!("Entry removed");
                self.update_ranking(ranking);
                Some(entry)
            }
            None => {
                trace!("Remove for unknown key ignored");
                None
            }
        }
    }

    /// Installs `ranking`, reconciles override groups and recomputes. An empty
    /// update keeps the current snapshot and only re-filters and re-sorts.
    #[instrument(skip(self, ranking))]
    pub fn update_ranking(&self, ranking: impl Into<RankingUpdate>) {
        match ranking.into().into_snapshot() {
            Some(ranking) => {
                let store = self.store.lock();
                self.ranking.store(Some(Arc::clone(&ranking)));
                self.reconcile_override_groups(&store, &ranking);
                self.recompute(&store, Some(&*ranking));
            }
            None => {
                trace!("No ranking supplied, keeping current snapshot");
                self.filter_and_sort();
            }
        }
    }

    /// Rebuilds the visible list from the current store and snapshot.
    pub fn filter_and_sort(&self) {
        let store = self.store.lock();
        let ranking = self.ranking.load_full();
        self.recompute(&store, ranking.as_deref());
    }

    fn reconcile_override_groups(&self, store: &EntryStore, ranking: &RankingSnapshot) {
        for entry in store.iter() {
            let current = ranking.override_group_key(entry.key());
            if entry.grouping_state().override_group_key.as_deref() == current {
                continue;
            }
            let current = current.map(str::to_string);
            let previous = entry.replace_grouping_state(GroupingState {
                override_group_key: current.clone(),
            });
            info!(
                key = %entry.key(),
                previous = ?previous.override_group_key,
                current = ?current,
                "Override group changed"
            );
            self.groups.on_entry_updated(entry, &previous);
            self.publish(NotificationDataEvent::OverrideGroupChanged {
                key: entry.key().to_string(),
                previous: previous.override_group_key,
                current,
            });
        }
    }

    fn recompute(&self, store: &EntryStore, ranking: Option<&RankingSnapshot>) {
        let policy = FilterPolicy::new(self.environment.as_ref(), self.groups.as_ref(), &self.settings);
        let media_key = self.environment.current_media_notification_key();
        let heads_up = self.heads_up.read().clone();
        let comparator = RankingComparator::new(ranking, media_key.as_deref(), heads_up.as_deref(), &self.settings);

        // Filter and sort see the same payload; each entry's inputs are read once.
        let mut records = Vec::with_capacity(store.len());
        for entry in store.iter() {
            let notification = entry.notification();
            if let Some(reason) = policy.filter_reason(&notification) {
                trace!(key = %entry.key(), %reason, "Filtered out");
                continue;
            }
            records.push(comparator.record_with(entry, &notification));
        }
        sort_records(&mut records, &comparator);
        let visible: Vec<Arc<NotificationEntry>> = records.into_iter().map(SortRecord::into_entry).collect();

        trace!(total = store.len(), visible = visible.len(), "Visible list recomputed");
        let keys = visible.iter().map(|e| e.key().to_string()).collect();
        self.visible.store(Arc::new(visible));
        self.publish(NotificationDataEvent::VisibleListUpdated { keys });
    }

    fn publish(&self, event: NotificationDataEvent) {
        if let Err(e) = self.event_publisher.send(event) {
            trace!("No subscribers for notification data event: {:?}", e.0);
        }
    }

    /// The current visible list in display order.
    pub fn active_notifications(&self) -> Arc<Vec<Arc<NotificationEntry>>> {
        self.visible.load_full()
    }

    pub fn get(&self, key: &str) -> Option<Arc<NotificationEntry>> {
        self.published.load().get(key)
    }

    pub fn entry_count(&self) -> usize {
        self.published.load().len()
    }

    /// Every stored entry, visible or not, in key order.
    pub fn all_entries(&self) -> Vec<Arc<NotificationEntry>> {
        self.published.load().snapshot()
    }

    pub fn ranking(&self) -> Option<Arc<RankingSnapshot>> {
        self.ranking.load_full()
    }

    /// Importance from the current snapshot; `Unspecified` when unknown or when no
    /// snapshot has been installed.
    pub fn importance(&self, key: &str) -> Importance {
        self.ranking
            .load()
            .as_ref()
            .map_or(Importance::Unspecified, |r| r.importance(key))
    }

    pub fn visibility_override(&self, key: &str) -> Option<Visibility> {
        self.ranking
            .load()
            .as_ref()
            .and_then(|r| r.get(key).and_then(|info| info.visibility_override))
    }

    fn suppressed_effects(&self, key: &str) -> SuppressedEffects {
        self.ranking
            .load()
            .as_ref()
            .and_then(|r| r.get(key).map(|info| info.suppressed_effects))
            .unwrap_or_default()
    }

    pub fn should_suppress_screen_off(&self, key: &str) -> bool {
        self.suppressed_effects(key).contains(SuppressedEffects::SCREEN_OFF)
    }

    pub fn should_suppress_screen_on(&self, key: &str) -> bool {
        self.suppressed_effects(key).contains(SuppressedEffects::SCREEN_ON)
    }

    pub fn is_ambient(&self, key: &str) -> bool {
        self.ranking
            .load()
            .as_ref()
            .and_then(|r| r.get(key).map(|info| info.is_ambient))
            .unwrap_or(false)
    }

    pub fn override_group_key(&self, key: &str) -> Option<String> {
        self.ranking
            .load()
            .as_ref()
            .and_then(|r| r.override_group_key(key).map(str::to_string))
    }

    /// Operator report of active and inactive entries, each line prefixed by `indent`.
    pub fn dump(&self, indent: &str) -> Result<String, NotificationError> {
        let active = self.active_notifications();
        let all = self.all_entries();
        let ranking = self.ranking.load_full();
        let mut out = String::new();
        write_dump(&mut out, indent, &active, &all, ranking.as_deref())?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::ranking::RankingInfo;
    use crate::error::DomainError;
    use crate::notifications::types::UserId;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    struct OpenEnvironment;

    impl PolicyEnvironment for OpenEnvironment {
        fn is_securely_locked(&self, _user: UserId) -> bool {
            false
        }
        fn should_hide_notifications_for_user(&self, _user: UserId) -> bool {
            false
        }
        fn should_hide_notification(&self, _key: &str) -> bool {
            false
        }
        fn is_device_provisioned(&self) -> bool {
            true
        }
        fn is_notification_for_current_profiles(&self, _notification: &Notification) -> bool {
            true
        }
        fn current_media_notification_key(&self) -> Option<String> {
            None
        }
    }

    struct NoGroups;

    impl GroupCoordinator for NoGroups {
        fn on_entry_added(&self, _entry: &Arc<NotificationEntry>) {}
        fn on_entry_removed(&self, _entry: &Arc<NotificationEntry>) {}
        fn on_entry_updated(&self, _entry: &Arc<NotificationEntry>, _previous: &GroupingState) {}
        fn is_child_in_group_with_summary(&self, _notification: &Notification) -> bool {
            false
        }
    }

    fn engine() -> PrioritizationEngine {
        PrioritizationEngine::new(EngineSettings::default(), Arc::new(OpenEnvironment), Arc::new(NoGroups))
    }

    fn notification(key: &str, when_millis: i64) -> Notification {
        Notification::new(key, "com.example", 1, Utc.timestamp_millis_opt(when_millis).unwrap())
    }

    fn visible_keys(engine: &PrioritizationEngine) -> Vec<String> {
        engine
            .active_notifications()
            .iter()
            .map(|e| e.key().to_string())
            .collect()
    }

    #[test]
    fn test_accessors_are_total_before_any_snapshot() {
        let engine = engine();
        assert_eq!(engine.importance("nope"), Importance::Unspecified);
        assert_eq!(engine.visibility_override("nope"), None);
        assert!(!engine.should_suppress_screen_off("nope"));
        assert!(!engine.should_suppress_screen_on("nope"));
        assert!(!engine.is_ambient("nope"));
        assert_eq!(engine.override_group_key("nope"), None);
        assert!(engine.active_notifications().is_empty());
        assert!(engine.ranking().is_none());
    }

    #[test]
    fn test_accessors_resolve_through_snapshot() {
        let engine = engine();
        let entry = engine.create_entry(notification("a", 1));
        engine.add(
            entry,
            RankingSnapshot::new().with(
                "a",
                RankingInfo::new(Importance::Low, 0)
                    .with_visibility_override(Visibility::Public)
                    .with_suppressed_effects(SuppressedEffects::SCREEN_OFF)
                    .with_ambient(true)
                    .with_override_group_key("g"),
            ),
        );
        assert_eq!(engine.importance("a"), Importance::Low);
        assert_eq!(engine.visibility_override("a"), Some(Visibility::Public));
        assert!(engine.should_suppress_screen_off("a"));
        assert!(!engine.should_suppress_screen_on("a"));
        assert!(engine.is_ambient("a"));
        assert_eq!(engine.override_group_key("a").as_deref(), Some("g"));
        assert_eq!(engine.importance("missing"), Importance::Unspecified);
    }

    #[test]
    fn test_remove_unknown_key_does_not_recompute() {
        let engine = engine();
        engine.add(engine.create_entry(notification("a", 1)), RankingSnapshot::new());
        let before = engine.active_notifications();
        let mut rx = engine.subscribe();

        assert!(engine.remove("missing", RankingSnapshot::new()).is_none());
        assert!(Arc::ptr_eq(&before, &engine.active_notifications()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_add_then_remove_updates_visible_list() {
        let engine = engine();
        let ranking = RankingSnapshot::new()
            .with("a", RankingInfo::new(Importance::Default, 1))
            .with("b", RankingInfo::new(Importance::Default, 0));
        engine.add(engine.create_entry(notification("a", 1)), ranking.clone());
        engine.add(engine.create_entry(notification("b", 2)), ranking.clone());
        assert_eq!(visible_keys(&engine), vec!["b", "a"]);
        assert_eq!(engine.entry_count(), 2);

        let removed = engine.remove("b", ranking).unwrap();
        assert_eq!(removed.key(), "b");
        assert_eq!(visible_keys(&engine), vec!["a"]);
        assert!(engine.get("b").is_none());
        assert_eq!(engine.all_entries().len(), 1);
    }

    #[test]
    fn test_old_visible_list_stays_valid_for_holders() {
        let engine = engine();
        engine.add(engine.create_entry(notification("a", 1)), RankingSnapshot::new());
        let held = engine.active_notifications();
        engine.remove("a", RankingSnapshot::new());
        assert_eq!(held.len(), 1);
        assert!(engine.active_notifications().is_empty());
    }

    #[test]
    fn test_events_follow_mutation_order() {
        let engine = engine();
        let mut rx = engine.subscribe();
        engine.add(engine.create_entry(notification("a", 1)), RankingSnapshot::new());

        assert_eq!(rx.try_recv().unwrap(), NotificationDataEvent::EntryAdded { key: "a".to_string() });
        assert_eq!(
            rx.try_recv().unwrap(),
            NotificationDataEvent::VisibleListUpdated {
                keys: vec!["a".to_string()]
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_from_config_validates() {
        let config = NotificationsConfig {
            platform_package: String::new(),
            ..NotificationsConfig::default()
        };
        let result = PrioritizationEngine::from_config(&config, Arc::new(OpenEnvironment), Arc::new(NoGroups));
        assert!(matches!(result, Err(NotificationError::InvalidSettings { .. })));
    }

    #[test]
    fn test_from_toml_str_reports_core_and_settings_errors() {
        let core = PrioritizationEngine::from_toml_str(
            "[notifications]\nunknown_field = 1\n",
            Arc::new(OpenEnvironment),
            Arc::new(NoGroups),
        );
        assert!(matches!(core, Err(DomainError::Core(_))));

        let settings = PrioritizationEngine::from_toml_str(
            "[notifications]\nfull_screen_intent_cooldown_ms = 120000\n",
            Arc::new(OpenEnvironment),
            Arc::new(NoGroups),
        );
        assert!(matches!(
            settings,
            Err(DomainError::Notification(NotificationError::InvalidSettings { .. }))
        ));

        let engine = PrioritizationEngine::from_toml_str(
            "[notifications]\nsystem_packages = [\"org.shade.settings\"]\n",
            Arc::new(OpenEnvironment),
            Arc::new(NoGroups),
        )
        .unwrap();
        assert!(engine.settings().is_system_package("org.shade.settings"));
    }

    #[test]
    fn test_empty_ranking_update_keeps_current_snapshot() {
        let engine = engine();
        let ranking = RankingSnapshot::new().with("a", RankingInfo::new(Importance::High, 0).with_override_group_key("g"));
        engine.add(engine.create_entry(notification("a", 1)), ranking);
        let installed = engine.ranking().unwrap();
        let mut rx = engine.subscribe();

        engine.add(engine.create_entry(notification("b", 2)), RankingUpdate::keep());
        assert!(Arc::ptr_eq(&installed, &engine.ranking().unwrap()));
        assert_eq!(engine.importance("a"), Importance::High);
        assert_eq!(visible_keys(&engine), vec!["b", "a"]);

        // No reconciliation ran, so only the add and the recompute were published.
        assert_eq!(rx.try_recv().unwrap(), NotificationDataEvent::EntryAdded { key: "b".to_string() });
        assert!(matches!(rx.try_recv().unwrap(), NotificationDataEvent::VisibleListUpdated { .. }));
        assert!(rx.try_recv().is_err());

        engine.remove("b", None::<RankingSnapshot>);
        assert_eq!(visible_keys(&engine), vec!["a"]);
        assert_eq!(engine.override_group_key("a").as_deref(), Some("g"));
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PrioritizationEngine>();
    }
}
