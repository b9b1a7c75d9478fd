// shade-domain/tests/reconciliation_tests.rs

use chrono::Utc;
use mockall::mock;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use shade_domain::notifications::{
    EngineSettings, GroupCoordinator, GroupingState, Importance, Notification, NotificationEntry, PolicyEnvironment,
    PrioritizationEngine, RankingInfo, RankingSnapshot, UserId,
};
use std::sync::mpsc;
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

mock! {
    Groups {}

    impl GroupCoordinator for Groups {
        fn on_entry_added(&self, entry: &Arc<NotificationEntry>);
        fn on_entry_removed(&self, entry: &Arc<NotificationEntry>);
        fn on_entry_updated(&self, entry: &Arc<NotificationEntry>, previous: &GroupingState);
        fn is_child_in_group_with_summary(&self, notification: &Notification) -> bool;
    }
}

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

/// (key, previous override group, override group the entry carried during the callback)
type Transition = (String, Option<String>, Option<String>);

fn recording_groups(log: Arc<Mutex<Vec<Transition>>>) -> MockGroups {
    let mut groups = MockGroups::new();
    groups.expect_on_entry_added().return_const(());
    groups.expect_on_entry_removed().return_const(());
    groups.expect_is_child_in_group_with_summary().return_const(false);
    groups
        .expect_on_entry_updated()
        .returning(move |entry, previous| {
            log.lock().push((
                entry.key().to_string(),
                previous.override_group_key.clone(),
                entry.grouping_state().override_group_key,
            ));
        });
    groups
}

fn grouped(group: Option<&str>) -> RankingSnapshot {
    let info = RankingInfo::new(Importance::Default, 0);
    let info = match group {
        Some(g) => info.with_override_group_key(g),
        None => info,
    };
    RankingSnapshot::new().with("a", info)
}

fn engine_with(groups: MockGroups) -> PrioritizationEngine {
    PrioritizationEngine::new(EngineSettings::default(), Arc::new(OpenEnvironment), Arc::new(groups))
}

fn entry(engine: &PrioritizationEngine) -> NotificationEntry {
    engine.create_entry(Notification::new("a", "com.example", 1, Utc::now()))
}

#[test]
fn override_group_change_is_reported_once_with_previous_state() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let engine = engine_with(recording_groups(Arc::clone(&log)));

    engine.add(entry(&engine), grouped(Some("g1")));
    engine.update_ranking(grouped(Some("g1")));
    engine.update_ranking(grouped(Some("g2")));
    engine.update_ranking(grouped(None));
    engine.update_ranking(grouped(None));

    assert_eq!(
        *log.lock(),
        vec![
            ("a".to_string(), None, Some("g1".to_string())),
            ("a".to_string(), Some("g1".to_string()), Some("g2".to_string())),
            ("a".to_string(), Some("g2".to_string()), None),
        ]
    );
    assert_eq!(engine.get("a").unwrap().grouping_state().override_group_key, None);
}

#[test]
fn unchanged_snapshot_triggers_no_update_callback() {
    let mut groups = MockGroups::new();
    groups.expect_on_entry_added().times(1).return_const(());
    groups.expect_is_child_in_group_with_summary().return_const(false);
    groups.expect_on_entry_updated().times(0);
    let engine = engine_with(groups);

    engine.add(entry(&engine), grouped(None));
    engine.update_ranking(grouped(None));
    engine.filter_and_sort();
}

#[test]
fn entry_missing_from_snapshot_loses_its_override_group() {
    let mut groups = MockGroups::new();
    groups.expect_on_entry_added().return_const(());
    groups.expect_is_child_in_group_with_summary().return_const(false);
    groups
        .expect_on_entry_updated()
        .withf(|entry, previous| {
            previous.override_group_key.as_deref() == Some("g") && entry.grouping_state().override_group_key.is_none()
        })
        .times(1)
        .return_const(());
    groups
        .expect_on_entry_updated()
        .withf(|_, previous| previous.override_group_key.is_none())
        .times(1)
        .return_const(());
    let engine = engine_with(groups);

    engine.add(entry(&engine), grouped(Some("g")));
    engine.update_ranking(RankingSnapshot::new());
    assert_eq!(engine.override_group_key("a"), None);
}

#[test]
fn removal_notifies_group_coordinator() {
    let mut groups = MockGroups::new();
    groups.expect_on_entry_added().times(1).return_const(());
    groups
        .expect_on_entry_removed()
        .withf(|entry| entry.key() == "a")
        .times(1)
        .return_const(());
    groups.expect_is_child_in_group_with_summary().return_const(false);
    let engine = engine_with(groups);

    engine.add(entry(&engine), RankingSnapshot::new());
    assert!(engine.remove("a", RankingSnapshot::new()).is_some());
    assert!(engine.remove("a", RankingSnapshot::new()).is_none());
}

/// Grouping collaborator that reads back through the engine from inside its callbacks.
#[derive(Default)]
struct LookupGroups {
    engine: Mutex<Weak<PrioritizationEngine>>,
    seen: Mutex<Vec<String>>,
}

impl LookupGroups {
    fn lookup(&self, label: &str, key: &str) {
        let engine = self.engine.lock().upgrade();
        if let Some(engine) = engine {
            let found = engine.get(key).is_some();
            let listed = engine.all_entries().iter().any(|e| e.key() == key);
            let count = engine.entry_count();
            let dumped = engine.dump("").map(|d| d.contains(key)).unwrap_or(false);
            self.seen
                .lock()
                .push(format!("{}:{}:{}", label, key, found && listed && count == 1 && dumped));
        }
    }
}

impl GroupCoordinator for LookupGroups {
    fn on_entry_added(&self, _entry: &Arc<NotificationEntry>) {}
    fn on_entry_removed(&self, _entry: &Arc<NotificationEntry>) {}

    fn on_entry_updated(&self, entry: &Arc<NotificationEntry>, _previous: &GroupingState) {
        self.lookup("updated", entry.key());
    }

    fn is_child_in_group_with_summary(&self, notification: &Notification) -> bool {
        self.lookup("child", &notification.key);
        false
    }
}

#[test]
fn collaborators_can_read_the_engine_from_callbacks() {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let groups = Arc::new(LookupGroups::default());
        let settings = EngineSettings {
            enable_child_notifications: false,
            ..EngineSettings::default()
        };
        let engine = Arc::new(PrioritizationEngine::new(
            settings,
            Arc::new(OpenEnvironment),
            groups.clone(),
        ));
        *groups.engine.lock() = Arc::downgrade(&engine);

        engine.add(entry(&engine), grouped(Some("g")));
        let _ = tx.send(groups.seen.lock().clone());
    });

    let seen = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("engine read accessors blocked inside a collaborator callback");
    assert_eq!(seen, vec!["updated:a:true", "child:a:true"]);
}

