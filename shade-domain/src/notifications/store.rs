use std::collections::BTreeMap;
use std::sync::Arc;

use super::entry::NotificationEntry;

/// Key-to-entry map backing the engine. Exactly one entry exists per key.
///
/// The store itself is not synchronized; the engine mutates it behind a single
/// mutex and publishes a clone after every structural change for lock-free reads.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: BTreeMap<String, Arc<NotificationEntry>>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry`, returning the entry it replaced under the same key.
    pub fn insert(&mut self, entry: Arc<NotificationEntry>) -> Option<Arc<NotificationEntry>> {
        self.entries.insert(entry.key().to_string(), entry)
    }

    pub fn remove(&mut self, key: &str) -> Option<Arc<NotificationEntry>> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<Arc<NotificationEntry>> {
        self.entries.get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<NotificationEntry>> {
        self.entries.values()
    }

    pub fn snapshot(&self) -> Vec<Arc<NotificationEntry>> {
        self.entries.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::types::Notification;
    use chrono::Utc;
    use std::time::Duration;

    fn entry(key: &str) -> Arc<NotificationEntry> {
        Arc::new(NotificationEntry::with_cooldown(
            Notification::new(key, "com.example", 1, Utc::now()),
            Duration::from_secs(2),
        ))
    }

    #[test]
    fn test_insert_replaces_same_key() {
        let mut store = EntryStore::new();
        let first = entry("a");
        assert!(store.insert(first.clone()).is_none());
        let replaced = store.insert(entry("a")).unwrap();
        assert!(Arc::ptr_eq(&replaced, &first));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_unknown_key_is_none() {
        let mut store = EntryStore::new();
        store.insert(entry("a"));
        assert!(store.remove("b").is_none());
        assert!(store.remove("a").is_some());
        assert!(store.is_empty());
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_snapshot_is_key_ordered() {
        let mut store = EntryStore::new();
        for key in ["c", "a", "b"] {
            store.insert(entry(key));
        }
        let keys: Vec<_> = store.snapshot().iter().map(|e| e.key().to_string()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert!(store.contains_key("b"));
        assert_eq!(store.iter().count(), 3);
    }
}
