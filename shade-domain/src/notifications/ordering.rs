//! Display order of visible alerts.
//!
//! Highest priority first:
//! 1. heads-up alerts, ordered among themselves by the [`HeadsUpCoordinator`];
//! 2. the alert of the active media session, unless its importance is `Min` or lower;
//! 3. system-max alerts (`High` or above from a system package);
//! 4. lower ranking-authority rank;
//! 5. newer `when`.
//!
//! Entries equal under all five keep their relative order because
//! [`sort_records`] uses a stable sort. The inputs of each entry are captured
//! once into a [`SortRecord`] before sorting, so a payload repost or a heads-up
//! change that lands mid-sort cannot break the total order.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::sync::Arc;

use super::entry::NotificationEntry;
use super::environment::HeadsUpCoordinator;
use super::ranking::RankingSnapshot;
use super::settings::EngineSettings;
use super::types::{Importance, Notification};

/// Ordering inputs of one entry, read once so a sort never sees them change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SortKey {
    heads_up: bool,
    media: bool,
    system_max: bool,
    rank: i32,
    when: DateTime<Utc>,
}

/// An entry paired with the ordering inputs captured for it.
#[derive(Debug)]
pub struct SortRecord {
    entry: Arc<NotificationEntry>,
    key: SortKey,
}

impl SortRecord {
    pub fn entry(&self) -> &Arc<NotificationEntry> {
        &self.entry
    }

    pub fn into_entry(self) -> Arc<NotificationEntry> {
        self.entry
    }
}

pub struct RankingComparator<'a> {
    ranking: Option<&'a RankingSnapshot>,
    media_key: Option<&'a str>,
    heads_up: Option<&'a dyn HeadsUpCoordinator>,
    settings: &'a EngineSettings,
}

impl<'a> RankingComparator<'a> {
    pub fn new(
        ranking: Option<&'a RankingSnapshot>,
        media_key: Option<&'a str>,
        heads_up: Option<&'a dyn HeadsUpCoordinator>,
        settings: &'a EngineSettings,
    ) -> Self {
        Self {
            ranking,
            media_key,
            heads_up,
            settings,
        }
    }

    /// `(importance, rank)` used for ordering. Before any snapshot exists every
    /// alert sorts as `Default` with rank 0.
    fn ranking_of(&self, key: &str) -> (Importance, i32) {
        match self.ranking {
            Some(snapshot) => (snapshot.importance(key), snapshot.rank(key)),
            None => (Importance::Default, 0),
        }
    }

    fn sort_key(&self, entry: &NotificationEntry, notification: &Notification) -> SortKey {
        let key = entry.key();
        let (importance, rank) = self.ranking_of(key);
        SortKey {
            heads_up: self.heads_up.map_or(false, |h| h.is_heads_up(key)),
            media: self.media_key == Some(key) && importance > Importance::Min,
            system_max: importance >= Importance::High && self.settings.is_system_package(&notification.package_name),
            rank,
            when: notification.when,
        }
    }

    /// Captures the ordering inputs of `entry` from its current payload.
    pub fn record(&self, entry: &Arc<NotificationEntry>) -> SortRecord {
        self.record_with(entry, &entry.notification())
    }

    /// Captures the ordering inputs of `entry` using an already loaded `notification`.
    pub fn record_with(&self, entry: &Arc<NotificationEntry>, notification: &Notification) -> SortRecord {
        SortRecord {
            entry: Arc::clone(entry),
            key: self.sort_key(entry, notification),
        }
    }

    fn compare_keys(&self, a: &NotificationEntry, a_key: &SortKey, b: &NotificationEntry, b_key: &SortKey) -> Ordering {
        if a_key.heads_up && b_key.heads_up {
            if let Some(heads_up) = self.heads_up {
                return heads_up.compare(a, b);
            }
        }
        b_key
            .heads_up
            .cmp(&a_key.heads_up)
            .then_with(|| b_key.media.cmp(&a_key.media))
            .then_with(|| b_key.system_max.cmp(&a_key.system_max))
            .then_with(|| a_key.rank.cmp(&b_key.rank))
            .then_with(|| b_key.when.cmp(&a_key.when))
    }

    /// `Less` means `a` is displayed before `b`.
    pub fn compare(&self, a: &NotificationEntry, b: &NotificationEntry) -> Ordering {
        let a_key = self.sort_key(a, &a.notification());
        let b_key = self.sort_key(b, &b.notification());
        self.compare_keys(a, &a_key, b, &b_key)
    }

    /// Compares captured records. Only the heads-up delegate is consulted live.
    pub fn compare_records(&self, a: &SortRecord, b: &SortRecord) -> Ordering {
        self.compare_keys(&a.entry, &a.key, &b.entry, &b.key)
    }
}

/// Stable sort of `records` into display order.
pub fn sort_records(records: &mut [SortRecord], comparator: &RankingComparator<'_>) {
    records.sort_by(|a, b| comparator.compare_records(a, b));
}

/// Stable sort of `entries` into display order. Each entry's inputs are read once.
pub fn sort_entries(entries: &mut [Arc<NotificationEntry>], comparator: &RankingComparator<'_>) {
    let mut records: Vec<SortRecord> = entries.iter().map(|e| comparator.record(e)).collect();
    sort_records(&mut records, comparator);
    for (slot, record) in entries.iter_mut().zip(records) {
        *slot = record.into_entry();
    }
}
