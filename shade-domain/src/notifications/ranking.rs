//! Per-alert ranking metadata supplied by the ranking authority.
//!
//! A [`RankingSnapshot`] is immutable; the engine replaces it wholesale on every
//! update. Lookups for keys the snapshot does not know yield the defaults of
//! [`RankingInfo::default`].

use std::collections::HashMap;
use std::sync::Arc;

use super::types::{Importance, SuppressedEffects, Visibility};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankingInfo {
    pub importance: Importance,
    /// Position assigned by the ranking authority; lower sorts first.
    pub rank: i32,
    pub override_group_key: Option<String>,
    pub visibility_override: Option<Visibility>,
    pub suppressed_effects: SuppressedEffects,
    pub is_ambient: bool,
}

impl RankingInfo {
    pub fn new(importance: Importance, rank: i32) -> Self {
        Self {
            importance,
            rank,
            ..Self::default()
        }
    }

    pub fn with_override_group_key(mut self, key: impl Into<String>) -> Self {
        self.override_group_key = Some(key.into());
        self
    }

    pub fn with_visibility_override(mut self, visibility: Visibility) -> Self {
        self.visibility_override = Some(visibility);
        self
    }

    pub fn with_suppressed_effects(mut self, effects: SuppressedEffects) -> Self {
        self.suppressed_effects = effects;
        self
    }

    pub fn with_ambient(mut self, ambient: bool) -> Self {
        self.is_ambient = ambient;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankingSnapshot {
    rankings: HashMap<String, RankingInfo>,
}

impl RankingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the ranking for `key`.
    pub fn with(mut self, key: impl Into<String>, info: RankingInfo) -> Self {
        self.rankings.insert(key.into(), info);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RankingInfo> {
        self.rankings.get(key)
    }

    /// Ranking for `key`, or the defaults when the key is unknown.
    pub fn lookup(&self, key: &str) -> RankingInfo {
        self.rankings.get(key).cloned().unwrap_or_default()
    }

    pub fn importance(&self, key: &str) -> Importance {
        self.rankings.get(key).map(|r| r.importance).unwrap_or_default()
    }

    pub fn rank(&self, key: &str) -> i32 {
        self.rankings.get(key).map(|r| r.rank).unwrap_or(0)
    }

    pub fn override_group_key(&self, key: &str) -> Option<&str> {
        self.rankings.get(key).and_then(|r| r.override_group_key.as_deref())
    }

    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rankings.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, RankingInfo)> for RankingSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, RankingInfo)>>(iter: I) -> Self {
        Self {
            rankings: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Ranking input of an engine mutation.
///
/// Carries either a new snapshot to install, or nothing, in which case the
/// current snapshot stays in place, reconciliation is skipped and the visible
/// list is only re-filtered and re-sorted.
#[derive(Debug, Clone, Default)]
pub struct RankingUpdate(Option<Arc<RankingSnapshot>>);

impl RankingUpdate {
    /// Keep the installed snapshot.
    pub fn keep() -> Self {
        Self(None)
    }

    pub fn snapshot(&self) -> Option<&Arc<RankingSnapshot>> {
        self.0.as_ref()
    }

    pub fn into_snapshot(self) -> Option<Arc<RankingSnapshot>> {
        self.0
    }
}

impl From<RankingSnapshot> for RankingUpdate {
    fn from(snapshot: RankingSnapshot) -> Self {
        Self(Some(Arc::new(snapshot)))
    }
}

impl From<Arc<RankingSnapshot>> for RankingUpdate {
    fn from(snapshot: Arc<RankingSnapshot>) -> Self {
        Self(Some(snapshot))
    }
}

impl From<Option<RankingSnapshot>> for RankingUpdate {
    fn from(snapshot: Option<RankingSnapshot>) -> Self {
        Self(snapshot.map(Arc::new))
    }
}

impl From<Option<Arc<RankingSnapshot>>> for RankingUpdate {
    fn from(snapshot: Option<Arc<RankingSnapshot>>) -> Self {
        Self(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_unknown_key_yields_defaults() {
        let snapshot = RankingSnapshot::new().with("a", RankingInfo::new(Importance::High, 3));
        let info = snapshot.lookup("missing");
        assert_eq!(info, RankingInfo::default());
        assert_eq!(info.importance, Importance::Unspecified);
        assert_eq!(info.rank, 0);
        assert_eq!(info.visibility_override, None);
        assert!(info.suppressed_effects.is_empty());
        assert!(!info.is_ambient);
        assert_eq!(snapshot.override_group_key("missing"), None);
    }

    #[test]
    fn test_builders_and_accessors() {
        let snapshot: RankingSnapshot = vec![
            (
                "a",
                RankingInfo::new(Importance::Low, 7)
                    .with_override_group_key("group")
                    .with_visibility_override(Visibility::Secret)
                    .with_suppressed_effects(SuppressedEffects::SCREEN_ON)
                    .with_ambient(true),
            ),
            ("b", RankingInfo::new(Importance::Max, 0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.importance("a"), Importance::Low);
        assert_eq!(snapshot.rank("a"), 7);
        assert_eq!(snapshot.override_group_key("a"), Some("group"));
        assert_eq!(snapshot.lookup("a").visibility_override, Some(Visibility::Secret));
        assert!(snapshot.lookup("a").is_ambient);
        assert_eq!(snapshot.importance("b"), Importance::Max);

        let mut keys: Vec<_> = snapshot.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_ranking_update_conversions() {
        assert!(RankingUpdate::keep().snapshot().is_none());
        assert!(RankingUpdate::from(None::<RankingSnapshot>).into_snapshot().is_none());
        let shared = Arc::new(RankingSnapshot::new().with("a", RankingInfo::new(Importance::Low, 1)));
        let update = RankingUpdate::from(Arc::clone(&shared));
        assert!(Arc::ptr_eq(update.snapshot().unwrap(), &shared));
        assert_eq!(
            RankingUpdate::from(Some(RankingSnapshot::new())).into_snapshot().map(|s| s.len()),
            Some(0)
        );
    }
}
