use arc_swap::ArcSwap;
use parking_lot::Mutex;
use shade_core::types::{Color, MIN_TEXT_CONTRAST_RATIO};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use super::settings::EngineSettings;
use super::types::Notification;

/// Grouping data recorded from the last installed ranking snapshot.
///
/// Reconciliation diffs against this rather than against a copy of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupingState {
    pub override_group_key: Option<String>,
}

/// One-way latch: once interrupted an entry stays interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptionState {
    #[default]
    NotInterrupted,
    Interrupted,
}

#[derive(Debug, Default)]
struct EntryState {
    grouping: GroupingState,
    interruption: InterruptionState,
    auto_redacted: bool,
    legacy: bool,
    last_full_screen_intent_launch: Option<Instant>,
    /// `(raw, resolved)` accent colors.
    contrast_cache: Option<(u32, u32)>,
}

/// A single alert tracked by the engine.
///
/// The key never changes. The payload is swapped atomically on repost, and the
/// per-entry UI state lives behind a small lock of its own, so entries are shared
/// as `Arc<NotificationEntry>` between the store, the visible list and collaborators.
#[derive(Debug)]
pub struct NotificationEntry {
    key: String,
    notification: ArcSwap<Notification>,
    full_screen_intent_cooldown: Duration,
    state: Mutex<EntryState>,
}

impl NotificationEntry {
    pub fn new(notification: Notification, settings: &EngineSettings) -> Self {
        Self::with_cooldown(notification, settings.full_screen_intent_cooldown)
    }

    pub fn with_cooldown(notification: Notification, full_screen_intent_cooldown: Duration) -> Self {
        Self {
            key: notification.key.clone(),
            notification: ArcSwap::from_pointee(notification),
            full_screen_intent_cooldown,
            state: Mutex::new(EntryState::default()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The current payload. The returned `Arc` stays valid across later reposts.
    pub fn notification(&self) -> Arc<Notification> {
        self.notification.load_full()
    }

    /// Replaces the payload after a repost and returns the payload now in effect.
    ///
    /// A payload for a different key is rejected and the current one is returned.
    pub fn update_notification(&self, notification: Notification) -> Arc<Notification> {
        if notification.key != self.key {
            warn!(
                entry_key = %self.key,
                payload_key = %notification.key,
                "Ignoring payload update with mismatched key"
            );
            return self.notification();
        }
        let notification = Arc::new(notification);
        self.notification.store(Arc::clone(&notification));
        notification
    }

    pub fn grouping_state(&self) -> GroupingState {
        self.state.lock().grouping.clone()
    }

    /// Records `grouping` and returns the state it replaced.
    pub(crate) fn replace_grouping_state(&self, grouping: GroupingState) -> GroupingState {
        std::mem::replace(&mut self.state.lock().grouping, grouping)
    }

    pub fn set_interruption(&self) {
        self.state.lock().interruption = InterruptionState::Interrupted;
    }

    pub fn has_interrupted(&self) -> bool {
        self.state.lock().interruption == InterruptionState::Interrupted
    }

    pub fn set_auto_redacted(&self, auto_redacted: bool) {
        self.state.lock().auto_redacted = auto_redacted;
    }

    pub fn is_auto_redacted(&self) -> bool {
        self.state.lock().auto_redacted
    }

    pub fn set_legacy(&self, legacy: bool) {
        self.state.lock().legacy = legacy;
    }

    pub fn is_legacy(&self) -> bool {
        self.state.lock().legacy
    }

    pub fn notify_full_screen_intent_launched(&self) {
        self.state.lock().last_full_screen_intent_launch = Some(Instant::now());
    }

    /// True while inside the cooldown window after the last full-screen launch.
    pub fn has_just_launched_full_screen_intent(&self) -> bool {
        match self.state.lock().last_full_screen_intent_launch {
            Some(launched) => Instant::now() < launched + self.full_screen_intent_cooldown,
            None => false,
        }
    }

    /// Clears redaction, legacy style and the full-screen cooldown. Identity,
    /// grouping and the interruption latch are kept.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.auto_redacted = false;
        state.legacy = false;
        state.last_full_screen_intent_launch = None;
    }

    /// The accent color adjusted to stay legible on a light background.
    ///
    /// Cached per raw color, so a repost with a new color recomputes.
    pub fn contrasted_color(&self) -> Option<u32> {
        let raw = self.notification.load().color?;
        let mut state = self.state.lock();
        if let Some((cached_raw, resolved)) = state.contrast_cache {
            if cached_raw == raw {
                return Some(resolved);
            }
        }
        let resolved = Color::from_argb(raw)
            .ensure_contrast(&Color::WHITE, MIN_TEXT_CONTRAST_RATIO)
            .to_argb();
        state.contrast_cache = Some((raw, resolved));
        Some(resolved)
    }
}
