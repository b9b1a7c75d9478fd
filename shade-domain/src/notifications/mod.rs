//! Notification prioritization for the shade.
//!
//! The [`PrioritizationEngine`] keeps every posted alert, applies the current
//! [`RankingSnapshot`] from the ranking authority, filters out alerts the device
//! policy hides and publishes the rest in display order.

pub mod dump;
pub mod engine;
pub mod entry;
pub mod environment;
pub mod errors;
pub mod events;
pub mod ordering;
pub mod policy;
pub mod ranking;
pub mod settings;
pub mod store;
pub mod types;

pub use engine::PrioritizationEngine;
pub use entry::{GroupingState, InterruptionState, NotificationEntry};
pub use environment::{GroupCoordinator, HeadsUpCoordinator, PolicyEnvironment};
pub use errors::NotificationError;
pub use events::NotificationDataEvent;
pub use ordering::{sort_entries, sort_records, RankingComparator, SortRecord};
pub use policy::{show_notification_even_if_unprovisioned, FilterPolicy, FilterReason};
pub use ranking::{RankingInfo, RankingSnapshot, RankingUpdate};
pub use settings::{EngineSettings, MAX_FULL_SCREEN_INTENT_COOLDOWN};
pub use store::EntryStore;
pub use types::{Importance, Notification, SuppressedEffects, UserId, Visibility, EXTRA_ALLOW_DURING_SETUP};
