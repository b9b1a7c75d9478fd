//! Domain layer of the shade: notification prioritization on top of `shade-core`.

pub use shade_core as core;

pub mod error;
pub mod notifications;

pub use error::{DomainError, DomainResult};
pub use notifications::{
    EngineSettings, GroupCoordinator, HeadsUpCoordinator, Importance, Notification, NotificationDataEvent,
    NotificationEntry, NotificationError, PolicyEnvironment, PrioritizationEngine, RankingInfo, RankingSnapshot,
    RankingUpdate, SuppressedEffects, UserId, Visibility,
};
