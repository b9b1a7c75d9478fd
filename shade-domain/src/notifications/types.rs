use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;

use bitflags::bitflags;

/// Extras flag a platform alert sets to remain visible before device setup completes.
pub const EXTRA_ALLOW_DURING_SETUP: &str = "android.allowDuringSetup";

/// Identifier of the user (profile) an alert is posted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i32);

impl UserId {
    pub const SYSTEM: UserId = UserId(0);
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Importance assigned by the ranking authority, ordered from least to most important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Importance {
    /// No value was supplied for the alert.
    #[default]
    Unspecified,
    None,
    Min,
    Low,
    Default,
    High,
    Max,
}

impl Importance {
    /// Numeric level as used on the platform wire format.
    pub fn level(self) -> i32 {
        match self {
            Importance::Unspecified => -1000,
            Importance::None => 0,
            Importance::Min => 1,
            Importance::Low => 2,
            Importance::Default => 3,
            Importance::High => 4,
            Importance::Max => 5,
        }
    }

    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            -1000 => Some(Importance::Unspecified),
            0 => Some(Importance::None),
            1 => Some(Importance::Min),
            2 => Some(Importance::Low),
            3 => Some(Importance::Default),
            4 => Some(Importance::High),
            5 => Some(Importance::Max),
            _ => None,
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Importance::Unspecified => "UNSPECIFIED",
            Importance::None => "NONE",
            Importance::Min => "MIN",
            Importance::Low => "LOW",
            Importance::Default => "DEFAULT",
            Importance::High => "HIGH",
            Importance::Max => "MAX",
        };
        f.write_str(name)
    }
}

/// How much of an alert may be shown on a secure lock screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    #[default]
    Private,
    Secret,
}

bitflags! {
    /// Visual effects the ranking authority asks to suppress for an alert.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SuppressedEffects: u32 {
        const SCREEN_OFF = 1;
        const SCREEN_ON = 2;
    }
}

/// The content and metadata of one posted alert.
///
/// Payloads are immutable once posted; a repost replaces the whole value on the
/// owning [`NotificationEntry`](super::entry::NotificationEntry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub key: String,
    pub user_id: UserId,
    pub id: i32,
    pub package_name: String,
    pub when: DateTime<Utc>,
    pub visibility: Visibility,
    #[serde(default)]
    pub extras: HashMap<String, JsonValue>,
    /// Accent color as `0xAARRGGBB`.
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ticker_text: Option<String>,
}

impl Notification {
    pub fn new(key: impl Into<String>, package_name: impl Into<String>, id: i32, when: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            user_id: UserId::SYSTEM,
            id,
            package_name: package_name.into(),
            when,
            visibility: Visibility::default(),
            extras: HashMap::new(),
            color: None,
            title: None,
            ticker_text: None,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.extras.insert(key.into(), value);
        self
    }

    pub fn with_color(mut self, argb: u32) -> Self {
        self.color = Some(argb);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_ticker_text(mut self, ticker_text: impl Into<String>) -> Self {
        self.ticker_text = Some(ticker_text.into());
        self
    }

    /// True when the extras carry `EXTRA_ALLOW_DURING_SETUP = true`.
    pub fn allows_during_setup(&self) -> bool {
        matches!(self.extras.get(EXTRA_ALLOW_DURING_SETUP), Some(JsonValue::Bool(true)))
    }
}
