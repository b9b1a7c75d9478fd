use serde::{Deserialize, Serialize};

/// Change events published by the [`PrioritizationEngine`](super::engine::PrioritizationEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationDataEvent {
    EntryAdded {
        key: String,
    },
    EntryRemoved {
        key: String,
    },
    OverrideGroupChanged {
        key: String,
        previous: Option<String>,
        current: Option<String>,
    },
    /// The visible list was rebuilt; `keys` is the new display order.
    VisibleListUpdated {
        keys: Vec<String>,
    },
}

impl NotificationDataEvent {
    /// Key of the alert the event is about, if it concerns a single alert.
    pub fn key(&self) -> Option<&str> {
        match self {
            NotificationDataEvent::EntryAdded { key }
            | NotificationDataEvent::EntryRemoved { key }
            | NotificationDataEvent::OverrideGroupChanged { key, .. } => Some(key),
            NotificationDataEvent::VisibleListUpdated { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_key() {
        let added = NotificationDataEvent::EntryAdded { key: "a".to_string() };
        assert_eq!(added.key(), Some("a"));
        let updated = NotificationDataEvent::VisibleListUpdated { keys: vec!["a".to_string()] };
        assert_eq!(updated.key(), None);
    }

    #[test]
    fn test_event_serializes_with_variant_tag() {
        let event = NotificationDataEvent::OverrideGroupChanged {
            key: "a".to_string(),
            previous: None,
            current: Some("g".to_string()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["OverrideGroupChanged"]["current"], "g");
        let back: NotificationDataEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
