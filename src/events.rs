//! Typed runtime events delivered through the
//! [`NotificationCenter`](crate::NotificationCenter).
//!
//! The well-known event shapes mirror what a flagging/experimentation host
//! emits at runtime. Hosts with other event kinds dispatch
//! [`Notification::Custom`] under a [`EventCategory::Custom`] category.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Host-defined key/value context attached to an event.
pub type EventAttributes = HashMap<String, serde_json::Value>;

/// Kind of runtime event that subscribers filter on.
///
/// The set is open: well-known categories are modeled as unit variants and
/// anything else is carried verbatim in [`EventCategory::Custom`].
///
/// # Examples
/// ```
/// use relay_core::EventCategory;
///
/// assert_eq!(EventCategory::from("decision"), EventCategory::Decision);
/// assert_eq!(
///     EventCategory::from("cache-miss"),
///     EventCategory::Custom("cache-miss".to_owned())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// An experiment was activated for a user.
    Activate,
    /// A conversion event was recorded.
    Track,
    /// A flag or experiment decision was made.
    Decision,
    /// The host's configuration datafile was replaced.
    DatafileChange,
    /// The host is about to ship a batch of analytics events.
    LogEvent,
    /// A host-defined category outside the well-known set.
    Custom(String),
}

impl EventCategory {
    /// Name of the category as it appears in host configuration and logs.
    pub fn as_str(&self) -> &str {
        match self {
            EventCategory::Activate => "activate",
            EventCategory::Track => "track",
            EventCategory::Decision => "decision",
            EventCategory::DatafileChange => "datafile-change",
            EventCategory::LogEvent => "log-event",
            EventCategory::Custom(name) => name,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventCategory {
    fn from(name: &str) -> EventCategory {
        match name {
            "activate" => EventCategory::Activate,
            "track" => EventCategory::Track,
            "decision" => EventCategory::Decision,
            "datafile-change" => EventCategory::DatafileChange,
            "log-event" => EventCategory::LogEvent,
            _ => EventCategory::Custom(name.to_owned()),
        }
    }
}

/// Emitted when the host activates an experiment for a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateEvent {
    /// The key of the activated experiment.
    pub experiment_key: String,
    /// Host-side identifier of the experiment.
    pub experiment_id: String,
    /// The user the experiment was activated for.
    pub user_id: String,
    /// Attributes of the user relevant to the activation.
    pub attributes: EventAttributes,
    /// The key of the variation assigned to the user.
    pub variation_key: String,
    /// Host-side identifier of the variation.
    pub variation_id: String,
    /// When the activation happened.
    pub timestamp: DateTime<Utc>,
}

/// Emitted when the host records a conversion event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEvent {
    /// The key of the tracked event.
    pub event_key: String,
    /// The user the event was recorded for.
    pub user_id: String,
    /// Attributes of the user at the time of tracking.
    pub attributes: EventAttributes,
    /// Additional user-defined tags attached to the event.
    pub event_tags: EventAttributes,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Emitted for every flag or experiment decision the host makes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionEvent {
    /// The kind of decision, e.g. `"feature"` or `"ab-test"`.
    pub decision_type: String,
    /// The user the decision was made for.
    pub user_id: String,
    /// Attributes of the user relevant to the decision.
    pub attributes: EventAttributes,
    /// Decision details such as the flag key and chosen variation.
    pub decision_info: serde_json::Value,
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
}

/// Emitted when the host's configuration datafile is replaced at runtime.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatafileChangeEvent {
    /// Raw bytes of the new datafile.
    pub data: Vec<u8>,
    /// When the replacement happened.
    pub timestamp: DateTime<Utc>,
}

/// Emitted when the host is about to ship a batch of analytics events.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    /// Destination the batch is being sent to.
    pub url: String,
    /// The batch body.
    pub payload: serde_json::Value,
    /// When the batch was handed to the dispatcher.
    pub timestamp: DateTime<Utc>,
}

/// Payload of one dispatch.
///
/// Subscribers registered through the generic
/// [`subscribe`](crate::NotificationCenter::subscribe) receive the whole
/// enum; the typed `subscribe_*` helpers unwrap the matching variant.
#[derive(Debug, Clone, Serialize)]
pub enum Notification {
    /// An [`ActivateEvent`].
    Activate(ActivateEvent),
    /// A [`TrackEvent`].
    Track(TrackEvent),
    /// A [`DecisionEvent`].
    Decision(DecisionEvent),
    /// A [`DatafileChangeEvent`].
    DatafileChange(DatafileChangeEvent),
    /// A [`LogEvent`].
    LogEvent(LogEvent),
    /// A host-defined payload.
    Custom(serde_json::Value),
}

impl Notification {
    /// The well-known category this payload belongs to, or `None` for
    /// [`Notification::Custom`] payloads, whose category is chosen by the
    /// host at dispatch time.
    pub fn category(&self) -> Option<EventCategory> {
        match self {
            Notification::Activate(_) => Some(EventCategory::Activate),
            Notification::Track(_) => Some(EventCategory::Track),
            Notification::Decision(_) => Some(EventCategory::Decision),
            Notification::DatafileChange(_) => Some(EventCategory::DatafileChange),
            Notification::LogEvent(_) => Some(EventCategory::LogEvent),
            Notification::Custom(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::{DecisionEvent, EventCategory, Notification};

    #[test]
    fn well_known_names_round_trip() {
        for name in ["activate", "track", "decision", "datafile-change", "log-event"] {
            let category = EventCategory::from(name);
            assert!(!matches!(category, EventCategory::Custom(_)));
            assert_eq!(category.as_str(), name);
        }
    }

    #[test]
    fn unknown_names_become_custom() {
        let category = EventCategory::from("deploy");
        assert_eq!(category, EventCategory::Custom("deploy".to_owned()));
        assert_eq!(category.to_string(), "deploy");
    }

    #[test]
    fn typed_payloads_know_their_category() {
        let notification = Notification::Decision(DecisionEvent {
            decision_type: "feature".to_owned(),
            user_id: "user-1".to_owned(),
            attributes: Default::default(),
            decision_info: json!({"flag": "x"}),
            timestamp: Utc::now(),
        });

        assert_eq!(notification.category(), Some(EventCategory::Decision));
        assert_eq!(Notification::Custom(json!(1)).category(), None);
    }

    #[test]
    fn events_serialize_with_camel_case_keys() {
        let event = DecisionEvent {
            decision_type: "feature".to_owned(),
            user_id: "user-1".to_owned(),
            attributes: Default::default(),
            decision_info: json!({"flag": "x", "variation": "A"}),
            timestamp: Utc::now(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["decisionType"], "feature");
        assert_eq!(value["userId"], "user-1");
        assert_eq!(value["decisionInfo"]["variation"], "A");
    }
}
