use chrono::{DateTime, Utc};

use crate::{EventId, EventType};

/// Immutable unit of discovered information.
///
/// Every event except a seed carries the id of exactly one parent. The only
/// way to obtain a parent id is to derive from an existing event, so parent
/// chains always end at a seed and can never loop back on themselves.
/// Lineage is reconstructed by following `parent` ids through an event log;
/// events never hold references to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    id: EventId,
    event_type: EventType,
    data: String,
    producer: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    parent: Option<EventId>,
    generated_at: DateTime<Utc>,
}

impl Event {
    /// Root of a provenance chain, injected by the orchestrator.
    pub fn seed(
        event_type: EventType,
        data: impl Into<String>,
        producer: impl Into<String>,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            data: data.into(),
            producer: producer.into(),
            parent: None,
            generated_at: Utc::now(),
        }
    }

    /// New event caused by `parent`.
    pub fn derived(
        event_type: EventType,
        data: impl Into<String>,
        producer: impl Into<String>,
        parent: &Event,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            data: data.into(),
            producer: producer.into(),
            parent: Some(parent.id),
            generated_at: Utc::now(),
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn producer(&self) -> &str {
        &self.producer
    }

    pub fn parent(&self) -> Option<EventId> {
        self.parent
    }

    pub fn is_seed(&self) -> bool {
        self.parent.is_none()
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_events_point_at_their_parent() {
        let seed = Event::seed(EventType::Root, "example.com", "orchestrator");
        let child =
            Event::derived(EventType::DomainName, "example.com", "dns", &seed);

        assert!(seed.is_seed());
        assert_eq!(child.parent(), Some(seed.id()));
        assert_ne!(child.id(), seed.id());
        assert_eq!(child.producer(), "dns");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialized_event_uses_wire_type_names() {
        let seed = Event::seed(EventType::NetblockOwner, "10.0.0.0/30", "test");
        let value = serde_json::to_value(&seed).unwrap();

        assert_eq!(value["event_type"], "NETBLOCK_OWNER");
        assert!(value.get("parent").is_none());

        let back: Event = serde_json::from_value(value).unwrap();
        assert_eq!(back, seed);
    }
}
