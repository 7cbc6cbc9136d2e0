use std::collections::HashMap;

use hostintel_model::{Event, EventId};

/// Append-only record of every event seen during a run, in emission order.
///
/// Events only carry their parent's id, so lineage is answered here by
/// walking ids back through the log.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
    index: HashMap<EventId, usize>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` and leaves the log untouched when an event with the
    /// same id was already appended.
    pub fn append(&mut self, event: Event) -> bool {
        if self.index.contains_key(&event.id()) {
            return false;
        }
        self.index.insert(event.id(), self.events.len());
        self.events.push(event);
        true
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.index.get(&id).map(|&pos| &self.events[pos])
    }

    /// The event followed by each of its ancestors, ending at the seed.
    ///
    /// Stops early if an ancestor never made it into this log.
    pub fn lineage(&self, id: EventId) -> Vec<&Event> {
        let mut chain = Vec::new();
        let mut cursor = self.get(id);
        while let Some(event) = cursor {
            chain.push(event);
            cursor = event.parent().and_then(|parent| self.get(parent));
        }
        chain
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use hostintel_model::EventType;

    use super::*;

    #[test]
    fn lineage_walks_back_to_the_seed() {
        let seed = Event::seed(EventType::NetblockOwner, "203.0.113.0/30", "test");
        let addr = Event::derived(EventType::IpAddress, "203.0.113.1", "unit", &seed);
        let raw = Event::derived(EventType::RawRirData, "{}", "unit", &addr);

        let mut log = EventLog::new();
        for event in [&seed, &addr, &raw] {
            assert!(log.append(event.clone()));
        }

        let chain: Vec<_> = log.lineage(raw.id()).iter().map(|e| e.id()).collect();
        assert_eq!(chain, vec![raw.id(), addr.id(), seed.id()]);
        assert_eq!(log.lineage(seed.id()).len(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let seed = Event::seed(EventType::IpAddress, "192.0.2.1", "test");
        let mut log = EventLog::new();

        assert!(log.append(seed.clone()));
        assert!(!log.append(seed));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn unknown_ids_have_no_lineage() {
        let log = EventLog::new();
        assert!(log.lineage(EventId::new()).is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn iterates_in_insertion_order() {
        let a = Event::seed(EventType::DomainName, "a.example", "test");
        let b = Event::seed(EventType::DomainName, "b.example", "test");
        let mut log = EventLog::new();
        log.append(a.clone());
        log.append(b.clone());

        let data: Vec<_> = log.iter().map(Event::data).collect();
        assert_eq!(data, vec!["a.example", "b.example"]);
    }
}
