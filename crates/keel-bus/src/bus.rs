use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::debug;

use keel_types::ProfileId;

use crate::event::{EventKind, LifecycleEvent};

/// Filter for subscribing to a subset of lifecycle events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events from these identities are delivered.
    pub owners: Option<Vec<ProfileId>>,
    /// If set, only events of these kinds are delivered.
    pub kinds: Option<Vec<EventKind>>,
}

impl EventFilter {
    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &LifecycleEvent) -> bool {
        if let Some(ref owners) = self.owners {
            if !owners.contains(&event.owner) {
                return false;
            }
        }
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind) {
                return false;
            }
        }
        true
    }
}

/// A broadcast channel receiver for lifecycle events.
pub type EventStream = broadcast::Receiver<LifecycleEvent>;

/// Internal subscriber: a filter paired with a broadcast sender.
struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<LifecycleEvent>,
}

/// Process-wide publish/subscribe bus for dataset lifecycle events.
pub struct Bus {
    subscribers: RwLock<Vec<Subscriber>>,
    channel_capacity: usize,
}

impl Bus {
    /// Create a bus with the default per-subscriber channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a bus with an explicit per-subscriber channel capacity.
    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            channel_capacity,
        }
    }

    /// Register a subscriber. Returns a receiver for matching events.
    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        let (tx, rx) = broadcast::channel(self.channel_capacity);
        self.subscribers
            .write()
            .expect("bus lock poisoned")
            .push(Subscriber { filter, sender: tx });
        rx
    }

    /// Publish an event to all matching subscribers.
    /// Subscribers whose channels are closed are pruned.
    pub fn publish(&self, event: LifecycleEvent) {
        debug!(kind = %event.kind, alias = %event.alias, "lifecycle event");
        let mut subs = self.subscribers.write().expect("bus lock poisoned");
        subs.retain(|sub| {
            if sub.filter.matches(&event) {
                // If send fails (no receivers), the subscriber is stale.
                sub.sender.send(event.clone()).is_ok()
            } else {
                // Keep non-matching subscribers; they may match future events.
                // Only prune if the channel itself is closed.
                sub.sender.receiver_count() > 0
            }
        });
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("bus lock poisoned").len()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(seed: u8) -> ProfileId {
        ProfileId::from_raw([seed; 32])
    }

    #[test]
    fn subscriber_receives_matching_events() {
        let bus = Bus::new();
        let filter = EventFilter {
            kinds: Some(vec![EventKind::VersionCommitted]),
            ..Default::default()
        };
        let mut stream = bus.subscribe(filter);
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(LifecycleEvent::new(
            owner(1),
            EventKind::VersionCommitted,
            "b5/population",
        ));
        bus.publish(LifecycleEvent::new(
            owner(1),
            EventKind::DatasetDeleted,
            "b5/population",
        ));

        let received = stream.try_recv().unwrap();
        assert_eq!(received.kind, EventKind::VersionCommitted);
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn owner_filter_applies() {
        let bus = Bus::new();
        let filter = EventFilter {
            owners: Some(vec![owner(1)]),
            ..Default::default()
        };
        let mut stream = bus.subscribe(filter);

        bus.publish(LifecycleEvent::new(
            owner(1),
            EventKind::DatasetCreated,
            "alice/a",
        ));
        bus.publish(LifecycleEvent::new(
            owner(2),
            EventKind::DatasetCreated,
            "bob/b",
        ));

        let received = stream.try_recv().unwrap();
        assert_eq!(received.owner, owner(1));
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn empty_filter_matches_everything() {
        let bus = Bus::new();
        let mut stream = bus.subscribe(EventFilter::default());

        bus.publish(LifecycleEvent::new(
            owner(3),
            EventKind::DatasetRenamed,
            "carol/c",
        ));
        assert!(stream.try_recv().is_ok());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = Bus::new();
        let stream = bus.subscribe(EventFilter::default());
        drop(stream);

        bus.publish(LifecycleEvent::new(
            owner(4),
            EventKind::LogbookWritten,
            "",
        ));
        assert_eq!(bus.subscriber_count(), 0);
    }
}
