//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{BattleEvent, PhaseEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Turn boundaries and resolved order
    Turn,
    /// Phase start, suspension, and completion
    Phase,
    /// Commands, battle effects, and the outcome
    Battle,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Turn(TurnEvent),
    Phase(PhaseEvent),
    Battle(BattleEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Turn(_) => Topic::Turn,
            Event::Phase(_) => Topic::Phase,
            Event::Battle(_) => Topic::Battle,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug)]
struct Channels {
    turn: broadcast::Sender<Event>,
    phase: broadcast::Sender<Event>,
    battle: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Turn => &self.turn,
            Topic::Phase => &self.phase,
            Topic::Battle => &self.battle,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Cloning shares the same channels.
#[derive(Debug, Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                turn: broadcast::channel(capacity).0,
                phase: broadcast::channel(capacity).0,
                battle: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    ///
    /// Publishing is best-effort: events sent while nobody is subscribed are
    /// dropped.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
