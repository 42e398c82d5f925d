use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

impl EventLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventLevel::Info => "info",
            EventLevel::Warn => "warn",
            EventLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp_ms: u64,
    pub level: EventLevel,
    pub message: String,
}

impl Event {
    pub fn new(level: EventLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp_ms: now_millis(),
            level,
            message: message.into(),
        }
    }
}

/// Ordered, bounded log of run events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBus {
    events: Vec<Event>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(1024)
    }
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, event: Event) {
        if self.events.len() == self.capacity {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_drops_oldest_when_full() {
        let mut bus = EventBus::with_capacity(2);
        bus.push(Event::new(EventLevel::Info, "one"));
        bus.push(Event::new(EventLevel::Info, "two"));
        bus.push(Event::new(EventLevel::Warn, "three"));
        let messages: Vec<&str> = bus.events().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["two", "three"]);
    }
}
