#![forbid(unsafe_code)]

//! Event fan-out to subscribers.
//!
//! Publishing never blocks: each subscriber owns an unbounded
//! [`mpsc`] channel. A subscriber that drops its receiver is pruned on the
//! next publish. A subscriber that never drains its receiver lets events
//! queue without bound; pacing is the consumer's concern.
//!
//! # Example
//!
//! ```
//! use keywire_core::decoder::decode_chunk;
//! use keywire_core::emitter::EventEmitter;
//!
//! let mut emitter = EventEmitter::new();
//! let rx = emitter.subscribe();
//!
//! emitter.publish_all(decode_chunk(b"hi"));
//! assert_eq!(rx.try_iter().count(), 2);
//! ```

use std::sync::mpsc;

use crate::event::InputEvent;

/// Listener list for decoded input events.
#[derive(Debug, Default)]
pub struct EventEmitter {
    subscribers: Vec<mpsc::Sender<InputEvent>>,
}

impl EventEmitter {
    /// Create an emitter with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber; it receives every event published afterwards.
    pub fn subscribe(&mut self) -> mpsc::Receiver<InputEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Number of subscribers still attached (as of the last publish).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver one event to every subscriber.
    pub fn publish(&mut self, event: InputEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            crate::debug!(pruned, remaining = self.subscribers.len(), "pruned closed subscribers");
        }
    }

    /// Deliver events in order.
    pub fn publish_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.publish(event);
        }
    }
}
