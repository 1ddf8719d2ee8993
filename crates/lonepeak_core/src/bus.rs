//! # Event Bus
//!
//! Per-frame queue of typed events.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Timers    │──┐
//! └─────────────┘  │   ┌─────────────┐   drain once    ┌──────────────┐
//! ┌─────────────┐  ├──>│   Channel   │────per frame───>│ Orchestrator │
//! │ Clock/Power │──┤   └─────────────┘                 └──────┬───────┘
//! └─────────────┘  │                                          │
//! ┌─────────────┐  │         fixed-order fan-out              │
//! │   Agents    │──┘<─────────────────────────────────────────┘
//! └─────────────┘
//! ```
//!
//! Producers hold cloned [`EventSender`]s. Only the orchestrator drains.
//! Anything posted while a frame is being dispatched waits for the next drain.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use lonepeak_shared::GameEvent;

/// Event bus for one session.
///
/// Pre-allocates a bounded channel so a runaway producer cannot grow
/// memory without limit.
pub struct EventBus {
    /// Sender end - cloned into producers.
    sender: Sender<GameEvent>,
    /// Receiver end - owned by the orchestrator.
    receiver: Receiver<GameEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events queued between two drains.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Takes every pending event, oldest first.
    pub fn drain(&self) -> Vec<GameEvent> {
        let mut events = Vec::with_capacity(self.receiver.len());
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Drops every pending event.
    pub fn clear(&self) {
        while self.receiver.try_recv().is_ok() {}
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are no pending events.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Handle for posting events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<GameEvent>,
}

impl EventSender {
    /// Posts an event (non-blocking).
    ///
    /// Returns `false` if the queue is full and the event was dropped.
    #[inline]
    pub fn post(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!("event queue full, dropping {:?}", dropped.kind());
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

impl std::fmt::Debug for EventSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSender")
            .field("pending", &self.sender.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lonepeak_shared::{AgentKind, Key};

    #[test]
    fn test_post_and_drain_in_order() {
        let bus = EventBus::new(16);
        let sender = bus.sender();

        assert!(sender.post(GameEvent::KeyDown(Key::LeftDoor)));
        assert!(sender.post(GameEvent::Kill { agent: AgentKind::Chica }));
        assert!(sender.post(GameEvent::Win));
        assert_eq!(bus.pending_count(), 3);

        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                GameEvent::KeyDown(Key::LeftDoor),
                GameEvent::Kill { agent: AgentKind::Chica },
                GameEvent::Win,
            ]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn test_full_queue_drops() {
        let bus = EventBus::new(2);
        let sender = bus.sender();

        assert!(sender.post(GameEvent::UpdatePower));
        assert!(sender.post(GameEvent::UpdatePower));
        assert!(!sender.post(GameEvent::PowerOut));

        assert_eq!(bus.drain(), vec![GameEvent::UpdatePower, GameEvent::UpdatePower]);
    }

    #[test]
    fn test_cloned_senders_share_queue() {
        let bus = EventBus::new(8);
        let a = bus.sender();
        let b = a.clone();

        a.post(GameEvent::MuteTime);
        b.post(GameEvent::GameTimer);

        assert_eq!(bus.pending_count(), 2);
        bus.clear();
        assert!(bus.is_empty());
    }
}
