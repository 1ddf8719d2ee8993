//! # Timer Registry
//!
//! Named countdown timers that post a typed event when they reach zero.
//!
//! ## Semantics
//!
//! - `schedule` creates or replaces the timer with that id. Replacing never
//!   leaves the old countdown running, so a name fires at most once per period.
//! - `cancel` sets the period to 0. The timer stops firing at once and is
//!   purged on the next `tick`.
//! - `tick` posts one event per elapsed period. A frame longer than the
//!   period fires the timer as many times as it covers.

use lonepeak_shared::{AgentKind, GameEvent};

use crate::bus::EventSender;

/// Names of every timer a session can arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Mute-call button visibility.
    MuteTime,
    /// End-of-night delay (jump-scare or victory).
    GameTimer,
    /// Power drain pulse.
    UpdatePower,
    /// Breaker reset pulse.
    PowerReset,
    /// Randomized kill after the power runs out.
    PowerOutKill,
    /// Movement opportunities of one agent.
    Movement(AgentKind),
}

/// How many times a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Until cancelled.
    Forever,
    /// This many more times.
    Times(u32),
}

impl Repeat {
    /// A timer that fires once.
    pub const ONCE: Self = Self::Times(1);
}

/// One named countdown.
#[derive(Clone, Debug)]
pub struct Timer {
    /// Timer name.
    pub id: TimerId,
    /// Reload value in milliseconds. 0 means cancelled.
    pub period_ms: u64,
    /// Milliseconds until the next firing.
    pub remaining_ms: u64,
    /// Remaining firings.
    pub repeat: Repeat,
    /// Event posted on every firing.
    pub event: GameEvent,
}

impl Timer {
    /// True while the timer can still fire.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.period_ms > 0 && self.repeat != Repeat::Times(0)
    }
}

/// Registry of named timers, iterated in scheduling order.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: Vec<Timer>,
}

impl TimerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces the timer `id`.
    ///
    /// A `period_ms` of 0 or `Repeat::Times(0)` cancels the timer instead.
    pub fn schedule(&mut self, id: TimerId, period_ms: u64, repeat: Repeat, event: GameEvent) {
        if period_ms == 0 || repeat == Repeat::Times(0) {
            self.cancel(id);
            return;
        }

        let timer = Timer {
            id,
            period_ms,
            remaining_ms: period_ms,
            repeat,
            event,
        };

        tracing::debug!("timer {:?} armed: {} ms, {:?}", id, period_ms, repeat);

        match self.timers.iter_mut().find(|t| t.id == id) {
            Some(slot) => *slot = timer,
            None => self.timers.push(timer),
        }
    }

    /// Disables the timer `id`. Idempotent.
    pub fn cancel(&mut self, id: TimerId) {
        if let Some(timer) = self.timers.iter_mut().find(|t| t.id == id) {
            timer.period_ms = 0;
        }
    }

    /// Disables every timer.
    pub fn cancel_all(&mut self) {
        for timer in &mut self.timers {
            timer.period_ms = 0;
        }
    }

    /// True if `id` is scheduled and not cancelled.
    #[must_use]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.get(id).is_some_and(Timer::is_live)
    }

    /// Remaining firings of `id`, if it is live.
    #[must_use]
    pub fn remaining_repeats(&self, id: TimerId) -> Option<Repeat> {
        self.get(id).filter(|t| t.is_live()).map(|t| t.repeat)
    }

    /// Looks up a timer by name, live or not.
    #[must_use]
    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    /// Number of live timers.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.timers.iter().filter(|t| t.is_live()).count()
    }

    /// Advances every live timer by `elapsed_ms`, posting one event per firing.
    ///
    /// Returns how many events were posted.
    pub fn tick(&mut self, elapsed_ms: u64, sender: &EventSender) -> usize {
        let mut fired = 0;

        for timer in &mut self.timers {
            let mut budget = elapsed_ms;
            while timer.is_live() {
                if budget < timer.remaining_ms {
                    timer.remaining_ms -= budget;
                    break;
                }
                budget -= timer.remaining_ms;

                sender.post(timer.event);
                fired += 1;

                if let Repeat::Times(n) = timer.repeat {
                    timer.repeat = Repeat::Times(n.saturating_sub(1));
                }
                timer.remaining_ms = timer.period_ms;
            }
        }

        self.timers.retain(Timer::is_live);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;

    fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
        events.iter().filter(|e| **e == wanted).count()
    }

    #[test]
    fn test_fires_once_per_period() {
        let bus = EventBus::new(64);
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerId::UpdatePower, 100, Repeat::Forever, GameEvent::UpdatePower);

        // 16 ms frames: 100 ms needs 7 frames (112 ms)
        for _ in 0..6 {
            timers.tick(16, &bus.sender());
        }
        assert!(bus.is_empty());

        timers.tick(16, &bus.sender());
        assert_eq!(bus.drain(), vec![GameEvent::UpdatePower]);
    }

    #[test]
    fn test_long_frame_catches_up() {
        let bus = EventBus::new(64);
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerId::PowerReset, 100, Repeat::Forever, GameEvent::PowerReset);

        assert_eq!(timers.tick(350, &bus.sender()), 3);
        assert_eq!(timers.get(TimerId::PowerReset).map(|t| t.remaining_ms), Some(50));
    }

    #[test]
    fn test_repeat_count_exhausts() {
        let bus = EventBus::new(256);
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerId::PowerReset, 100, Repeat::Times(3), GameEvent::PowerReset);

        for _ in 0..10 {
            timers.tick(100, &bus.sender());
        }

        assert_eq!(count(&bus.drain(), GameEvent::PowerReset), 3);
        assert!(!timers.is_active(TimerId::PowerReset));
        assert!(timers.get(TimerId::PowerReset).is_none());
    }

    #[test]
    fn test_reschedule_replaces() {
        let bus = EventBus::new(64);
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerId::MuteTime, 2_500, Repeat::Forever, GameEvent::MuteTime);
        timers.tick(2_000, &bus.sender());

        // Same name again: the 2.5 s countdown is gone, 10 s starts fresh
        timers.schedule(TimerId::MuteTime, 10_000, Repeat::Forever, GameEvent::MuteTime);
        timers.tick(9_999, &bus.sender());
        assert!(bus.is_empty());

        timers.tick(1, &bus.sender());
        assert_eq!(bus.drain(), vec![GameEvent::MuteTime]);
        assert_eq!(timers.live_count(), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let bus = EventBus::new(64);
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerId::GameTimer, 1_000, Repeat::ONCE, GameEvent::GameTimer);

        timers.cancel(TimerId::GameTimer);
        timers.cancel(TimerId::GameTimer);
        timers.cancel(TimerId::PowerOutKill);

        assert!(!timers.is_active(TimerId::GameTimer));
        assert_eq!(timers.get(TimerId::GameTimer).map(|t| t.period_ms), Some(0));

        timers.tick(5_000, &bus.sender());
        assert!(bus.is_empty());
        assert!(timers.get(TimerId::GameTimer).is_none());
    }

    #[test]
    fn test_zero_period_cancels() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerId::UpdatePower, 100, Repeat::Forever, GameEvent::UpdatePower);
        timers.schedule(TimerId::UpdatePower, 0, Repeat::Forever, GameEvent::UpdatePower);
        assert!(!timers.is_active(TimerId::UpdatePower));
    }

    #[test]
    fn test_payload_travels_with_event() {
        let bus = EventBus::new(64);
        let mut timers = TimerRegistry::new();
        let kill = GameEvent::Kill { agent: AgentKind::Knight };
        timers.schedule(TimerId::PowerOutKill, 5_000, Repeat::ONCE, kill);
        timers.schedule(
            TimerId::Movement(AgentKind::Bonnie),
            5_000,
            Repeat::Forever,
            GameEvent::MoveOpportunity { agent: AgentKind::Bonnie },
        );

        timers.tick(5_000, &bus.sender());
        let events = bus.drain();

        // Scheduling order is firing order
        assert_eq!(
            events,
            vec![kill, GameEvent::MoveOpportunity { agent: AgentKind::Bonnie }]
        );
        assert_eq!(
            timers.remaining_repeats(TimerId::Movement(AgentKind::Bonnie)),
            Some(Repeat::Forever)
        );
    }

    #[test]
    fn test_cancel_all() {
        let bus = EventBus::new(64);
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerId::UpdatePower, 100, Repeat::Forever, GameEvent::UpdatePower);
        timers.schedule(TimerId::MuteTime, 100, Repeat::Forever, GameEvent::MuteTime);

        timers.cancel_all();
        assert_eq!(timers.live_count(), 0);
        assert_eq!(timers.tick(1_000, &bus.sender()), 0);
    }
}
