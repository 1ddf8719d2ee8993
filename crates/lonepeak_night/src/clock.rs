//! # Night Clock
//!
//! Counts in-game hours from 12 AM to 6 AM.
//!
//! ## States
//!
//! - **Idle**: not started, or stopped by the session.
//! - **Running**: accumulates frame time and announces every new hour.
//! - **Terminal**: 6 AM reached. `Win` has been posted exactly once.
//!
//! One frame advances at most one hour. A stalled frame that covers several
//! hours delivers them over the following frames, so every `HourChanged`
//! reaches the session in order.

use lonepeak_core::EventSender;
use lonepeak_shared::constants::START_HOUR;
use lonepeak_shared::{GameEvent, FINAL_HOUR};

/// Lifecycle of the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    /// Not counting.
    Idle,
    /// Counting toward 6 AM.
    Running,
    /// 6 AM reached.
    Terminal,
}

/// In-game clock of one night.
#[derive(Clone, Debug)]
pub struct Clock {
    /// Current hour (0 = 12 AM).
    hour: u8,
    /// Time banked toward the next hour.
    accumulator_ms: u64,
    /// Real time of one in-game hour.
    hour_duration_ms: u64,
    /// Lifecycle state.
    state: ClockState,
    /// Night being counted.
    night: u8,
}

impl Clock {
    /// Creates an idle clock.
    ///
    /// A zero hour length is raised to 1 ms.
    #[must_use]
    pub fn new(hour_duration_ms: u64) -> Self {
        Self {
            hour: START_HOUR,
            accumulator_ms: 0,
            hour_duration_ms: hour_duration_ms.max(1),
            state: ClockState::Idle,
            night: 0,
        }
    }

    /// Restarts the clock at 12 AM.
    pub fn start(&mut self, night: u8) {
        self.hour = START_HOUR;
        self.accumulator_ms = 0;
        self.night = night;
        self.state = ClockState::Running;
        tracing::info!("Night {} clock started at {}", night, self.label());
    }

    /// Stops counting. The hour is kept for display.
    pub fn stop(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Idle;
        }
    }

    /// Advances the clock by one frame.
    ///
    /// Returns the new hour if an hour boundary was crossed.
    pub fn tick(&mut self, elapsed_ms: u64, sender: &EventSender) -> Option<u8> {
        if self.state != ClockState::Running {
            return None;
        }

        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);
        if self.accumulator_ms < self.hour_duration_ms {
            return None;
        }

        self.accumulator_ms -= self.hour_duration_ms;
        self.hour += 1;
        sender.post(GameEvent::HourChanged { hour: self.hour });

        if self.hour >= FINAL_HOUR {
            self.state = ClockState::Terminal;
            self.accumulator_ms = 0;
            sender.post(GameEvent::Win);
            tracing::info!("Night {} reached {}", self.night, self.label());
        } else {
            tracing::debug!("Night {} is now {}", self.night, self.label());
        }

        Some(self.hour)
    }

    /// Current hour (0 = 12 AM).
    #[must_use]
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Night being counted.
    #[must_use]
    pub fn night(&self) -> u8 {
        self.night
    }

    /// Real time of one hour.
    #[must_use]
    pub fn hour_duration_ms(&self) -> u64 {
        self.hour_duration_ms
    }

    /// Wall-clock label, e.g. `12 AM` or `3 AM`.
    #[must_use]
    pub fn label(&self) -> String {
        if self.hour == 0 {
            "12 AM".to_owned()
        } else {
            format!("{} AM", self.hour)
        }
    }
}
