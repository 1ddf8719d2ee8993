//! # Power Manager
//!
//! The shared finite resource of the office.
//!
//! ## Drain
//!
//! Every `UpdatePower` pulse (10 per second) removes
//!
//! ```text
//! min(usage, 5) * 100 / (power_time * 10)
//! ```
//!
//! so a full reservoir lasts `power_time` seconds at usage 1. The level is
//! clamped at zero and `PowerOut` is posted on the crossing only.
//!
//! ## Breaker Reset
//!
//! The mini-game counts `PowerReset` pulses. After `RESET_TIME` pulses
//! (15 s) the next pulse reports [`ResetPulse::Complete`] and the session
//! restores the office. The breaker never adds charge: the level is the same
//! after a reset as before it.

use lonepeak_core::{EventSender, Repeat, TimerId, TimerRegistry};
use lonepeak_shared::constants::{UPDATE_POWER_PERIOD_MS, UPDATE_POWER_PER_SECOND};
use lonepeak_shared::{GameEvent, MAX_POWER_USAGE, POWER_CAPACITY, RESET_TIME};
use serde::Serialize;

/// Outcome of one breaker pulse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetPulse {
    /// Still counting. Holds the new count.
    Progress(u32),
    /// The breaker is done.
    Complete,
}

/// Breaker progress, for the overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResetProgress {
    /// Pulses counted so far.
    pub count: u32,
    /// Pulses needed. 0 when no reset is running.
    pub time: u32,
}

impl ResetProgress {
    /// Completed fraction in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.time == 0 {
            0.0
        } else {
            (f64::from(self.count) / f64::from(self.time)).min(1.0) as f32
        }
    }
}

/// Power reservoir and breaker counters.
#[derive(Clone, Debug)]
pub struct PowerManager {
    /// Current level in `[0, 100]`.
    level: f64,
    /// Drain constant of the night.
    power_time: f64,
    /// True once `PowerOut` has been posted for this reservoir.
    exhausted: bool,
    /// Breaker pulses counted.
    reset_count: u32,
    /// Breaker pulses needed.
    reset_time: u32,
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerManager {
    /// Creates a full reservoir with a unit drain constant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: POWER_CAPACITY,
            power_time: 1.0,
            exhausted: false,
            reset_count: 0,
            reset_time: 0,
        }
    }

    /// Fills the reservoir and starts the drain pulse.
    pub fn start(&mut self, power_time: f64, timers: &mut TimerRegistry) {
        self.power_time = power_time;
        self.level = POWER_CAPACITY;
        self.exhausted = false;
        self.reset_count = 0;
        self.reset_time = 0;
        timers.schedule(
            TimerId::UpdatePower,
            UPDATE_POWER_PERIOD_MS,
            Repeat::Forever,
            GameEvent::UpdatePower,
        );
    }

    /// Stops the drain pulse.
    pub fn stop(&mut self, timers: &mut TimerRegistry) {
        timers.cancel(TimerId::UpdatePower);
    }

    /// Applies one drain pulse.
    ///
    /// Returns `true` if this pulse emptied the reservoir.
    pub fn update_power(&mut self, usage: u8, sender: &EventSender) -> bool {
        let usage = f64::from(usage.min(MAX_POWER_USAGE));
        let drain = usage * POWER_CAPACITY / (self.power_time * UPDATE_POWER_PER_SECOND);
        self.level = (self.level - drain).max(0.0);

        if self.level <= 0.0 && !self.exhausted {
            self.exhausted = true;
            sender.post(GameEvent::PowerOut);
            tracing::info!("Power out");
            return true;
        }
        false
    }

    /// Arms the breaker counters.
    pub fn begin_reset(&mut self) {
        self.reset_count = 0;
        self.reset_time = RESET_TIME;
    }

    /// Counts one breaker pulse.
    pub fn pulse_reset(&mut self) -> ResetPulse {
        if self.reset_count >= self.reset_time {
            ResetPulse::Complete
        } else {
            self.reset_count += 1;
            ResetPulse::Progress(self.reset_count)
        }
    }

    /// Clears the breaker counters. The level is left alone.
    pub fn finish_reset(&mut self) {
        self.reset_count = 0;
        self.reset_time = 0;
    }

    /// True while the breaker counters are armed.
    #[must_use]
    pub fn is_resetting(&self) -> bool {
        self.reset_time > 0
    }

    /// Breaker progress.
    #[must_use]
    pub fn reset_progress(&self) -> ResetProgress {
        ResetProgress {
            count: self.reset_count,
            time: self.reset_time,
        }
    }

    /// Current level in `[0, 100]`.
    #[must_use]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Level rounded down to a whole percent.
    #[must_use]
    pub fn percent(&self) -> u8 {
        // level is clamped to [0, 100]
        self.level.floor().clamp(0.0, POWER_CAPACITY) as u8
    }

    /// Battery bars shown on the HUD (0-5).
    #[must_use]
    pub fn bars(&self) -> u8 {
        (self.level / 20.0).ceil().clamp(0.0, 5.0) as u8
    }

    /// True once the reservoir has run dry.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Drain constant of the running night.
    #[must_use]
    pub fn power_time(&self) -> f64 {
        self.power_time
    }

    /// Overrides the level. Used by tests and the debug runner.
    pub fn set_level(&mut self, level: f64) {
        self.level = level.clamp(0.0, POWER_CAPACITY);
        if self.level > 0.0 {
            self.exhausted = false;
        }
    }
}
