//! # Night Constants
//!
//! The fixed rules of a night. Balance data (drain constants, difficulty,
//! aggression schedules) lives in `data/nights.toml`, not here.

// =============================================================================
// FRAME LOOP
// =============================================================================

/// Frames per second of the session loop.
pub const FRAME_RATE: u32 = 60;

/// Capacity of the per-frame event queue.
pub const EVENT_CAPACITY: usize = 1024;

// =============================================================================
// CLOCK
// =============================================================================

/// Hour at which a night starts (12 AM).
pub const START_HOUR: u8 = 0;

/// Terminal hour (6 AM). Reaching it wins the night.
pub const FINAL_HOUR: u8 = 6;

/// Default real-time length of one in-game hour.
pub const DEFAULT_HOUR_DURATION_MS: u64 = 90_000;

// =============================================================================
// NIGHTS
// =============================================================================

/// First playable night.
pub const FIRST_NIGHT: u8 = 1;

/// Last playable night. Finishing it writes back `FINAL_NIGHT - 1`.
pub const FINAL_NIGHT: u8 = 7;

// =============================================================================
// POWER
// =============================================================================

/// Full reservoir level.
pub const POWER_CAPACITY: f64 = 100.0;

/// Hard cap on power usage per period.
pub const MAX_POWER_USAGE: u8 = 5;

/// Period of the power drain pulse.
pub const UPDATE_POWER_PERIOD_MS: u64 = 100;

/// Drain pulses per second.
pub const UPDATE_POWER_PER_SECOND: f64 = 10.0;

/// Period of a power-reset pulse.
pub const POWER_RESET_PERIOD_MS: u64 = 100;

/// Pulses the breaker needs before power comes back (15 s).
pub const RESET_TIME: u32 = 150;

/// Lower bound of the forced-kill delay after the power runs out.
pub const POWER_OUT_KILL_MIN_MS: u64 = 5_000;

/// Upper bound of the forced-kill delay after the power runs out.
pub const POWER_OUT_KILL_MAX_MS: u64 = 40_000;

// =============================================================================
// AGENTS
// =============================================================================

/// Maximum aggression of an animatronic.
pub const MAX_AGGRESSION: u8 = 20;

/// Maximum difficulty of an animatronic.
pub const MAX_DIFFICULTY: u8 = 20;

// =============================================================================
// SESSION TIMERS
// =============================================================================

/// Delay before the mute button first appears.
pub const MUTE_FIRST_DELAY_MS: u64 = 2_500;

/// Visibility period of the mute button once shown.
pub const MUTE_REPEAT_MS: u64 = 10_000;

/// Delay between a jump-scare and the return to the menu.
pub const KILL_GAME_TIMER_MS: u64 = 1_000;

/// Lead time cut from the victory cue before advancing.
pub const VICTORY_LEAD_MS: u64 = 1_000;
