//! # Lone Peak Night Rules
//!
//! Pure Rust game rules for one night at the office.
//!
//! ## Design Principles
//!
//! 1. **External configuration** - every balance number lives in `nights.toml`
//! 2. **Edge-triggered transitions** - power runs out once, the clock wins once
//! 3. **Monotone threat** - aggression only grows, and more aggression always
//!    means a higher chance to advance
//! 4. **Seeded randomness** - agents roll on an RNG handed in by the caller
//!
//! ## Example
//!
//! ```rust,ignore
//! use lonepeak_night::{NightTable, PowerManager};
//!
//! let table = NightTable::load("data/nights.toml")?;
//! let night = table.night(1)?;
//!
//! let mut power = PowerManager::new();
//! power.start(night.power_time, &mut timers);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod animatronic;
pub mod clock;
pub mod config;
pub mod error;
pub mod power;
pub mod save;

pub use animatronic::{advance_probability, AgentProfile, AgentState, Animatronic, Pose};
pub use clock::{Clock, ClockState};
pub use config::{AgentSchedule, AggressionChange, NightConfig, NightTable};
pub use error::{NightError, NightResult};
pub use power::{PowerManager, ResetProgress, ResetPulse};
pub use save::{SaveData, SaveManager};
