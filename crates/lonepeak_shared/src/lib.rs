//! # Lone Peak Shared
//!
//! Common types used by every unit of the night simulation.
//!
//! ## CRITICAL RULE
//!
//! This crate holds vocabulary only:
//! - constants that fix the rules of a night
//! - the typed events that flow over the event bus
//!
//! If you need behavior, put it in `lonepeak_core` or `lonepeak_night`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod events;

pub use constants::{
    FINAL_HOUR, FINAL_NIGHT, FIRST_NIGHT, FRAME_RATE, MAX_AGGRESSION, MAX_DIFFICULTY,
    MAX_POWER_USAGE, POWER_CAPACITY, RESET_TIME,
};
pub use events::{AgentKind, Cue, DoorSide, EventKind, GameEvent, Key, MenuTarget};
