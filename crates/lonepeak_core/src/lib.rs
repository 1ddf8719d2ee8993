//! # Lone Peak Core
//!
//! The scheduling kernel of a night.
//!
//! ## Architecture Rules
//!
//! 1. **No blocking** - timers are the only suspension mechanism
//! 2. **Typed events** - a firing timer posts a [`GameEvent`], it never calls back
//! 3. **One queue per frame** - everything posted during frame N is delivered in frame N+1
//!
//! ## Example
//!
//! ```rust
//! use lonepeak_core::{EventBus, Repeat, TimerId, TimerRegistry};
//! use lonepeak_shared::GameEvent;
//!
//! let bus = EventBus::new(64);
//! let mut timers = TimerRegistry::new();
//! timers.schedule(TimerId::UpdatePower, 100, Repeat::Forever, GameEvent::UpdatePower);
//!
//! timers.tick(250, &bus.sender());
//! assert_eq!(bus.drain().len(), 2);
//! ```
//!
//! [`GameEvent`]: lonepeak_shared::GameEvent

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bus;
pub mod timer;

pub use bus::{EventBus, EventSender};
pub use timer::{Repeat, Timer, TimerId, TimerRegistry};
