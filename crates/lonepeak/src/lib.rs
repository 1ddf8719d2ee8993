//! # Lone Peak
//!
//! One night at the office: survive from 12 AM to 6 AM while animatronics walk
//! the halls and the power runs down.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  inputs   ┌──────────────────────────────────────────┐
//! │ InputSource  │──────────>│                 Session                  │
//! └──────────────┘           │ ┌────────┐ ┌───────┐ ┌───────┐ ┌───────┐ │
//! ┌──────────────┐  frames   │ │ Timers │ │ Clock │ │ Power │ │Roster │ │
//! │   GameLoop   │──────────>│ └────────┘ └───────┘ └───────┘ └───────┘ │
//! └──────────────┘           │ ┌────────┐ ┌────────────┐ ┌───────────┐  │
//!                            │ │ Office │ │ Subsystems │ │ AudioDeck │  │
//!                            │ └────────┘ └────────────┘ └───────────┘  │
//!                            └──────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use lonepeak::{Autopilot, GameConfig, GameLoop, HeadlessDeck, Session};
//! use lonepeak_night::{NightTable, SaveManager};
//!
//! let config = GameConfig::load_or_default("data/game.toml")?;
//! let nights = NightTable::load(&config.nights_path)?;
//! let saves = SaveManager::new(&config.save_path);
//!
//! let mut session = Session::new(&config, nights, saves, Box::new(HeadlessDeck::standard()))?;
//! session.start()?;
//!
//! let outcome = GameLoop::new(config.frame_rate).run(&mut session, &mut Autopilot::default());
//! println!("{:?}", outcome.end_target);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod audio;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod office;
pub mod session;
pub mod systems;

pub use audio::{AudioDeck, HeadlessDeck};
pub use config::GameConfig;
pub use error::{SessionError, SessionResult};
pub use game_loop::{
    Autopilot, FramePacer, FrameStats, GameLoop, InputSource, LoopOutcome, NoInput, ScriptedInput,
};
pub use office::{Door, Office};
pub use session::{AgentView, Flick, MuteButton, Session, SessionSnapshot, SessionStatus};
pub use systems::{CameraSystem, Subsystem, SubsystemView};
