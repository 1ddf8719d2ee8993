//! Typed events shared by every unit.
//!
//! Platform input, timer payloads and subsystem signals all travel as a
//! [`GameEvent`]. There are no callbacks: a timer that "does something later"
//! carries one of these events and the orchestrator routes it.

use serde::{Deserialize, Serialize};

/// Event type discriminator
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Generic frame tick
    Frame = 0,
    /// Window resized
    Resize = 1,
    /// Key pressed
    KeyDown = 2,
    /// Clock crossed an hour boundary
    HourChanged = 3,
    /// Night survived
    Win = 4,
    /// Jump-scare requested
    Kill = 5,
    /// Power reservoir exhausted
    PowerOut = 6,
    /// Power drain pulse
    UpdatePower = 7,
    /// Breaker reset pulse
    PowerReset = 8,
    /// Mute button visibility pulse
    MuteTime = 9,
    /// End-of-night delay elapsed
    GameTimer = 10,
    /// Agent movement opportunity
    MoveOpportunity = 11,
    /// Camera monitor raised
    CameraFlippedUp = 12,
    /// Camera monitor lowered
    CameraFlippedDown = 13,
}

/// The closed roster of animatronics.
///
/// Order matters: it is the roster order and the dispatch order.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Left-side stalker
    Bonnie = 0,
    /// Right-side stalker
    Chica = 1,
    /// Slow, long-path right-side stalker
    Lefty = 2,
    /// Fast left-side stalker; also the forced-kill agent of a power-out
    Knight = 3,
}

impl AgentKind {
    /// Every agent kind in roster order.
    pub const ALL: [Self; 4] = [Self::Bonnie, Self::Chica, Self::Lefty, Self::Knight];

    /// Agent whose jump-scare ends a power-out.
    pub const FORCED_KILL: Self = Self::Knight;

    /// Display name, also the key used in night tables.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bonnie => "Bonnie",
            Self::Chica => "Chica",
            Self::Lefty => "Lefty",
            Self::Knight => "Knight",
        }
    }

    /// Resolves a night-table name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Position in the roster.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Side of the office a door guards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorSide {
    /// West hall door
    Left,
    /// East hall door
    Right,
}

/// Keys the session reacts to.
///
/// Input-device polling is out of scope; the platform layer maps its
/// raw key codes onto these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Abort to menu
    Escape,
    /// Toggle left door
    LeftDoor,
    /// Toggle right door
    RightDoor,
    /// Toggle left hall light
    LeftLight,
    /// Toggle right hall light
    RightLight,
    /// Flick the camera monitor up or down
    Camera,
    /// Next camera feed
    NextFeed,
    /// Previous camera feed
    PrevFeed,
    /// Pull the breaker (power reset)
    Breaker,
    /// Press the mute-call button
    MuteCall,
}

/// Audio cues consumed by the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Night-specific phone call (optional asset)
    PhoneCall(u8),
    /// 6 AM chime
    Victory,
    /// Jump-scare scream
    JumpScare,
    /// Power failing
    PowerOff,
}

/// Where the host should go once a session ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuTarget {
    /// Back to the main menu
    Menu,
    /// Continue with the next night
    NextNight,
}

/// Every event the session loop can route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    // =========================================================================
    // Platform Events
    // =========================================================================
    /// One frame elapsed.
    Frame {
        /// Real time covered by the frame.
        elapsed_ms: u64,
    },

    /// The window was resized.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },

    /// A key was pressed.
    KeyDown(Key),

    // =========================================================================
    // Clock Events
    // =========================================================================
    /// The clock crossed an hour boundary.
    HourChanged {
        /// The new hour (0 = 12 AM).
        hour: u8,
    },

    /// 6 AM reached.
    Win,

    // =========================================================================
    // Threat Events
    // =========================================================================
    /// An agent reached the player.
    Kill {
        /// Agent whose jump-scare plays.
        agent: AgentKind,
    },

    /// An agent may try to advance.
    MoveOpportunity {
        /// Agent the opportunity belongs to.
        agent: AgentKind,
    },

    // =========================================================================
    // Power Events
    // =========================================================================
    /// The reservoir hit zero.
    PowerOut,

    /// Drain the reservoir by the current usage.
    UpdatePower,

    /// One pulse of the breaker reset.
    PowerReset,

    // =========================================================================
    // Session Events
    // =========================================================================
    /// Toggle the mute-call button.
    MuteTime,

    /// End-of-night delay elapsed.
    GameTimer,

    /// The camera monitor went up.
    CameraFlippedUp,

    /// The camera monitor went down.
    CameraFlippedDown,
}

impl GameEvent {
    /// Returns the discriminator of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Frame { .. } => EventKind::Frame,
            Self::Resize { .. } => EventKind::Resize,
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::HourChanged { .. } => EventKind::HourChanged,
            Self::Win => EventKind::Win,
            Self::Kill { .. } => EventKind::Kill,
            Self::MoveOpportunity { .. } => EventKind::MoveOpportunity,
            Self::PowerOut => EventKind::PowerOut,
            Self::UpdatePower => EventKind::UpdatePower,
            Self::PowerReset => EventKind::PowerReset,
            Self::MuteTime => EventKind::MuteTime,
            Self::GameTimer => EventKind::GameTimer,
            Self::CameraFlippedUp => EventKind::CameraFlippedUp,
            Self::CameraFlippedDown => EventKind::CameraFlippedDown,
        }
    }

    /// True for events produced by the platform rather than the simulation.
    #[must_use]
    pub const fn is_platform(&self) -> bool {
        matches!(self, Self::Frame { .. } | Self::Resize { .. } | Self::KeyDown(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_names_round_trip() {
        for kind in AgentKind::ALL {
            assert_eq!(AgentKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(AgentKind::from_name("Freddy"), None);
    }

    #[test]
    fn test_roster_order_matches_index() {
        for (i, kind) in AgentKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(AgentKind::FORCED_KILL.index(), 3);
    }

    #[test]
    fn test_platform_events() {
        assert!(GameEvent::Frame { elapsed_ms: 16 }.is_platform());
        assert!(GameEvent::KeyDown(Key::Escape).is_platform());
        assert!(!GameEvent::PowerOut.is_platform());
        assert_eq!(GameEvent::Kill { agent: AgentKind::Chica }.kind(), EventKind::Kill);
    }
}
