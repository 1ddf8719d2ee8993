//! # Animatronic Agents
//!
//! Autonomous threats walking a fixed path from the stage to one office door.
//!
//! ## States
//!
//! ```text
//!          roll ok            last step
//! Idle ──────────> Advancing ──────────> AtDoor ──┬── undefended ──> Jumpscare
//!  ^                                              │
//!  │               next opportunity               └── defended, next
//!  └─────────────────────────────── Repelled <──────  opportunity
//! ```
//!
//! - An agent only reacts to its own `MoveOpportunity`.
//! - Reaching the door undefended kills immediately. A defended agent waits
//!   one opportunity and then gives up, or kills if the door opened meanwhile.
//! - `Jumpscare` is terminal. The session stops every agent afterwards.
//!
//! ## Advance Roll
//!
//! `P(advance) = aggression * (10 + difficulty) / 600`, capped at 1. Strictly
//! increasing in aggression; an agent with zero aggression never moves.

use lonepeak_core::{EventSender, Repeat, TimerId, TimerRegistry};
use lonepeak_shared::{AgentKind, DoorSide, GameEvent, MAX_AGGRESSION, MAX_DIFFICULTY};
use rand::Rng;
use serde::Serialize;

/// Denominator of the advance roll.
const ROLL_RANGE: u32 = 600;

/// Behavior state of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AgentState {
    /// On stage.
    Idle,
    /// Walking the hall.
    Advancing {
        /// Steps taken, in `1..path_len`.
        step: u8,
    },
    /// Waiting at a closed door.
    AtDoor,
    /// Reached the player.
    Jumpscare,
    /// Turned back by a door. Returns to the stage at the next opportunity.
    Repelled,
}

/// What a renderer should draw for an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Pose {
    /// Standing on stage.
    Stage,
    /// Visible at a hall camera.
    Hall(u8),
    /// Framed in the doorway.
    Doorway,
    /// Jump-scare animation.
    Attacking,
    /// Walking away.
    Retreating,
}

impl From<AgentState> for Pose {
    fn from(state: AgentState) -> Self {
        match state {
            AgentState::Idle => Self::Stage,
            AgentState::Advancing { step } => Self::Hall(step),
            AgentState::AtDoor => Self::Doorway,
            AgentState::Jumpscare => Self::Attacking,
            AgentState::Repelled => Self::Retreating,
        }
    }
}

/// Fixed traits of an agent kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentProfile {
    /// Door the agent attacks.
    pub door: DoorSide,
    /// Steps from the stage to the door.
    pub path_len: u8,
    /// Period of its movement opportunities.
    pub move_interval_ms: u64,
}

impl AgentProfile {
    /// Profile of `kind`.
    #[must_use]
    pub const fn of(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Bonnie => Self {
                door: DoorSide::Left,
                path_len: 3,
                move_interval_ms: 4_970,
            },
            AgentKind::Chica => Self {
                door: DoorSide::Right,
                path_len: 3,
                move_interval_ms: 4_980,
            },
            AgentKind::Lefty => Self {
                door: DoorSide::Right,
                path_len: 4,
                move_interval_ms: 5_010,
            },
            AgentKind::Knight => Self {
                door: DoorSide::Left,
                path_len: 2,
                move_interval_ms: 3_020,
            },
        }
    }
}

/// Probability that one opportunity advances the agent.
#[must_use]
pub fn advance_probability(aggression: u8, difficulty: u8) -> f64 {
    let weight = u32::from(aggression.min(MAX_AGGRESSION)) * (10 + u32::from(difficulty.min(MAX_DIFFICULTY)));
    (f64::from(weight) / f64::from(ROLL_RANGE)).min(1.0)
}

/// One animatronic of the roster.
#[derive(Clone, Debug)]
pub struct Animatronic {
    /// Identity.
    kind: AgentKind,
    /// Path and timing.
    profile: AgentProfile,
    /// Current aggression (0-20).
    aggression: u8,
    /// Night difficulty (0-20).
    difficulty: u8,
    /// Behavior state.
    state: AgentState,
    /// Pose shown to renderers.
    pose: Pose,
    /// While set, the pose does not follow the state.
    pose_frozen: bool,
}

impl Animatronic {
    /// Creates an idle agent with no aggression.
    #[must_use]
    pub fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            profile: AgentProfile::of(kind),
            aggression: 0,
            difficulty: 0,
            state: AgentState::Idle,
            pose: Pose::Stage,
            pose_frozen: false,
        }
    }

    /// Sets the night difficulty (capped at 20).
    pub fn set_difficulty(&mut self, difficulty: u8) {
        self.difficulty = difficulty.min(MAX_DIFFICULTY);
    }

    /// Raises aggression by `delta` (capped at 20).
    pub fn update_aggression(&mut self, delta: u8) {
        let before = self.aggression;
        self.aggression = self.aggression.saturating_add(delta).min(MAX_AGGRESSION);
        if self.aggression != before {
            tracing::info!(
                "{} aggression {} -> {}",
                self.kind,
                before,
                self.aggression
            );
        }
    }

    /// Arms the movement-opportunity timer.
    pub fn start(&mut self, timers: &mut TimerRegistry) {
        timers.schedule(
            TimerId::Movement(self.kind),
            self.profile.move_interval_ms,
            Repeat::Forever,
            GameEvent::MoveOpportunity { agent: self.kind },
        );
    }

    /// Cancels the movement-opportunity timer.
    pub fn stop(&mut self, timers: &mut TimerRegistry) {
        timers.cancel(TimerId::Movement(self.kind));
    }

    /// Reacts to one routed event.
    ///
    /// `defended` tells whether this agent's door is currently closed.
    /// Returns the new state if it changed.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        event: &GameEvent,
        defended: bool,
        rng: &mut R,
        sender: &EventSender,
    ) -> Option<AgentState> {
        match event {
            GameEvent::MoveOpportunity { agent } if *agent == self.kind => {}
            _ => return None,
        }

        let next = match self.state {
            AgentState::Idle | AgentState::Advancing { .. } => {
                if !self.roll(rng) {
                    return None;
                }
                let step = match self.state {
                    AgentState::Advancing { step } => step + 1,
                    _ => 1,
                };
                if step < self.profile.path_len {
                    AgentState::Advancing { step }
                } else if defended {
                    AgentState::AtDoor
                } else {
                    AgentState::Jumpscare
                }
            }
            AgentState::AtDoor if defended => AgentState::Repelled,
            AgentState::AtDoor => AgentState::Jumpscare,
            AgentState::Repelled => AgentState::Idle,
            AgentState::Jumpscare => return None,
        };

        self.set_state(next);
        if next == AgentState::Jumpscare {
            tracing::info!("{} reached the office", self.kind);
            sender.post(GameEvent::Kill { agent: self.kind });
        }
        Some(next)
    }

    fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let weight = u32::from(self.aggression) * (10 + u32::from(self.difficulty));
        rng.gen_range(0..ROLL_RANGE) < weight
    }

    fn set_state(&mut self, state: AgentState) {
        tracing::debug!("{} {:?} -> {:?}", self.kind, self.state, state);
        self.state = state;
        if !self.pose_frozen {
            self.pose = Pose::from(state);
        }
    }

    /// Holds the current pose while the lights are out.
    pub fn freeze_pose(&mut self) {
        self.pose_frozen = true;
    }

    /// Unfreezes the pose and recomputes it from the state.
    pub fn refresh_pose(&mut self) {
        self.pose_frozen = false;
        self.pose = Pose::from(self.state);
    }

    /// Identity.
    #[must_use]
    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Fixed traits.
    #[must_use]
    pub fn profile(&self) -> AgentProfile {
        self.profile
    }

    /// Door this agent attacks.
    #[must_use]
    pub fn door(&self) -> DoorSide {
        self.profile.door
    }

    /// Current aggression.
    #[must_use]
    pub fn aggression(&self) -> u8 {
        self.aggression
    }

    /// Night difficulty.
    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Behavior state.
    #[must_use]
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Pose shown to renderers.
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pose
    }
}
