//! # Night Session
//!
//! The orchestrator of one night. It owns every timer, the clock, the power
//! reservoir, the roster and the office, and routes each event through them
//! in a fixed order.
//!
//! ## Lifecycle
//!
//! ```text
//!                 Kill                GameTimer
//!   ┌─────────┐ ───────> ┌────────┐ ───────────> end: Menu
//!   │ Playing │          │ Killed │
//!   └─────────┘ ───────> ├────────┤
//!                 Win    │  Win   │ ───────────> end: NextNight
//!                        └────────┘  GameTimer
//! ```
//!
//! Escape from either live state ends at `Menu` right away.
//!
//! ## Power Out
//!
//! Running dry clears the roster, removes the doors and arms one forced kill.
//! The breaker brings the lights back but no charge, and the forced kill
//! still lands.
//!
//! ## Frame
//!
//! 1. Timers tick and post what fired.
//! 2. Platform inputs are dispatched.
//! 3. The event queue is drained once and dispatched.
//! 4. A `Frame` event is dispatched; the clock advances on it.
//!
//! Anything posted during steps 3-4 waits for the next frame.
//!
//! ## Dispatch Order
//!
//! resize → power-out → win → agents → subsystems → camera flick → office →
//! session → clock → hour-change aggression.

use lonepeak_core::{EventBus, Repeat, TimerId, TimerRegistry};
use lonepeak_night::{
    AgentState, Animatronic, Clock, NightConfig, NightTable, Pose, PowerManager, ResetProgress,
    ResetPulse, SaveManager,
};
use lonepeak_shared::constants::{
    EVENT_CAPACITY, KILL_GAME_TIMER_MS, MUTE_FIRST_DELAY_MS, MUTE_REPEAT_MS,
    POWER_OUT_KILL_MAX_MS, POWER_OUT_KILL_MIN_MS, POWER_RESET_PERIOD_MS, VICTORY_LEAD_MS,
};
use lonepeak_shared::{
    AgentKind, Cue, DoorSide, GameEvent, Key, MenuTarget, FINAL_NIGHT, MAX_POWER_USAGE, RESET_TIME,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::audio::AudioDeck;
use crate::config::GameConfig;
use crate::error::{SessionError, SessionResult};
use crate::office::{Door, Office};
use crate::systems::{Subsystem, SubsystemView};

/// Outcome state of the night.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    /// The night is running.
    Playing,
    /// An agent got in.
    Killed,
    /// 6 AM reached.
    Win,
}

/// Visibility of the mute-call button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MuteButton {
    /// Not shown.
    Hidden,
    /// The phone call is ringing; the button appears on the next `MuteTime`.
    Pending,
    /// Shown and clickable.
    Visible,
}

/// Image of the camera flick button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Flick {
    /// Monitor is down; pressing raises it.
    Up,
    /// Monitor is up; pressing lowers it.
    Down,
}

/// Flags of a running session.
#[derive(Clone, Debug)]
struct SessionState {
    status: SessionStatus,
    active: bool,
    blacked_out: bool,
    power_out: bool,
    end_target: Option<MenuTarget>,
    jumpscare: Option<AgentKind>,
    mute: MuteButton,
    flick: Flick,
    viewport: (u32, u32),
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Playing,
            active: false,
            blacked_out: false,
            power_out: false,
            end_target: None,
            jumpscare: None,
            mute: MuteButton::Hidden,
            flick: Flick::Up,
            viewport: (0, 0),
        }
    }
}

/// Read-only view of one agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AgentView {
    /// Identity.
    pub kind: AgentKind,
    /// Behavior state.
    pub state: AgentState,
    /// Pose to draw.
    pub pose: Pose,
    /// Current aggression.
    pub aggression: u8,
}

/// Read-only view of a session for rendering layers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Night being played.
    pub night: u8,
    /// Current hour (0 = 12 AM).
    pub hour: u8,
    /// Wall-clock label.
    pub clock_label: String,
    /// Outcome state.
    pub status: SessionStatus,
    /// Session still owns the screen.
    pub active: bool,
    /// Reservoir level in percent.
    pub power_percent: u8,
    /// Battery bars (0-5).
    pub power_bars: u8,
    /// Usage applied by the next drain pulse.
    pub power_usage: u8,
    /// Lights out.
    pub blacked_out: bool,
    /// Reservoir ran dry.
    pub power_out: bool,
    /// Breaker progress.
    pub reset: ResetProgress,
    /// Roster.
    pub agents: Vec<AgentView>,
    /// Left door, if installed.
    pub left_door: Option<Door>,
    /// Right door, if installed.
    pub right_door: Option<Door>,
    /// Subsystems.
    pub subsystems: Vec<SubsystemView>,
    /// Mute-call button.
    pub mute: MuteButton,
    /// Camera flick image.
    pub flick: Flick,
    /// Agent whose jump-scare plays.
    pub jumpscare: Option<AgentKind>,
    /// Where the host should go next.
    pub end_target: Option<MenuTarget>,
}

/// One night at the office.
pub struct Session {
    timers: TimerRegistry,
    bus: EventBus,
    clock: Clock,
    power: PowerManager,
    roster: Vec<Animatronic>,
    office: Office,
    subsystems: Vec<Subsystem>,
    rng: ChaCha8Rng,
    saves: SaveManager,
    nights: NightTable,
    night: NightConfig,
    audio: Box<dyn AudioDeck>,
    state: SessionState,
}

impl Session {
    /// Builds a session for the saved night.
    ///
    /// # Errors
    ///
    /// Returns `MissingAsset` if the victory or jump-scare cue is not loaded,
    /// and night errors if the save cannot be read or names a night the table
    /// does not have.
    pub fn new(
        config: &GameConfig,
        nights: NightTable,
        mut saves: SaveManager,
        audio: Box<dyn AudioDeck>,
    ) -> SessionResult<Self> {
        for cue in [Cue::Victory, Cue::JumpScare] {
            if !audio.has(cue) {
                return Err(SessionError::MissingAsset(cue));
            }
        }

        let saved = saves.load_data()?;
        let night = nights.night(saved.night)?.clone();
        let seed = config.resolved_seed();
        tracing::info!("Session for night {} (seed {})", night.night, seed);

        Ok(Self {
            timers: TimerRegistry::new(),
            bus: EventBus::new(EVENT_CAPACITY),
            clock: Clock::new(config.hour_duration_ms),
            power: PowerManager::new(),
            roster: Vec::new(),
            office: Office::new(),
            subsystems: Subsystem::standard_set(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            saves,
            nights,
            night,
            audio,
            state: SessionState::default(),
        })
    }

    /// Starts the saved night from 12 AM.
    ///
    /// # Errors
    ///
    /// Returns night errors if the save cannot be read or names an unknown
    /// night.
    pub fn start(&mut self) -> SessionResult<()> {
        let saved = self.saves.load_data()?;
        self.night = self.nights.night(saved.night)?.clone();

        self.timers.cancel_all();
        self.bus.clear();
        self.state = SessionState {
            active: true,
            viewport: self.state.viewport,
            ..SessionState::default()
        };

        self.office.start();
        self.clock.start(self.night.night);
        for system in &mut self.subsystems {
            system.start();
        }
        self.power.start(self.night.power_time, &mut self.timers);
        self.roster = build_roster(&self.night, 0);
        for agent in &mut self.roster {
            agent.start(&mut self.timers);
        }

        let call = Cue::PhoneCall(self.night.night);
        if self.audio.has(call) {
            self.audio.play(call);
            self.state.mute = MuteButton::Pending;
            self.timers.schedule(
                TimerId::MuteTime,
                MUTE_FIRST_DELAY_MS,
                Repeat::Forever,
                GameEvent::MuteTime,
            );
        } else {
            tracing::debug!("No phone call for night {}", self.night.night);
        }

        tracing::info!(
            "Night {} started: {} agents, power_time {}",
            self.night.night,
            self.roster.len(),
            self.night.power_time
        );
        Ok(())
    }

    /// Runs one frame.
    pub fn frame(&mut self, elapsed_ms: u64, inputs: &[GameEvent]) {
        self.timers.tick(elapsed_ms, &self.bus.sender());

        for event in inputs {
            self.global_tick(event);
        }
        for event in self.bus.drain() {
            self.global_tick(&event);
        }
        self.global_tick(&GameEvent::Frame { elapsed_ms });
    }

    /// Routes one event through every unit in dispatch order.
    pub fn global_tick(&mut self, event: &GameEvent) {
        if let GameEvent::Resize { width, height } = *event {
            self.resize(width, height);
        }
        if *event == GameEvent::PowerOut {
            self.power_out();
        }
        if *event == GameEvent::Win {
            self.win();
        }

        let sender = self.bus.sender();
        for agent in &mut self.roster {
            let defended = self.office.door_closed(agent.door());
            agent.tick(event, defended, &mut self.rng, &sender);
        }

        for system in &mut self.subsystems {
            system.tick(event);
        }

        if !self.state.blacked_out && *event == GameEvent::KeyDown(Key::Camera) {
            sender.post(match self.state.flick {
                Flick::Up => GameEvent::CameraFlippedUp,
                Flick::Down => GameEvent::CameraFlippedDown,
            });
        }

        self.office.tick(event);
        self.tick(event);

        if let GameEvent::Frame { elapsed_ms } = *event {
            if let Some(hour) = self.clock.tick(elapsed_ms, &sender) {
                self.apply_hour_change(hour);
            }
        }
    }

    fn tick(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::MuteTime => self.on_mute_time(),
            GameEvent::KeyDown(Key::Escape) => self.escape(),
            GameEvent::KeyDown(Key::MuteCall) => self.mute_call(),
            GameEvent::KeyDown(Key::Breaker) => self.reset_power(),
            GameEvent::GameTimer => self.on_game_timer(),
            GameEvent::UpdatePower => {
                let usage = self.get_power_usage();
                self.power.update_power(usage, &self.bus.sender());
            }
            GameEvent::Kill { agent } => self.kill(agent),
            GameEvent::PowerReset => self.on_power_reset(),
            GameEvent::CameraFlippedUp if self.subsystems.iter().any(Subsystem::is_active) => {
                self.state.flick = Flick::Down;
            }
            GameEvent::CameraFlippedDown => self.state.flick = Flick::Up,
            _ => {}
        }
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    fn resize(&mut self, width: u32, height: u32) {
        self.state.viewport = (width, height);
        for system in &mut self.subsystems {
            system.resize(width, height);
        }
    }

    fn apply_hour_change(&mut self, hour: u8) {
        for agent in &mut self.roster {
            if let Some(delta) = self.night.change_for(agent.kind(), hour) {
                agent.update_aggression(delta);
            }
        }
    }

    fn on_mute_time(&mut self) {
        if self.state.mute == MuteButton::Pending {
            self.state.mute = MuteButton::Visible;
            self.timers.schedule(
                TimerId::MuteTime,
                MUTE_REPEAT_MS,
                Repeat::Forever,
                GameEvent::MuteTime,
            );
        } else {
            self.state.mute = MuteButton::Hidden;
            self.timers.cancel(TimerId::MuteTime);
        }
    }

    /// Silences the phone call. Only works while the button is shown.
    pub fn mute_call(&mut self) {
        if self.state.mute != MuteButton::Visible {
            return;
        }
        self.audio.stop(Cue::PhoneCall(self.night.night));
        self.state.mute = MuteButton::Hidden;
        self.timers.cancel(TimerId::MuteTime);
    }

    fn escape(&mut self) {
        if !self.state.active {
            return;
        }
        tracing::info!("Night {} abandoned", self.night.night);
        self.stop();
        self.state.active = false;
        self.state.end_target = Some(MenuTarget::Menu);
    }

    fn on_game_timer(&mut self) {
        match self.state.status {
            SessionStatus::Killed => {
                self.state.active = false;
                self.state.end_target = Some(MenuTarget::Menu);
            }
            SessionStatus::Win => {
                self.audio.fade_out(Cue::Victory, 1_000);
                self.state.active = false;
                self.stop();
                self.state.end_target = Some(MenuTarget::NextNight);
            }
            SessionStatus::Playing => {
                tracing::debug!("GameTimer while playing ignored");
            }
        }
    }

    fn on_power_reset(&mut self) {
        if !self.state.blacked_out {
            self.reset_power();
            return;
        }
        if self.power.pulse_reset() == ResetPulse::Complete {
            self.un_black_out();
        }
    }

    /// Total power draw of the next pulse, capped at 5.
    #[must_use]
    pub fn get_power_usage(&self) -> u8 {
        let base = u8::from(!self.state.blacked_out);
        let systems = self.subsystems.iter().filter(|s| s.is_active()).count();
        let systems = u8::try_from(systems).unwrap_or(u8::MAX);
        base.saturating_add(self.office.power_usage())
            .saturating_add(systems)
            .min(MAX_POWER_USAGE)
    }

    /// Ends the night with a jump-scare. No-op unless playing.
    pub fn kill(&mut self, agent: AgentKind) {
        if self.state.status != SessionStatus::Playing {
            tracing::debug!("Kill by {} ignored: {:?}", agent, self.state.status);
            return;
        }
        tracing::info!("Night {}: killed by {}", self.night.night, agent);

        self.state.jumpscare = Some(agent);
        self.audio.stop_all();
        self.stop();
        self.state.status = SessionStatus::Killed;
        self.audio.play(Cue::JumpScare);
        self.timers.schedule(
            TimerId::GameTimer,
            KILL_GAME_TIMER_MS,
            Repeat::ONCE,
            GameEvent::GameTimer,
        );
    }

    /// Ends the night survived. No-op unless playing.
    pub fn win(&mut self) {
        if self.state.status != SessionStatus::Playing {
            tracing::debug!("Win ignored: {:?}", self.state.status);
            return;
        }
        tracing::info!("Night {} survived", self.night.night);

        self.audio.stop_all();
        self.saves.data_mut().night = self.night.night.saturating_add(1);
        self.stop();
        self.state.status = SessionStatus::Win;
        self.audio.play(Cue::Victory);

        let delay = self
            .audio
            .duration_ms(Cue::Victory)
            .unwrap_or(0)
            .saturating_sub(VICTORY_LEAD_MS)
            .max(1);
        self.timers
            .schedule(TimerId::GameTimer, delay, Repeat::ONCE, GameEvent::GameTimer);
    }

    /// Halts every unit and saves progress.
    ///
    /// Finishing the last night in any way writes back the night before it.
    pub fn stop(&mut self) {
        self.timers.cancel_all();
        self.audio.stop_all();
        self.office.stop();
        self.power.stop(&mut self.timers);
        self.clock.stop();
        for system in &mut self.subsystems {
            system.stop();
        }
        for agent in &mut self.roster {
            agent.stop(&mut self.timers);
        }

        if self.night.night == FINAL_NIGHT {
            self.saves.data_mut().night = FINAL_NIGHT - 1;
        }
        if let Err(e) = self.saves.save_game() {
            tracing::warn!("Failed to save progress: {}", e);
        }
    }

    // =========================================================================
    // Blackout
    // =========================================================================

    fn black_out(&mut self) {
        self.audio.play(Cue::PowerOff);
        self.state.blacked_out = true;
        self.state.flick = Flick::Up;
        self.office.blackout();
        for system in &mut self.subsystems {
            system.blackout();
        }
        for agent in &mut self.roster {
            agent.freeze_pose();
        }
        tracing::info!("Lights out at {}", self.clock.label());
    }

    fn power_out(&mut self) {
        if self.state.status != SessionStatus::Playing || self.state.power_out {
            tracing::debug!("PowerOut ignored");
            return;
        }
        self.state.power_out = true;
        self.black_out();

        for agent in &mut self.roster {
            agent.stop(&mut self.timers);
        }
        self.roster.clear();
        self.office.remove_doors();

        let delay = self
            .rng
            .gen_range(POWER_OUT_KILL_MIN_MS..=POWER_OUT_KILL_MAX_MS);
        self.timers.schedule(
            TimerId::PowerOutKill,
            delay,
            Repeat::ONCE,
            GameEvent::Kill {
                agent: AgentKind::FORCED_KILL,
            },
        );
        tracing::info!("Power out: {} comes in {} ms", AgentKind::FORCED_KILL, delay);
    }

    /// Pulls the breaker. Idempotent while a reset is running.
    pub fn reset_power(&mut self) {
        if self.state.status != SessionStatus::Playing {
            return;
        }
        if self.timers.is_active(TimerId::PowerReset) {
            tracing::debug!("Breaker already resetting");
            return;
        }

        self.black_out();
        self.power.begin_reset();
        self.timers.schedule(
            TimerId::PowerReset,
            POWER_RESET_PERIOD_MS,
            Repeat::Times(RESET_TIME + 1),
            GameEvent::PowerReset,
        );
    }

    fn un_black_out(&mut self) {
        self.power.finish_reset();
        self.office.reset();
        for system in &mut self.subsystems {
            system.restore();
        }
        self.state.blacked_out = false;

        // After a power-out the roster stays empty and PowerOutKill stays armed
        for agent in &mut self.roster {
            agent.refresh_pose();
        }
        tracing::info!("Lights back at {}", self.clock.label());
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Read-only view of everything a renderer draws.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            night: self.night.night,
            hour: self.clock.hour(),
            clock_label: self.clock.label(),
            status: self.state.status,
            active: self.state.active,
            power_percent: self.power.percent(),
            power_bars: self.power.bars(),
            power_usage: self.get_power_usage(),
            blacked_out: self.state.blacked_out,
            power_out: self.state.power_out,
            reset: self.power.reset_progress(),
            agents: self
                .roster
                .iter()
                .map(|a| AgentView {
                    kind: a.kind(),
                    state: a.state(),
                    pose: a.pose(),
                    aggression: a.aggression(),
                })
                .collect(),
            left_door: self.office.door(DoorSide::Left),
            right_door: self.office.door(DoorSide::Right),
            subsystems: self.subsystems.iter().map(Subsystem::view).collect(),
            mute: self.state.mute,
            flick: self.state.flick,
            jumpscare: self.state.jumpscare,
            end_target: self.state.end_target,
        }
    }

    /// Where the host should go once the session is over.
    #[must_use]
    pub fn end_target(&self) -> Option<MenuTarget> {
        self.state.end_target
    }

    /// True while the session owns the screen.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Outcome state.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    /// True while the lights are out.
    #[must_use]
    pub fn is_blacked_out(&self) -> bool {
        self.state.blacked_out
    }

    /// Night being played.
    #[must_use]
    pub fn night(&self) -> u8 {
        self.night.night
    }

    /// The clock.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The power reservoir.
    #[must_use]
    pub fn power(&self) -> &PowerManager {
        &self.power
    }

    /// Mutable reservoir, for debugging and tests.
    pub fn power_mut(&mut self) -> &mut PowerManager {
        &mut self.power
    }

    /// The roster, in dispatch order.
    #[must_use]
    pub fn roster(&self) -> &[Animatronic] {
        &self.roster
    }

    /// The office.
    #[must_use]
    pub fn office(&self) -> &Office {
        &self.office
    }

    /// The timers.
    #[must_use]
    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// The save manager.
    #[must_use]
    pub fn saves(&self) -> &SaveManager {
        &self.saves
    }

    /// The audio deck.
    #[must_use]
    pub fn audio(&self) -> &dyn AudioDeck {
        self.audio.as_ref()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("night", &self.night.night)
            .field("hour", &self.clock.hour())
            .field("status", &self.state.status)
            .field("power", &self.power.level())
            .field("agents", &self.roster.len())
            .finish_non_exhaustive()
    }
}

/// Roster of `night` with the aggression accumulated up to `hour`.
fn build_roster(night: &NightConfig, hour: u8) -> Vec<Animatronic> {
    night
        .agents()
        .iter()
        .map(|schedule| {
            let mut agent = Animatronic::new(schedule.kind);
            agent.set_difficulty(schedule.difficulty);
            agent.update_aggression(schedule.aggression_at(hour));
            agent
        })
        .collect()
}
