//! # Game Loop
//!
//! Fixed-timestep driver of a [`Session`].
//!
//! ## Modes
//!
//! - **Simulated**: frames run back to back. Each frame covers exactly one
//!   timestep, so a 90 s hour takes 5400 frames no matter how fast they run.
//! - **Real time**: frames are paced to the wall clock.
//!
//! Either way the session sees the same frame lengths, so a seeded night
//! plays out identically in both modes.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use lonepeak_night::AgentState;
use lonepeak_shared::{DoorSide, GameEvent, Key, MenuTarget};

use crate::session::{Session, SessionStatus};

/// Frame time statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames measured.
    pub frames: u64,
    /// Wall time spent inside frames.
    pub busy_us: u64,
    /// Slowest frame.
    pub slowest_us: u64,
    /// Frames that took longer than one timestep.
    pub late_frames: u64,
}

impl FrameStats {
    /// Mean wall time of a frame.
    #[must_use]
    pub fn average_us(&self) -> u64 {
        self.busy_us.checked_div(self.frames).unwrap_or(0)
    }
}

/// Fixed-timestep frame clock.
///
/// Frame `n` is due `n` timesteps after the epoch, so a slow frame shortens
/// the wait before the next one instead of shifting every later deadline.
pub struct FramePacer {
    frame_rate: u32,
    frame_duration: Duration,
    /// Start of the current run.
    epoch: Instant,
    /// Frame count at the epoch.
    epoch_frame: u64,
    frames: u64,
    stats: FrameStats,
}

impl FramePacer {
    /// Creates a pacer for `frame_rate` frames per second.
    ///
    /// A zero rate is raised to 1.
    #[must_use]
    pub fn new(frame_rate: u32) -> Self {
        let frame_rate = frame_rate.max(1);
        Self {
            frame_rate,
            frame_duration: Duration::from_micros(1_000_000 / u64::from(frame_rate)),
            epoch: Instant::now(),
            epoch_frame: 0,
            frames: 0,
            stats: FrameStats::default(),
        }
    }

    /// Restarts the deadlines from now.
    pub fn rebase(&mut self) {
        self.epoch = Instant::now();
        self.epoch_frame = self.frames;
    }

    /// Sleeps until the next frame is due.
    pub fn pace(&self) {
        let due = u32::try_from(self.frames - self.epoch_frame).unwrap_or(u32::MAX);
        let deadline = self.epoch + self.frame_duration.saturating_mul(due);
        if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            std::thread::sleep(wait);
        }
    }

    /// Counts a frame that began at `started`.
    pub fn record(&mut self, started: Instant) {
        let spent = started.elapsed();
        let spent_us = u64::try_from(spent.as_micros()).unwrap_or(u64::MAX);

        self.frames += 1;
        self.stats.frames += 1;
        self.stats.busy_us = self.stats.busy_us.saturating_add(spent_us);
        self.stats.slowest_us = self.stats.slowest_us.max(spent_us);
        if spent > self.frame_duration {
            self.stats.late_frames += 1;
        }
    }

    /// Whole milliseconds covered by frame `n` (1-based).
    ///
    /// Frame lengths alternate so that `n` frames always sum to
    /// `n * 1000 / frame_rate` without drift.
    #[must_use]
    pub fn frame_ms(&self, n: u64) -> u64 {
        let rate = u64::from(self.frame_rate);
        n * 1_000 / rate - n.saturating_sub(1) * 1_000 / rate
    }

    /// Frames recorded so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Timing statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Length of one timestep.
    #[must_use]
    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(lonepeak_shared::FRAME_RATE)
    }
}

// =============================================================================
// Input
// =============================================================================

/// Supplies the platform events of each frame.
pub trait InputSource {
    /// Events for frame `frame` (0-based), given the session as it stands.
    fn poll(&mut self, frame: u64, session: &Session) -> Vec<GameEvent>;
}

/// No input at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _frame: u64, _session: &Session) -> Vec<GameEvent> {
        Vec::new()
    }
}

/// Events keyed by frame number.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    events: BTreeMap<u64, Vec<GameEvent>>,
}

impl ScriptedInput {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event at `frame`.
    #[must_use]
    pub fn at(mut self, frame: u64, event: GameEvent) -> Self {
        self.events.entry(frame).or_default().push(event);
        self
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, frame: u64, _session: &Session) -> Vec<GameEvent> {
        self.events.remove(&frame).unwrap_or_default()
    }
}

/// A player that keeps a door shut only while an agent stands at it or one
/// step away. It never touches the breaker.
#[derive(Clone, Copy, Debug, Default)]
pub struct Autopilot;

impl Autopilot {
    fn threatened(session: &Session, side: DoorSide) -> bool {
        session.roster().iter().any(|agent| {
            agent.door() == side
                && match agent.state() {
                    AgentState::AtDoor => true,
                    AgentState::Advancing { step } => step + 1 >= agent.profile().path_len,
                    _ => false,
                }
        })
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, _frame: u64, session: &Session) -> Vec<GameEvent> {
        if !session.is_active()
            || session.status() != SessionStatus::Playing
            || session.is_blacked_out()
        {
            return Vec::new();
        }

        [(DoorSide::Left, Key::LeftDoor), (DoorSide::Right, Key::RightDoor)]
            .into_iter()
            .filter(|&(side, _)| session.office().door_closed(side) != Self::threatened(session, side))
            .map(|(_, key)| GameEvent::KeyDown(key))
            .collect()
    }
}

// =============================================================================
// Loop
// =============================================================================

/// How a run ended.
#[derive(Clone, Copy, Debug)]
pub struct LoopOutcome {
    /// Frames executed.
    pub frames: u64,
    /// Session time covered.
    pub simulated_ms: u64,
    /// Where the session sent the host, if it ended.
    pub end_target: Option<MenuTarget>,
    /// Outcome state.
    pub status: SessionStatus,
    /// Frame timing.
    pub stats: FrameStats,
}

/// Drives a session until it ends or a frame budget runs out.
pub struct GameLoop {
    pacer: FramePacer,
    realtime: bool,
    max_frames: Option<u64>,
}

impl GameLoop {
    /// Simulated loop at `frame_rate`, without a frame budget.
    #[must_use]
    pub fn new(frame_rate: u32) -> Self {
        Self {
            pacer: FramePacer::new(frame_rate),
            realtime: false,
            max_frames: None,
        }
    }

    /// Paces frames to the wall clock.
    #[must_use]
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Stops after `max_frames` frames.
    #[must_use]
    pub fn max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Runs `session` to its end.
    pub fn run(&mut self, session: &mut Session, input: &mut dyn InputSource) -> LoopOutcome {
        let mut simulated_ms = 0;
        self.pacer.rebase();

        while session.end_target().is_none() {
            let frame = self.pacer.frames();
            if self.max_frames.is_some_and(|max| frame >= max) {
                tracing::info!("Frame budget exhausted at {}", session.clock().label());
                break;
            }
            if self.realtime {
                self.pacer.pace();
            }

            let started = Instant::now();
            let elapsed = self.pacer.frame_ms(frame + 1);

            let inputs = input.poll(frame, session);
            session.frame(elapsed, &inputs);
            simulated_ms += elapsed;

            self.pacer.record(started);
        }

        LoopOutcome {
            frames: self.pacer.frames(),
            simulated_ms,
            end_target: session.end_target(),
            status: session.status(),
            stats: *self.pacer.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacer_creation() {
        let pacer = FramePacer::new(60);
        assert_eq!(pacer.frames(), 0);
        assert_eq!(pacer.frame_duration(), Duration::from_micros(16_666));
        assert_eq!(FramePacer::new(0).frame_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_frame_lengths_do_not_drift() {
        let pacer = FramePacer::new(60);
        let total: u64 = (1..=60).map(|n| pacer.frame_ms(n)).sum();
        assert_eq!(total, 1_000);

        let total: u64 = (1..=5_400).map(|n| pacer.frame_ms(n)).sum();
        assert_eq!(total, 90_000);
        assert!((1..=60).all(|n| matches!(pacer.frame_ms(n), 16 | 17)));
    }

    #[test]
    fn test_slow_frame_counts_late() {
        let mut pacer = FramePacer::new(60);
        pacer.record(Instant::now());
        let slow = Instant::now().checked_sub(Duration::from_millis(20)).unwrap();
        pacer.record(slow);

        let stats = pacer.stats();
        assert_eq!(pacer.frames(), 2);
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.late_frames, 1);
        assert!(stats.slowest_us >= 20_000);
        assert!(stats.average_us() >= 10_000);
    }

    #[test]
    fn test_pace_waits_for_deadline() {
        let begin = Instant::now();
        let mut pacer = FramePacer::new(100);
        for _ in 0..3 {
            pacer.record(Instant::now());
        }
        pacer.pace();
        assert!(begin.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_average_of_nothing_is_zero() {
        assert_eq!(FrameStats::default().average_us(), 0);
    }
}
