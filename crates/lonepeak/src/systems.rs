//! # Defense Subsystems
//!
//! Powered equipment besides the office. Each active subsystem adds one to
//! the power usage. The set is closed; cameras are the only kind.

use lonepeak_shared::{GameEvent, Key};
use serde::Serialize;

/// Number of camera feeds.
pub const FEED_COUNT: u8 = 11;

/// The camera monitor.
#[derive(Clone, Debug, Default)]
pub struct CameraSystem {
    active: bool,
    feed: u8,
    blacked_out: bool,
    running: bool,
    viewport: (u32, u32),
}

impl CameraSystem {
    /// Creates a lowered monitor on feed 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn start(&mut self) {
        self.active = false;
        self.feed = 0;
        self.blacked_out = false;
        self.running = true;
    }

    fn stop(&mut self) {
        self.active = false;
        self.running = false;
    }

    fn tick(&mut self, event: &GameEvent) {
        if !self.running {
            return;
        }
        match *event {
            GameEvent::CameraFlippedUp if !self.blacked_out => self.active = true,
            GameEvent::CameraFlippedDown => self.active = false,
            GameEvent::KeyDown(Key::NextFeed) if self.active => {
                self.feed = (self.feed + 1) % FEED_COUNT;
            }
            GameEvent::KeyDown(Key::PrevFeed) if self.active => {
                self.feed = (self.feed + FEED_COUNT - 1) % FEED_COUNT;
            }
            _ => {}
        }
    }

    /// True while the monitor is up.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Selected feed.
    #[must_use]
    pub fn feed(&self) -> u8 {
        self.feed
    }

    /// Last known viewport size.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
}

/// Read-only view of a subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SubsystemView {
    /// Subsystem name.
    pub name: &'static str,
    /// Drawing power.
    pub active: bool,
    /// Selected feed, for cameras.
    pub feed: Option<u8>,
}

/// A powered subsystem of the office.
#[derive(Clone, Debug)]
pub enum Subsystem {
    /// The camera monitor.
    Cameras(CameraSystem),
}

impl Subsystem {
    /// Stock subsystem set of a session.
    #[must_use]
    pub fn standard_set() -> Vec<Self> {
        vec![Self::Cameras(CameraSystem::new())]
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cameras(_) => "Cameras",
        }
    }

    /// Resets and starts the subsystem.
    pub fn start(&mut self) {
        match self {
            Self::Cameras(cameras) => cameras.start(),
        }
    }

    /// Powers the subsystem down.
    pub fn stop(&mut self) {
        match self {
            Self::Cameras(cameras) => cameras.stop(),
        }
    }

    /// Routes one event.
    pub fn tick(&mut self, event: &GameEvent) {
        match self {
            Self::Cameras(cameras) => cameras.tick(event),
        }
    }

    /// Tracks the new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        match self {
            Self::Cameras(cameras) => cameras.viewport = (width, height),
        }
    }

    /// Forces the subsystem off until restored.
    pub fn blackout(&mut self) {
        match self {
            Self::Cameras(cameras) => {
                cameras.active = false;
                cameras.blacked_out = true;
            }
        }
    }

    /// Lifts a blackout.
    pub fn restore(&mut self) {
        match self {
            Self::Cameras(cameras) => cameras.blacked_out = false,
        }
    }

    /// True while drawing power.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Cameras(cameras) => cameras.is_active(),
        }
    }

    /// Read-only view.
    #[must_use]
    pub fn view(&self) -> SubsystemView {
        match self {
            Self::Cameras(cameras) => SubsystemView {
                name: self.name(),
                active: cameras.active,
                feed: Some(cameras.feed),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cameras() -> Subsystem {
        let mut system = Subsystem::Cameras(CameraSystem::new());
        system.start();
        system
    }

    #[test]
    fn test_flip_up_and_down() {
        let mut system = cameras();
        system.tick(&GameEvent::CameraFlippedUp);
        assert!(system.is_active());

        system.tick(&GameEvent::CameraFlippedDown);
        assert!(!system.is_active());
    }

    #[test]
    fn test_feed_selection_wraps() {
        let mut system = cameras();
        system.tick(&GameEvent::KeyDown(Key::NextFeed));
        assert_eq!(system.view().feed, Some(0), "feeds only change while up");

        system.tick(&GameEvent::CameraFlippedUp);
        system.tick(&GameEvent::KeyDown(Key::PrevFeed));
        assert_eq!(system.view().feed, Some(FEED_COUNT - 1));
        system.tick(&GameEvent::KeyDown(Key::NextFeed));
        assert_eq!(system.view().feed, Some(0));
    }

    #[test]
    fn test_blackout_forces_down() {
        let mut system = cameras();
        system.tick(&GameEvent::CameraFlippedUp);
        system.blackout();
        assert!(!system.is_active());

        system.tick(&GameEvent::CameraFlippedUp);
        assert!(!system.is_active());

        system.restore();
        system.tick(&GameEvent::CameraFlippedUp);
        assert!(system.is_active());
    }

    #[test]
    fn test_stopped_system_ignores_events() {
        let mut system = cameras();
        system.stop();
        system.tick(&GameEvent::CameraFlippedUp);
        assert!(!system.is_active());

        system.resize(1280, 720);
        let Subsystem::Cameras(inner) = &system;
        assert_eq!(inner.viewport(), (1280, 720));
    }
}
