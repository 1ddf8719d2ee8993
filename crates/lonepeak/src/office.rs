//! # Office
//!
//! Two doors, each with a hall light. Closed doors and lit lights draw power;
//! a closed door is the only defense against an agent at that side.
//!
//! A blackout forces the doors open and the lights off and ignores input until
//! the office is reset. After a full power-out the doors are removed
//! altogether, so nothing can be defended until the breaker is pulled.

use lonepeak_shared::{DoorSide, GameEvent, Key};
use serde::Serialize;

/// One door and its hall light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Door {
    /// Door shut.
    pub closed: bool,
    /// Hall light on.
    pub lit: bool,
}

impl Door {
    fn usage(self) -> u8 {
        u8::from(self.closed) + u8::from(self.lit)
    }
}

/// The player's room.
#[derive(Clone, Debug)]
pub struct Office {
    /// Left and right door. `None` after a power-out.
    doors: Option<[Door; 2]>,
    blacked_out: bool,
    active: bool,
}

impl Default for Office {
    fn default() -> Self {
        Self::new()
    }
}

impl Office {
    /// Creates an inactive office with both doors open.
    #[must_use]
    pub fn new() -> Self {
        Self {
            doors: Some([Door::default(); 2]),
            blacked_out: false,
            active: false,
        }
    }

    /// Opens the office for a new night.
    pub fn start(&mut self) {
        self.doors = Some([Door::default(); 2]);
        self.blacked_out = false;
        self.active = true;
    }

    /// Stops reacting to input.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Reacts to door and light keys.
    pub fn tick(&mut self, event: &GameEvent) {
        if !self.active || self.blacked_out {
            return;
        }
        let GameEvent::KeyDown(key) = *event else {
            return;
        };
        let Some(doors) = self.doors.as_mut() else {
            return;
        };

        match key {
            Key::LeftDoor => toggle(&mut doors[0].closed),
            Key::RightDoor => toggle(&mut doors[1].closed),
            Key::LeftLight => toggle(&mut doors[0].lit),
            Key::RightLight => toggle(&mut doors[1].lit),
            _ => {}
        }
    }

    /// Forces everything open and dark, and ignores input.
    pub fn blackout(&mut self) {
        self.blacked_out = true;
        if let Some(doors) = self.doors.as_mut() {
            *doors = [Door::default(); 2];
        }
    }

    /// Reinstalls the doors and accepts input again.
    pub fn reset(&mut self) {
        self.doors = Some([Door::default(); 2]);
        self.blacked_out = false;
    }

    /// Drops the doors.
    pub fn remove_doors(&mut self) {
        self.doors = None;
    }

    /// Closed doors plus lit lights.
    #[must_use]
    pub fn power_usage(&self) -> u8 {
        self.doors
            .map_or(0, |doors| doors.iter().map(|d| d.usage()).sum())
    }

    /// True if the door on `side` exists and is shut.
    #[must_use]
    pub fn door_closed(&self, side: DoorSide) -> bool {
        self.door(side).is_some_and(|d| d.closed)
    }

    /// The door on `side`, if installed.
    #[must_use]
    pub fn door(&self, side: DoorSide) -> Option<Door> {
        self.doors.map(|doors| match side {
            DoorSide::Left => doors[0],
            DoorSide::Right => doors[1],
        })
    }

    /// True once the doors are gone.
    #[must_use]
    pub fn doors_removed(&self) -> bool {
        self.doors.is_none()
    }

    /// True while blacked out.
    #[must_use]
    pub fn is_blacked_out(&self) -> bool {
        self.blacked_out
    }
}

fn toggle(flag: &mut bool) {
    *flag = !*flag;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(office: &mut Office, key: Key) {
        office.tick(&GameEvent::KeyDown(key));
    }

    #[test]
    fn test_doors_and_lights_draw_power() {
        let mut office = Office::new();
        office.start();

        press(&mut office, Key::LeftDoor);
        press(&mut office, Key::RightLight);
        assert_eq!(office.power_usage(), 2);
        assert!(office.door_closed(DoorSide::Left));
        assert!(!office.door_closed(DoorSide::Right));

        press(&mut office, Key::LeftDoor);
        assert_eq!(office.power_usage(), 1);
    }

    #[test]
    fn test_inactive_office_ignores_keys() {
        let mut office = Office::new();
        press(&mut office, Key::LeftDoor);
        assert_eq!(office.power_usage(), 0);
    }

    #[test]
    fn test_blackout_opens_everything() {
        let mut office = Office::new();
        office.start();
        press(&mut office, Key::LeftDoor);
        press(&mut office, Key::RightDoor);

        office.blackout();
        assert_eq!(office.power_usage(), 0);

        // Input ignored until reset
        press(&mut office, Key::LeftDoor);
        assert!(!office.door_closed(DoorSide::Left));

        office.reset();
        press(&mut office, Key::LeftDoor);
        assert!(office.door_closed(DoorSide::Left));
    }

    #[test]
    fn test_removed_doors_never_defend() {
        let mut office = Office::new();
        office.start();
        office.blackout();
        office.remove_doors();

        assert!(office.doors_removed());
        assert!(!office.door_closed(DoorSide::Right));
        assert_eq!(office.power_usage(), 0);

        office.reset();
        assert!(!office.doors_removed());
    }
}
