//! # Audio Deck
//!
//! The session never decodes or mixes sound. It asks an [`AudioDeck`] to play
//! named [`Cue`]s and queries cue lengths for its timers.
//!
//! [`HeadlessDeck`] is the deck of the runner and the tests: it tracks what is
//! playing and logs instead of making noise.

use std::collections::HashMap;

use lonepeak_shared::Cue;

/// Something that can play the session's cues.
pub trait AudioDeck {
    /// True if the cue is loaded.
    fn has(&self, cue: Cue) -> bool;

    /// Starts a cue. Unknown cues are ignored.
    fn play(&mut self, cue: Cue);

    /// Stops one cue.
    fn stop(&mut self, cue: Cue);

    /// Stops everything.
    fn stop_all(&mut self);

    /// Fades a cue out over `ms`.
    fn fade_out(&mut self, cue: Cue, ms: u64);

    /// Length of a loaded cue.
    fn duration_ms(&self, cue: Cue) -> Option<u64>;

    /// True while the cue is playing.
    fn is_playing(&self, cue: Cue) -> bool;
}

/// Deck without an audio device.
#[derive(Clone, Debug, Default)]
pub struct HeadlessDeck {
    durations: HashMap<Cue, u64>,
    playing: Vec<Cue>,
    history: Vec<Cue>,
}

impl HeadlessDeck {
    /// Creates a deck with no cues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deck with the stock cue set: the required cues, the power-off sound
    /// and phone calls for the first five nights.
    #[must_use]
    pub fn standard() -> Self {
        let mut deck = Self::new()
            .with_cue(Cue::Victory, 10_000)
            .with_cue(Cue::JumpScare, 1_000)
            .with_cue(Cue::PowerOff, 2_500);
        for night in 1..=5 {
            deck = deck.with_cue(Cue::PhoneCall(night), 60_000);
        }
        deck
    }

    /// Adds a cue of the given length.
    #[must_use]
    pub fn with_cue(mut self, cue: Cue, duration_ms: u64) -> Self {
        self.durations.insert(cue, duration_ms);
        self
    }

    /// Every cue started so far, in order.
    #[must_use]
    pub fn history(&self) -> &[Cue] {
        &self.history
    }
}

impl AudioDeck for HeadlessDeck {
    fn has(&self, cue: Cue) -> bool {
        self.durations.contains_key(&cue)
    }

    fn play(&mut self, cue: Cue) {
        if !self.has(cue) {
            tracing::debug!("cue {:?} not loaded", cue);
            return;
        }
        tracing::debug!("play {:?}", cue);
        self.history.push(cue);
        if !self.playing.contains(&cue) {
            self.playing.push(cue);
        }
    }

    fn stop(&mut self, cue: Cue) {
        self.playing.retain(|c| *c != cue);
    }

    fn stop_all(&mut self) {
        self.playing.clear();
    }

    fn fade_out(&mut self, cue: Cue, ms: u64) {
        tracing::debug!("fade {:?} over {} ms", cue, ms);
        self.stop(cue);
    }

    fn duration_ms(&self, cue: Cue) -> Option<u64> {
        self.durations.get(&cue).copied()
    }

    fn is_playing(&self, cue: Cue) -> bool {
        self.playing.contains(&cue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_deck_has_required_cues() {
        let deck = HeadlessDeck::standard();
        assert!(deck.has(Cue::Victory));
        assert!(deck.has(Cue::JumpScare));
        assert!(deck.has(Cue::PhoneCall(5)));
        assert!(!deck.has(Cue::PhoneCall(6)));
    }

    #[test]
    fn test_unknown_cue_is_ignored() {
        let mut deck = HeadlessDeck::new();
        deck.play(Cue::Victory);
        assert!(!deck.is_playing(Cue::Victory));
        assert!(deck.history().is_empty());
    }

    #[test]
    fn test_stop_and_fade() {
        let mut deck = HeadlessDeck::standard();
        deck.play(Cue::PhoneCall(1));
        deck.play(Cue::PowerOff);
        deck.fade_out(Cue::PowerOff, 1_000);
        assert!(deck.is_playing(Cue::PhoneCall(1)));
        assert!(!deck.is_playing(Cue::PowerOff));

        deck.stop_all();
        assert!(!deck.is_playing(Cue::PhoneCall(1)));
        assert_eq!(deck.history(), &[Cue::PhoneCall(1), Cue::PowerOff]);
    }
}
