//! # Night Tables
//!
//! Per-night balance data, loaded once when a session is built and read-only
//! afterwards.
//!
//! ## File Format
//!
//! ```toml
//! [nights.1]
//! power_time = 600.0
//!
//! [nights.1.animatronics.Bonnie]
//! difficulty = 5
//! change = [[2, 10], [4, 3]]   # [hour, aggression delta]
//! ```
//!
//! Names resolve to [`AgentKind`] here. Anything the roster does not know is
//! a fatal configuration error, not a silently skipped entry.

use std::collections::BTreeMap;
use std::path::Path;

use lonepeak_shared::{AgentKind, FINAL_HOUR, FINAL_NIGHT, FIRST_NIGHT, MAX_AGGRESSION, MAX_DIFFICULTY};
use serde::{Deserialize, Serialize};

use crate::error::{NightError, NightResult};

/// File layout of `nights.toml`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct NightTableFile {
    #[serde(default)]
    nights: BTreeMap<String, RawNight>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawNight {
    power_time: f64,
    #[serde(default)]
    animatronics: BTreeMap<String, RawAgent>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawAgent {
    difficulty: u8,
    #[serde(default)]
    change: Vec<(u8, u8)>,
}

/// One `[hour, delta]` entry of a change-list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggressionChange {
    /// Hour at which the change applies (1-6).
    pub hour: u8,
    /// Aggression added. Unsigned: aggression never decreases.
    pub delta: u8,
}

/// Everything a night says about one animatronic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentSchedule {
    /// Which animatronic.
    pub kind: AgentKind,
    /// Difficulty for the whole night.
    pub difficulty: u8,
    /// Hour-keyed aggression changes, in file order.
    pub change: Vec<AggressionChange>,
}

impl AgentSchedule {
    /// Delta for `hour`. Only the first matching entry counts.
    #[must_use]
    pub fn change_for(&self, hour: u8) -> Option<u8> {
        self.change.iter().find(|c| c.hour == hour).map(|c| c.delta)
    }

    /// Aggression accumulated from the start of the night up to `hour`.
    #[must_use]
    pub fn aggression_at(&self, hour: u8) -> u8 {
        (1..=hour)
            .filter_map(|h| self.change_for(h))
            .fold(0u8, |acc, delta| acc.saturating_add(delta))
            .min(MAX_AGGRESSION)
    }
}

/// Immutable configuration of one night.
#[derive(Clone, Debug, PartialEq)]
pub struct NightConfig {
    /// Night index (1-7).
    pub night: u8,
    /// Seconds a full reservoir lasts at usage 1. Higher drains slower.
    pub power_time: f64,
    /// Configured agents in roster order.
    agents: Vec<AgentSchedule>,
}

impl NightConfig {
    /// Builds a night from already resolved agent schedules.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on a non-positive drain constant, a difficulty
    /// above the maximum, an hour outside 1-6 or a duplicated agent.
    pub fn new(night: u8, power_time: f64, mut agents: Vec<AgentSchedule>) -> NightResult<Self> {
        if !(power_time.is_finite() && power_time > 0.0) {
            return Err(NightError::InvalidConfig(format!(
                "night {night}: power_time must be positive, got {power_time}"
            )));
        }

        agents.sort_by_key(|a| a.kind);
        for pair in agents.windows(2) {
            if pair[0].kind == pair[1].kind {
                return Err(NightError::InvalidConfig(format!(
                    "night {night}: {} configured twice",
                    pair[0].kind
                )));
            }
        }

        for agent in &agents {
            if agent.difficulty > MAX_DIFFICULTY {
                return Err(NightError::InvalidConfig(format!(
                    "night {night}: {} difficulty {} exceeds {MAX_DIFFICULTY}",
                    agent.kind, agent.difficulty
                )));
            }
            if let Some(bad) = agent.change.iter().find(|c| c.hour == 0 || c.hour > FINAL_HOUR) {
                return Err(NightError::InvalidConfig(format!(
                    "night {night}: {} change at hour {} is outside 1-{FINAL_HOUR}",
                    agent.kind, bad.hour
                )));
            }
        }

        Ok(Self {
            night,
            power_time,
            agents,
        })
    }

    /// Configured agents in roster order.
    #[must_use]
    pub fn agents(&self) -> &[AgentSchedule] {
        &self.agents
    }

    /// Schedule of one agent, if it plays tonight.
    #[must_use]
    pub fn agent(&self, kind: AgentKind) -> Option<&AgentSchedule> {
        self.agents.iter().find(|a| a.kind == kind)
    }

    /// Aggression delta for `kind` at `hour` (first match only).
    #[must_use]
    pub fn change_for(&self, kind: AgentKind, hour: u8) -> Option<u8> {
        self.agent(kind).and_then(|a| a.change_for(hour))
    }
}

/// Every night of the game, keyed by index.
#[derive(Clone, Debug, Default)]
pub struct NightTable {
    nights: BTreeMap<u8, NightConfig>,
}

impl NightTable {
    /// Loads the table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `Parse` on malformed TOML,
    /// and the errors of [`NightTable::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> NightResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| NightError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let table = Self::parse(&content, &path.display().to_string())?;
        tracing::info!("Loaded {} nights from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parses a table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Parse` on malformed TOML, `UnknownAgent` for a name outside
    /// the roster, and `InvalidConfig` for bad keys or values.
    pub fn from_toml_str(content: &str) -> NightResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> NightResult<Self> {
        let file: NightTableFile = toml::from_str(content).map_err(|e| NightError::Parse {
            path: origin.to_owned(),
            reason: e.to_string(),
        })?;

        let mut nights = BTreeMap::new();
        for (key, raw) in file.nights {
            let night: u8 = key
                .parse()
                .ok()
                .filter(|n| (FIRST_NIGHT..=FINAL_NIGHT).contains(n))
                .ok_or_else(|| {
                    NightError::InvalidConfig(format!(
                        "night key {key:?} is not in {FIRST_NIGHT}-{FINAL_NIGHT}"
                    ))
                })?;

            let agents = raw
                .animatronics
                .into_iter()
                .map(|(name, agent)| {
                    let kind = AgentKind::from_name(&name).ok_or(NightError::UnknownAgent(name))?;
                    Ok(AgentSchedule {
                        kind,
                        difficulty: agent.difficulty,
                        change: agent
                            .change
                            .into_iter()
                            .map(|(hour, delta)| AggressionChange { hour, delta })
                            .collect(),
                    })
                })
                .collect::<NightResult<Vec<_>>>()?;

            nights.insert(night, NightConfig::new(night, raw.power_time, agents)?);
        }

        Ok(Self { nights })
    }

    /// Configuration of one night.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNight` if the table has no such night.
    pub fn night(&self, night: u8) -> NightResult<&NightConfig> {
        self.nights.get(&night).ok_or(NightError::UnknownNight(night))
    }

    /// Inserts or replaces a night.
    pub fn insert(&mut self, config: NightConfig) {
        self.nights.insert(config.night, config);
    }

    /// Number of configured nights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nights.len()
    }

    /// True if no night is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nights.is_empty()
    }
}
