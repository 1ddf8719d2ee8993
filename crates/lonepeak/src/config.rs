//! # Game Configuration
//!
//! Runner-level settings loaded from `data/game.toml`. Every field has a
//! default, so an empty or missing file is a valid configuration.
//!
//! ```toml
//! frame_rate = 60
//! hour_duration_ms = 90000
//! nights_path = "data/nights.toml"
//! save_path = "saves/save.toml"
//! seed = 1987
//! log_filter = "info"
//! ```

use std::path::{Path, PathBuf};

use lonepeak_shared::constants::DEFAULT_HOUR_DURATION_MS;
use lonepeak_shared::FRAME_RATE;
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Settings of the session runner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Frames per second of the loop.
    pub frame_rate: u32,
    /// Real time of one in-game hour.
    pub hour_duration_ms: u64,
    /// Night table.
    pub nights_path: PathBuf,
    /// Save file.
    pub save_path: PathBuf,
    /// RNG seed. Derived from the system time when absent.
    pub seed: Option<u64>,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_rate: FRAME_RATE,
            hour_duration_ms: DEFAULT_HOUR_DURATION_MS,
            nights_path: PathBuf::from("data/nights.toml"),
            save_path: PathBuf::from("saves/save.toml"),
            seed: None,
            log_filter: "info".to_owned(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML or invalid values.
    pub fn from_toml_str(content: &str) -> SessionResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SessionError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigIo` if the file cannot be read, otherwise the errors of
    /// [`GameConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> SessionResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SessionError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads a configuration file, falling back to defaults if it is missing.
    ///
    /// # Errors
    ///
    /// Same as [`GameConfig::load`], except for a missing file.
    pub fn load_or_default(path: impl AsRef<Path>) -> SessionResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No game config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero frame rate or hour length.
    pub fn validate(&self) -> SessionResult<()> {
        if self.frame_rate == 0 {
            return Err(SessionError::InvalidConfig("frame_rate must be > 0".into()));
        }
        if self.hour_duration_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "hour_duration_ms must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// The configured seed, or one derived from the system time.
    #[must_use]
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}
