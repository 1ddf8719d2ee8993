//! # Save Data
//!
//! The persisted "current night". A tiny TOML file:
//!
//! ```toml
//! night = 3
//! ```

use std::path::{Path, PathBuf};

use lonepeak_shared::FIRST_NIGHT;
use serde::{Deserialize, Serialize};

use crate::error::{NightError, NightResult};

/// Everything that survives between sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    /// Night to play next.
    #[serde(default = "first_night")]
    pub night: u8,
}

fn first_night() -> u8 {
    FIRST_NIGHT
}

impl Default for SaveData {
    fn default() -> Self {
        Self { night: FIRST_NIGHT }
    }
}

/// Loads and writes [`SaveData`].
///
/// An ephemeral manager keeps the data in memory only.
#[derive(Clone, Debug, Default)]
pub struct SaveManager {
    path: Option<PathBuf>,
    data: SaveData,
}

impl SaveManager {
    /// Manager backed by a file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            data: SaveData::default(),
        }
    }

    /// Manager that never touches the disk.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self::default()
    }

    /// Reloads the data from disk.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file exists but cannot be read and `Parse` if it
    /// is not valid save data.
    pub fn load_data(&mut self) -> NightResult<SaveData> {
        let Some(path) = &self.path else {
            return Ok(self.data);
        };

        self.data = match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| NightError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SaveData::default(),
            Err(e) => {
                return Err(NightError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        tracing::debug!("Loaded save: night {}", self.data.night);
        Ok(self.data)
    }

    /// Writes the data to disk, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `Save` if encoding fails and `Io` if the write fails.
    pub fn save_game(&self) -> NightResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = toml::to_string_pretty(&self.data).map_err(|e| NightError::Save(e.to_string()))?;
        let io_error = |e: std::io::Error| NightError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, content).map_err(io_error)?;

        tracing::info!("Saved night {} to {}", self.data.night, path.display());
        Ok(())
    }

    /// In-memory data.
    #[must_use]
    pub fn data(&self) -> SaveData {
        self.data
    }

    /// Mutable in-memory data. Call [`SaveManager::save_game`] to persist.
    pub fn data_mut(&mut self) -> &mut SaveData {
        &mut self.data
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("lonepeak_save_{}_{name}", std::process::id()))
            .join("save.toml")
    }

    #[test]
    fn test_missing_file_defaults() {
        let mut saves = SaveManager::new(scratch("missing"));
        assert_eq!(saves.load_data().unwrap(), SaveData { night: 1 });
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("round");
        let mut saves = SaveManager::new(&path);
        saves.data_mut().night = 4;
        saves.save_game().unwrap();

        let mut fresh = SaveManager::new(&path);
        assert_eq!(fresh.load_data().unwrap().night, 4);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let path = scratch("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "night = \"three\"").unwrap();

        let mut saves = SaveManager::new(&path);
        assert!(matches!(saves.load_data(), Err(NightError::Parse { .. })));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_ephemeral_never_writes() {
        let mut saves = SaveManager::ephemeral();
        saves.data_mut().night = 6;
        saves.save_game().unwrap();
        assert_eq!(saves.load_data().unwrap().night, 6);
        assert!(saves.path().is_none());
    }
}
