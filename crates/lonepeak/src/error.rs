//! # Session Error Types
//!
//! Errors that stop a session from being built or started. Once a night is
//! running nothing fails: invalid transitions are guarded no-ops.

use lonepeak_night::NightError;
use lonepeak_shared::Cue;
use thiserror::Error;

/// Errors that can occur while building or starting a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Night data or save data failed.
    #[error(transparent)]
    Night(#[from] NightError),

    /// A cue the session cannot run without is not loaded.
    #[error("missing required asset: {0:?}")]
    MissingAsset(Cue),

    /// The game configuration file could not be read.
    #[error("failed to read game config {path}: {reason}")]
    ConfigIo {
        /// The file involved.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// Invalid game configuration values.
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
