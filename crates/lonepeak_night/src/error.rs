//! # Night Error Types
//!
//! All errors that can occur while loading or persisting night data.
//! Runtime rule violations (a second kill, a second blackout) are not
//! errors; the session guards them as no-ops.

use thiserror::Error;

/// Errors that can occur in the night rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NightError {
    /// A file could not be read or written.
    #[error("i/o error on {path}: {reason}")]
    Io {
        /// The file involved.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// A TOML document did not parse.
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// The file involved.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The night table has no entry for this night.
    #[error("night not found: {0}")]
    UnknownNight(u8),

    /// A night table names an animatronic outside the roster.
    #[error("unknown animatronic: {0}")]
    UnknownAgent(String),

    /// Invalid configuration values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Save data could not be encoded.
    #[error("failed to encode save data: {0}")]
    Save(String),
}

/// Result type for night operations.
pub type NightResult<T> = Result<T, NightError>;
