//! Error types for the stat engine.

use thiserror::Error;

/// Result type alias using [`StatError`].
pub type Result<T> = std::result::Result<T, StatError>;

/// Top-level error type for all stat-engine errors.
///
/// Recompute itself never fails: missing reference rows fall back to
/// neutral values and numeric invariant violations clamp locally. These
/// errors cover the surfaces around the pipeline - table loading,
/// character handles, and state serialization.
#[derive(Debug, Error)]
pub enum StatError {
    /// Character handle does not exist in the roster.
    #[error("Character not found: {0}")]
    CharacterNotFound(u64),

    /// Reference-data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// A reference table has the wrong shape (e.g. a per-class array
    /// missing a class row).
    #[error("Malformed reference table '{table}': {message}")]
    MalformedTable {
        /// Name of the offending table.
        table: String,
        /// What was wrong with it.
        message: String,
    },

    /// Invalid character state.
    #[error("Invalid character state: {0}")]
    InvalidState(String),
}
