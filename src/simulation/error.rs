//! Error types for the simulation engine.

use thiserror::Error;

use super::creature::CreatureId;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, SimError>;

/// Everything that can go wrong outside the tick loop itself.
///
/// A tick never fails: rejected moves and out-of-grid vision samples are
/// ordinary outcomes, not errors.
#[derive(Error, Debug)]
pub enum SimError {
    /// No live creature carries the requested id.
    #[error("creature {0} not found")]
    NotFound(CreatureId),

    /// A scenario index past the last placed creature.
    #[error("scenario placed {placed} creatures, no creature #{index}")]
    NoSuchPlacement {
        /// Requested placement index.
        index: usize,
        /// Number of creatures placed.
        placed: usize,
    },

    /// Cell coordinates outside the grid.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// Attempt to clear a border wall.
    #[error("cell ({x}, {y}) is a border wall")]
    ProtectedBorder {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
    },

    /// A cell code that cannot be written directly.
    #[error("invalid cell: {0}")]
    InvalidCell(String),

    /// Malformed configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Reading or writing a config file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialisation failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Serialization(err.to_string())
    }
}
