use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::session::{CommandKind, PhaseKind};
use crate::world::TileType;

/// Why a move was refused. Only used for diagnostics; both causes reject the
/// move the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum BlockCause {
    Edge,
    Obstacle(TileType),
}

/// Recoverable command failures. The session is left as it was apart from a
/// log line recording the rejection.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("({x}, {y}) is outside the map")]
    OutOfBounds { x: i32, y: i32 },
    #[error("movement to ({x}, {y}) blocked by {cause:?}")]
    Blocked { x: i32, y: i32, cause: BlockCause },
    #[error("unknown starter: {0}")]
    UnknownStarter(String),
    #[error("unknown move: {0}")]
    UnknownMove(String),
    #[error("{command:?} is not available during {phase:?}")]
    InvalidPhaseCommand {
        command: CommandKind,
        phase: PhaseKind,
    },
}

/// Startup faults in the static map layout.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,
    #[error("row {row} has {actual} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("border tile ({x}, {y}) is not rock")]
    OpenBorder { x: u16, y: u16 },
    #[error("layout is larger than {max}x{max}")]
    TooLarge { max: u16 },
    #[error("spawn ({x}, {y}) is outside the map")]
    SpawnOutOfBounds { x: u16, y: u16 },
    #[error("spawn ({x}, {y}) is not walkable")]
    SpawnNotWalkable { x: u16, y: u16 },
}

/// Invalid tuning values.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum RulesError {
    #[error("encounter rate {0} must be within 0..=1")]
    EncounterRate(f64),
    #[error("damage range {min}..={max} is inverted")]
    InvertedRange { min: u16, max: u16 },
    #[error("message log capacity must be at least 1")]
    ZeroLogCapacity,
}

/// Anything that prevents a session from being created.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum SetupError {
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("invalid rules: {0}")]
    Rules(#[from] RulesError),
}
