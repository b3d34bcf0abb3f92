//! Tallgrass engine
//!
//! Tile map, random encounters and turn-based battles for a small creature
//! catching route. The engine is a pure reducer: every command takes the
//! current [`GameState`] and returns a new one plus the log lines it added.
//! Randomness is always passed in by the caller.

pub mod battle;
pub mod encounter;
pub mod error;
pub mod message_log;
pub mod rng;
pub mod rules;
pub mod session;
pub mod species;
pub mod world;

pub use crate::battle::{BattleResolver, BattleStep};
pub use crate::encounter::EncounterGenerator;
pub use crate::error::{BlockCause, CommandError, LayoutError, RulesError, SetupError};
pub use crate::message_log::MessageLog;
pub use crate::rng::{RandomSource, SeededRng};
pub use crate::rules::Rules;
pub use crate::session::{
    Command, CommandKind, GameState, Outcome, Phase, PhaseKind, Rejection, Transition,
};
pub use crate::species::{Combatant, DamageRange, ElementType, Move, Species, STARTER_KEYS};
pub use crate::world::{Direction, Position, Tile, TileType, WorldMap, REFERENCE_LAYOUT};

/// Builds the world from `layout` and returns the opening intro snapshot.
pub fn new_session(layout: &str) -> Result<GameState, SetupError> {
    GameState::new_session(layout)
}

pub fn choose_starter(state: &GameState, starter_key: &str) -> Transition {
    state.choose_starter(starter_key)
}

pub fn move_player<R: RandomSource + ?Sized>(
    state: &GameState,
    direction: Direction,
    rng: &mut R,
) -> Transition {
    state.move_player(direction, rng)
}

pub fn attack<R: RandomSource + ?Sized>(
    state: &GameState,
    move_name: &str,
    rng: &mut R,
) -> Transition {
    state.attack(move_name, rng)
}

pub fn restart(state: &GameState) -> Transition {
    state.restart()
}
