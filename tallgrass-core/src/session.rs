use std::sync::Arc;

use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::battle::{BattleResolver, BattleStep};
use crate::encounter::EncounterGenerator;
use crate::error::{BlockCause, CommandError, LayoutError, SetupError};
use crate::message_log::MessageLog;
use crate::rng::RandomSource;
use crate::rules::Rules;
use crate::species::{starter, Combatant, Move};
use crate::world::{Direction, Position, TileType, WorldMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PhaseKind {
    Intro,
    Exploring,
    Battling,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CommandKind {
    ChooseStarter,
    Move,
    Attack,
    Restart,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Command {
    ChooseStarter(String),
    Move(Direction),
    Attack(String),
    Restart,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::ChooseStarter(_) => CommandKind::ChooseStarter,
            Command::Move(_) => CommandKind::Move,
            Command::Attack(_) => CommandKind::Attack,
            Command::Restart => CommandKind::Restart,
        }
    }
}

/// Top-level session phase. Each variant carries only what it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Exploring {
        position: Position,
        starter: Combatant,
    },
    Battling {
        position: Position,
        starter: Combatant,
        wild: Combatant,
    },
    GameOver,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Intro => PhaseKind::Intro,
            Phase::Exploring { .. } => PhaseKind::Exploring,
            Phase::Battling { .. } => PhaseKind::Battling,
            Phase::GameOver => PhaseKind::GameOver,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored,
    Rejected(CommandError),
}

/// Result of running one command: the replacement snapshot, the log lines
/// it added, and whether the command took effect.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: GameState,
    pub log_delta: Vec<String>,
    pub outcome: Outcome,
}

impl Transition {
    pub fn error(&self) -> Option<&CommandError> {
        match &self.outcome {
            Outcome::Rejected(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<GameState, Rejection> {
        match self.outcome {
            Outcome::Rejected(error) => Err(Rejection {
                error,
                state: self.state,
            }),
            _ => Ok(self.state),
        }
    }
}

/// A refused command together with the snapshot that logged the refusal.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("{error}")]
pub struct Rejection {
    pub error: CommandError,
    pub state: GameState,
}

#[derive(Debug, PartialEq)]
struct Fixtures {
    world: WorldMap,
    rules: Rules,
    encounters: EncounterGenerator,
    resolver: BattleResolver,
}

/// Immutable session snapshot. Commands never mutate it; they return a new
/// value sharing the same world map.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    fixtures: Arc<Fixtures>,
    phase: Phase,
    log: MessageLog,
}

impl GameState {
    pub fn new_session(layout: &str) -> Result<Self, SetupError> {
        Self::with_rules(layout, Rules::default())
    }

    pub fn with_rules(layout: &str, rules: Rules) -> Result<Self, SetupError> {
        rules.validate()?;
        let world = WorldMap::from_layout(layout)?;
        let spawn = rules.spawn;
        let (sx, sy) = (i32::from(spawn.x), i32::from(spawn.y));
        if !world.contains(sx, sy) {
            return Err(LayoutError::SpawnOutOfBounds {
                x: spawn.x,
                y: spawn.y,
            }
            .into());
        }
        if !world.is_walkable(sx, sy) {
            return Err(LayoutError::SpawnNotWalkable {
                x: spawn.x,
                y: spawn.y,
            }
            .into());
        }

        let fixtures = Fixtures {
            encounters: EncounterGenerator::with_default_pool(rules.encounter_rate),
            resolver: BattleResolver::new(rules.counter_damage),
            world,
            rules,
        };
        let log = MessageLog::new(fixtures.rules.log_capacity);
        debug!(
            "session created on {}x{} map",
            fixtures.world.width(),
            fixtures.world.height()
        );
        Ok(Self {
            fixtures: Arc::new(fixtures),
            phase: Phase::Intro,
            log,
        })
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn world(&self) -> &WorldMap {
        &self.fixtures.world
    }

    pub fn rules(&self) -> &Rules {
        &self.fixtures.rules
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Player position; outside exploration this is the spawn point.
    pub fn position(&self) -> Position {
        match &self.phase {
            Phase::Exploring { position, .. } | Phase::Battling { position, .. } => *position,
            Phase::Intro | Phase::GameOver => self.fixtures.rules.spawn,
        }
    }

    pub fn starter(&self) -> Option<&Combatant> {
        match &self.phase {
            Phase::Exploring { starter, .. } | Phase::Battling { starter, .. } => Some(starter),
            Phase::Intro | Phase::GameOver => None,
        }
    }

    pub fn wild(&self) -> Option<&Combatant> {
        match &self.phase {
            Phase::Battling { wild, .. } => Some(wild),
            _ => None,
        }
    }

    /// The active starter's moves, in the order they should be offered.
    pub fn available_moves(&self) -> &[Move] {
        self.starter()
            .map(|starter| starter.species.moves.as_slice())
            .unwrap_or(&[])
    }

    pub fn apply<R: RandomSource + ?Sized>(&self, command: Command, rng: &mut R) -> Transition {
        match command {
            Command::ChooseStarter(key) => self.choose_starter(&key),
            Command::Move(direction) => self.move_player(direction, rng),
            Command::Attack(name) => self.attack(&name, rng),
            Command::Restart => self.restart(),
        }
    }

    pub fn choose_starter(&self, key: &str) -> Transition {
        match self.phase {
            Phase::Intro => {}
            Phase::GameOver => {
                return self.invalid_phase(CommandKind::ChooseStarter, "Restart to pick a new partner.")
            }
            _ => return self.invalid_phase(CommandKind::ChooseStarter, "You already have a partner."),
        }
        let Some(species) = starter(key) else {
            return self.reject(
                CommandError::UnknownStarter(key.to_string()),
                format!("There is no starter called '{key}'."),
            );
        };

        info!("starter chosen: {}", species.name);
        let line = format!(
            "You chose {}! Walk into the tall grass to find wild creatures.",
            species.name
        );
        let phase = Phase::Exploring {
            position: self.fixtures.rules.spawn,
            starter: Combatant::fresh(species),
        };
        self.commit(phase, true, vec![line], Outcome::Applied)
    }

    pub fn move_player<R: RandomSource + ?Sized>(
        &self,
        direction: Direction,
        rng: &mut R,
    ) -> Transition {
        let (position, starter) = match &self.phase {
            Phase::Exploring { position, starter } => (*position, starter),
            Phase::Battling { .. } | Phase::GameOver => return self.ignore(),
            Phase::Intro => {
                return self.invalid_phase(CommandKind::Move, "Choose a starter before exploring.")
            }
        };

        let (next, tile) = match self.fixtures.world.step(position, direction) {
            Ok(step) => step,
            Err(error) => {
                let line = match &error {
                    CommandError::Blocked {
                        cause: BlockCause::Obstacle(TileType::Water),
                        ..
                    } => "Blocked: deep water.",
                    CommandError::Blocked {
                        cause: BlockCause::Obstacle(_),
                        ..
                    } => "Blocked: a rock wall.",
                    _ => "Blocked: the edge of the map.",
                };
                return self.reject(error, line.to_string());
            }
        };
        debug!("moved {direction:?} to ({}, {})", next.x, next.y);

        if let Some(wild) = self.fixtures.encounters.roll_encounter(tile, rng) {
            info!("wild {} appeared at ({}, {})", wild.name(), next.x, next.y);
            let line = format!("A wild {} appeared!", wild.name());
            let phase = Phase::Battling {
                position: next,
                starter: starter.clone(),
                wild,
            };
            return self.commit(phase, false, vec![line], Outcome::Applied);
        }

        let line = if tile.kind == TileType::Grass {
            format!("The grass rustles at ({}, {}).", next.x, next.y)
        } else {
            format!("You walk to ({}, {}).", next.x, next.y)
        };
        let phase = Phase::Exploring {
            position: next,
            starter: starter.clone(),
        };
        self.commit(phase, false, vec![line], Outcome::Applied)
    }

    pub fn attack<R: RandomSource + ?Sized>(&self, move_name: &str, rng: &mut R) -> Transition {
        let Phase::Battling {
            position,
            starter,
            wild,
        } = &self.phase
        else {
            return self.invalid_phase(CommandKind::Attack, "There is nothing to attack.");
        };
        let Some(mv) = starter.species.find_move(move_name) else {
            return self.reject(
                CommandError::UnknownMove(move_name.to_string()),
                format!("{} doesn't know {move_name}.", starter.name()),
            );
        };

        let step = self.fixtures.resolver.resolve(starter, mv, wild, rng);
        let hit = format!(
            "{} used {} for {} damage.",
            starter.name(),
            mv.name,
            step.damage_dealt
        );

        let BattleStep {
            defender_defeated,
            attacker_defeated,
            counter_damage,
            attacker,
            defender,
            ..
        } = step;

        if defender_defeated {
            info!("wild {} defeated", defender.name());
            let lines = vec![hit, format!("The wild {} fainted. You win!", defender.name())];
            let phase = Phase::Exploring {
                position: *position,
                starter: attacker,
            };
            return self.commit(phase, false, lines, Outcome::Applied);
        }

        let exchange = format!(
            "{hit} The wild {} hit back for {counter_damage}.",
            defender.name()
        );
        if attacker_defeated {
            info!("{} fainted, game over", attacker.name());
            let lines = vec![
                exchange,
                format!("{} fainted... Game over.", attacker.name()),
            ];
            return self.commit(Phase::GameOver, false, lines, Outcome::Applied);
        }

        let phase = Phase::Battling {
            position: *position,
            starter: attacker,
            wild: defender,
        };
        self.commit(phase, false, vec![exchange], Outcome::Applied)
    }

    /// Back to a fresh intro from any phase: spawn position, empty log.
    pub fn restart(&self) -> Transition {
        info!("session restarted from {:?}", self.phase_kind());
        Transition {
            state: Self {
                fixtures: Arc::clone(&self.fixtures),
                phase: Phase::Intro,
                log: MessageLog::new(self.fixtures.rules.log_capacity),
            },
            log_delta: Vec::new(),
            outcome: Outcome::Applied,
        }
    }

    fn commit(&self, phase: Phase, clear_log: bool, lines: Vec<String>, outcome: Outcome) -> Transition {
        let mut log = if clear_log {
            MessageLog::new(self.fixtures.rules.log_capacity)
        } else {
            self.log.clone()
        };
        for line in &lines {
            log.push(line.as_str());
        }
        Transition {
            state: Self {
                fixtures: Arc::clone(&self.fixtures),
                phase,
                log,
            },
            log_delta: lines,
            outcome,
        }
    }

    fn reject(&self, error: CommandError, line: String) -> Transition {
        debug!("rejected: {error}");
        self.commit(self.phase.clone(), false, vec![line], Outcome::Rejected(error))
    }

    fn invalid_phase(&self, command: CommandKind, line: &str) -> Transition {
        let error = CommandError::InvalidPhaseCommand {
            command,
            phase: self.phase_kind(),
        };
        self.reject(error, line.to_string())
    }

    fn ignore(&self) -> Transition {
        Transition {
            state: self.clone(),
            log_delta: Vec::new(),
            outcome: Outcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::REFERENCE_LAYOUT;
    use pretty_assertions::assert_eq;

    const ALMOST_ONE: f64 = 1.0 - f64::EPSILON;

    fn session() -> GameState {
        GameState::new_session(REFERENCE_LAYOUT).expect("reference session")
    }

    fn exploring(key: &str) -> GameState {
        let transition = session().choose_starter(key);
        assert_eq!(transition.outcome, Outcome::Applied);
        transition.state
    }

    fn battling() -> GameState {
        // (2, 2) -> (3, 2) is grass; a zero roll always triggers.
        let transition = exploring("sproutle").move_player(Direction::Right, &mut || 0.0);
        assert_eq!(transition.state.phase_kind(), PhaseKind::Battling);
        transition.state
    }

    #[test]
    fn new_session_starts_in_intro_at_spawn() {
        let state = session();
        assert_eq!(state.phase(), &Phase::Intro);
        assert_eq!(state.position(), Position::new(2, 2));
        assert!(state.log().is_empty());
        assert!(state.starter().is_none());
        assert!(state.wild().is_none());
    }

    #[test]
    fn choose_starter_enters_exploring_with_welcome() {
        let state = exploring("sproutle");
        assert_eq!(state.phase_kind(), PhaseKind::Exploring);
        let starter = state.starter().expect("starter");
        assert_eq!(starter.name(), "Sproutle");
        assert_eq!(starter.hp(), starter.max_hp());
        assert_eq!(state.log().len(), 1);
        assert!(state.log().latest().is_some_and(|l| l.starts_with("You chose Sproutle")));
    }

    #[test]
    fn unknown_starter_is_rejected_and_logged() {
        let before = session();
        let transition = before.choose_starter("pikachu");
        assert_eq!(
            transition.error(),
            Some(&CommandError::UnknownStarter("pikachu".to_string()))
        );
        assert_eq!(transition.state.phase(), before.phase());
        assert_eq!(transition.log_delta.len(), 1);
    }

    #[test]
    fn choosing_a_starter_clears_earlier_rejections() {
        let state = session().choose_starter("pikachu").state;
        let state = state.choose_starter("glitchmon").state;
        assert_eq!(state.log().len(), 2);

        let transition = state.choose_starter("sproutle");
        assert_eq!(transition.outcome, Outcome::Applied);
        assert_eq!(transition.log_delta.len(), 1);
        assert_eq!(
            transition.state.log().iter().collect::<Vec<_>>(),
            vec!["You chose Sproutle! Walk into the tall grass to find wild creatures."]
        );
    }

    #[test]
    fn moving_onto_plain_never_rolls() {
        let state = exploring("sproutle");
        let mut draws = 0;
        let transition = state.move_player(Direction::Up, &mut || {
            draws += 1;
            0.0
        });
        assert_eq!(draws, 0);
        assert_eq!(transition.state.position(), Position::new(2, 1));
        assert_eq!(transition.state.phase_kind(), PhaseKind::Exploring);
    }

    #[test]
    fn blocked_move_keeps_position() {
        let state = exploring("sproutle");
        let up = state.move_player(Direction::Up, &mut || 0.0).state;
        let transition = up.move_player(Direction::Up, &mut || 0.0);
        assert!(matches!(
            transition.error(),
            Some(CommandError::Blocked {
                cause: BlockCause::Obstacle(TileType::Rock),
                ..
            })
        ));
        assert_eq!(transition.state.position(), Position::new(2, 1));
        assert_eq!(transition.log_delta, vec!["Blocked: a rock wall.".to_string()]);
    }

    #[test]
    fn grass_miss_stays_exploring() {
        let state = exploring("sproutle");
        let transition = state.move_player(Direction::Right, &mut || 0.9);
        assert_eq!(transition.state.phase_kind(), PhaseKind::Exploring);
        assert_eq!(transition.state.position(), Position::new(3, 2));
    }

    #[test]
    fn grass_hit_starts_battle_with_full_health_wild() {
        let state = battling();
        let wild = state.wild().expect("wild");
        assert_eq!(wild.name(), "Bramblemouse");
        assert_eq!(wild.hp(), wild.max_hp());
        assert_eq!(state.position(), Position::new(3, 2));
        assert_eq!(state.log().latest(), Some("A wild Bramblemouse appeared!"));
    }

    #[test]
    fn move_during_battle_is_ignored() {
        let state = battling();
        let transition = state.move_player(Direction::Left, &mut || 0.0);
        assert_eq!(transition.outcome, Outcome::Ignored);
        assert_eq!(transition.state, state);
        assert!(transition.log_delta.is_empty());
    }

    #[test]
    fn attack_outside_battle_is_invalid_phase() {
        let transition = exploring("ripplet").attack("Bubble Jet", &mut || 0.0);
        assert_eq!(
            transition.error(),
            Some(&CommandError::InvalidPhaseCommand {
                command: CommandKind::Attack,
                phase: PhaseKind::Exploring,
            })
        );
    }

    #[test]
    fn unknown_move_leaves_battle_untouched() {
        let state = battling();
        let transition = state.attack("Hyper Beam", &mut || 0.0);
        assert_eq!(
            transition.error(),
            Some(&CommandError::UnknownMove("Hyper Beam".to_string()))
        );
        assert_eq!(transition.state.phase(), state.phase());
    }

    #[test]
    fn exchange_updates_both_combatants() {
        let state = battling();
        let transition = state.attack("Vine Lash", &mut || 0.0);
        let next = transition.state;
        assert_eq!(next.phase_kind(), PhaseKind::Battling);
        assert_eq!(next.wild().map(Combatant::hp), Some(24 - 6));
        assert_eq!(next.starter().map(Combatant::hp), Some(42 - 4));
        assert_eq!(
            transition.log_delta,
            vec!["Sproutle used Vine Lash for 6 damage. The wild Bramblemouse hit back for 4.".to_string()]
        );
    }

    #[test]
    fn victory_returns_to_exploring_keeping_hp() {
        let mut state = battling();
        state = state.attack("Vine Lash", &mut || 0.0).state;
        // 18 hp left; two max-damage hits finish it.
        state = state.attack("Vine Lash", &mut || ALMOST_ONE).state;
        let transition = state.attack("Vine Lash", &mut || ALMOST_ONE);
        let next = transition.state;
        assert_eq!(next.phase_kind(), PhaseKind::Exploring);
        assert!(next.wild().is_none());
        assert_eq!(next.starter().map(Combatant::hp), Some(42 - 4 - 10));
        assert_eq!(next.position(), Position::new(3, 2));
        assert_eq!(
            transition.log_delta.last().map(String::as_str),
            Some("The wild Bramblemouse fainted. You win!")
        );
    }

    #[test]
    fn defeat_leads_to_game_over_and_restart_resets() {
        let mut state = battling();
        // Minimum player rolls and maximum counters: the wild outlasts us.
        for _ in 0..20 {
            if state.phase_kind() != PhaseKind::Battling {
                break;
            }
            let mut draws = [0.0, ALMOST_ONE].into_iter().cycle();
            state = state
                .attack("Seed Burst", &mut || draws.next().unwrap_or(0.0))
                .state;
        }
        assert_eq!(state.phase_kind(), PhaseKind::GameOver);
        assert!(state.starter().is_none());
        assert_eq!(
            state.move_player(Direction::Up, &mut || 0.0).outcome,
            Outcome::Ignored
        );

        let restarted = state.restart();
        assert!(restarted.log_delta.is_empty());
        assert_eq!(restarted.state, session());
    }

    #[test]
    fn restart_from_every_phase_matches_fresh_session() {
        for state in [session(), exploring("embercub"), battling()] {
            assert_eq!(state.restart().state, session());
        }
    }

    #[test]
    fn log_is_bounded_to_capacity() {
        let mut state = exploring("sproutle");
        for _ in 0..6 {
            state = state.move_player(Direction::Up, &mut || 0.0).state;
        }
        assert_eq!(state.log().len(), 4);
    }

    #[test]
    fn spawn_must_be_walkable() {
        let rules = Rules {
            spawn: Position::new(0, 0),
            ..Rules::default()
        };
        assert_eq!(
            GameState::with_rules(REFERENCE_LAYOUT, rules),
            Err(SetupError::Layout(LayoutError::SpawnNotWalkable { x: 0, y: 0 }))
        );
    }
}
