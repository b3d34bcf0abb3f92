use log::info;
use tallgrass_core::{Command, Outcome, PhaseKind};
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::AppState;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.starter_cursor = 0;
            state.move_cursor = 0;
            state.last_error = None;
            DispatchResult::changed()
        }
        Action::CursorNext => move_cursor(state, 1),
        Action::CursorPrev => move_cursor(state, -1),
        Action::Confirm => confirm(state),
        Action::StarterChoose(key) => run_command(state, Command::ChooseStarter(key)),
        Action::Move(direction) => run_command(state, Command::Move(direction)),
        Action::BattleAttack(name) => run_command(state, Command::Attack(name)),
        Action::Restart => run_command(state, Command::Restart),
        Action::Quit => DispatchResult::unchanged(),
    }
}

fn move_cursor(state: &mut AppState, delta: isize) -> DispatchResult<Effect> {
    let len = state.menu_len();
    if len == 0 {
        return DispatchResult::unchanged();
    }
    let cursor = match state.phase() {
        PhaseKind::Intro => &mut state.starter_cursor,
        _ => &mut state.move_cursor,
    };
    *cursor = (*cursor as isize + delta).rem_euclid(len as isize) as usize;
    DispatchResult::changed()
}

fn confirm(state: &mut AppState) -> DispatchResult<Effect> {
    let command = match state.phase() {
        PhaseKind::Intro => state
            .selected_starter()
            .map(|key| Command::ChooseStarter(key.to_string())),
        PhaseKind::Battling => state
            .selected_move()
            .map(|name| Command::Attack(name.to_string())),
        PhaseKind::GameOver => Some(Command::Restart),
        PhaseKind::Exploring => None,
    };
    match command {
        Some(command) => run_command(state, command),
        None => DispatchResult::unchanged(),
    }
}

fn run_command(state: &mut AppState, command: Command) -> DispatchResult<Effect> {
    let before = state.phase();
    let transition = state.session.apply(command, &mut state.rng);
    for line in &transition.log_delta {
        info!(target: "tallgrass::play", "{line}");
    }

    match transition.outcome {
        Outcome::Ignored => return DispatchResult::unchanged(),
        Outcome::Rejected(error) => state.last_error = Some(error.to_string()),
        Outcome::Applied => state.last_error = None,
    }
    state.session = transition.state;
    state.commands_run = state.commands_run.saturating_add(1);

    let after = state.phase();
    if after != before {
        state.starter_cursor = 0;
        state.move_cursor = 0;
    }
    if before == PhaseKind::Exploring && after == PhaseKind::Battling {
        return DispatchResult::changed_with(Effect::Bell);
    }
    DispatchResult::changed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallgrass_core::{GameState, REFERENCE_LAYOUT};

    fn app() -> AppState {
        let session = GameState::new_session(REFERENCE_LAYOUT).expect("session");
        AppState::new(session, 11)
    }

    #[test]
    fn cursor_wraps_around_starter_list() {
        let mut state = app();
        let _ = reducer(&mut state, Action::CursorPrev);
        assert_eq!(state.selected_starter(), Some("ripplet"));
        let _ = reducer(&mut state, Action::CursorNext);
        assert_eq!(state.selected_starter(), Some("sproutle"));
    }

    #[test]
    fn confirm_chooses_highlighted_starter() {
        let mut state = app();
        let _ = reducer(&mut state, Action::CursorNext);
        let _ = reducer(&mut state, Action::Confirm);
        assert_eq!(state.phase(), PhaseKind::Exploring);
        assert_eq!(
            state.session.starter().map(|s| s.name().to_string()),
            Some("Embercub".to_string())
        );
        assert_eq!(state.starter_cursor, 0);
    }

    #[test]
    fn rejected_command_records_error() {
        let mut state = app();
        let _ = reducer(&mut state, Action::BattleAttack("Vine Lash".into()));
        assert!(state.last_error.is_some());
        assert_eq!(state.phase(), PhaseKind::Intro);
        assert_eq!(state.session.log().len(), 1);
    }

    #[test]
    fn cursor_is_inert_while_exploring() {
        let mut state = app();
        let _ = reducer(&mut state, Action::StarterChoose("sproutle".into()));
        let result = reducer(&mut state, Action::CursorNext);
        assert!(!result.changed);
    }
}
