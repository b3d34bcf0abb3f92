use tallgrass_core::{GameState, PhaseKind, SeededRng, STARTER_KEYS};

#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub session: GameState,
    pub rng: SeededRng,
    pub seed: u64,
    pub starter_cursor: usize,
    pub move_cursor: usize,
    pub last_error: Option<String>,
    pub commands_run: u32,
}

impl AppState {
    pub fn new(session: GameState, seed: u64) -> Self {
        Self {
            session,
            rng: SeededRng::new(seed),
            seed,
            starter_cursor: 0,
            move_cursor: 0,
            last_error: None,
            commands_run: 0,
        }
    }

    pub fn phase(&self) -> PhaseKind {
        self.session.phase_kind()
    }

    /// Number of entries the cursor can move over in the current phase.
    pub fn menu_len(&self) -> usize {
        match self.phase() {
            PhaseKind::Intro => STARTER_KEYS.len(),
            PhaseKind::Battling => self.session.available_moves().len(),
            PhaseKind::Exploring | PhaseKind::GameOver => 0,
        }
    }

    pub fn selected_starter(&self) -> Option<&'static str> {
        STARTER_KEYS.get(self.starter_cursor).copied()
    }

    pub fn selected_move(&self) -> Option<&str> {
        self.session
            .available_moves()
            .get(self.move_cursor)
            .map(|mv| mv.name.as_str())
    }
}
