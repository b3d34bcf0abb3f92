use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use tallgrass_core::{
    species, Combatant, Direction as MoveDir, PhaseKind, TileType, STARTER_KEYS,
};

use crate::action::Action;
use crate::state::AppState;

const BG_BASE: Color = Color::Rgb(24, 36, 26);
const BG_PANEL: Color = Color::Rgb(34, 58, 38);
const TEXT_MAIN: Color = Color::Rgb(228, 236, 214);
const TEXT_DIM: Color = Color::Rgb(172, 186, 160);
const ACCENT_GREEN: Color = Color::Rgb(104, 204, 120);
const ACCENT_GOLD: Color = Color::Rgb(222, 196, 120);
const ACCENT_RED: Color = Color::Rgb(220, 96, 96);
const HIGHLIGHT_TEXT: Color = Color::Rgb(16, 26, 18);
const BORDER_ACCENT: Color = Color::Rgb(74, 98, 82);

// Tile colors
const TILE_PLAIN: Color = Color::Rgb(156, 132, 76);
const TILE_GRASS: Color = Color::Rgb(34, 112, 58);
const TILE_WATER: Color = Color::Rgb(48, 86, 146);
const TILE_ROCK: Color = Color::Rgb(66, 74, 66);
const PLAYER: Color = Color::Rgb(255, 252, 244);

fn tile_glyph(kind: TileType) -> (&'static str, Color, Color) {
    match kind {
        TileType::Plain => ("..", TILE_PLAIN, adjust_color(TILE_PLAIN, 30)),
        TileType::Grass => ("\"\"", TILE_GRASS, adjust_color(TILE_GRASS, 50)),
        TileType::Water => ("~~", TILE_WATER, adjust_color(TILE_WATER, 60)),
        TileType::Rock => ("##", TILE_ROCK, adjust_color(TILE_ROCK, 40)),
    }
}

fn adjust_color(color: Color, delta: i16) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let clamp = |v: i16| v.clamp(0, 255) as u8;
            Color::Rgb(
                clamp(r as i16 + delta),
                clamp(g as i16 + delta),
                clamp(b as i16 + delta),
            )
        }
        other => other,
    }
}

/// Maps a key press to an action for the current phase. `q` is handled by
/// the main loop.
pub fn key_action(code: KeyCode, state: &AppState) -> Option<Action> {
    match state.phase() {
        PhaseKind::Intro | PhaseKind::Battling => match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(Action::CursorPrev),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(Action::CursorNext),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('z') => Some(Action::Confirm),
            _ => None,
        },
        PhaseKind::Exploring => match code {
            KeyCode::Up | KeyCode::Char('w') => Some(Action::Move(MoveDir::Up)),
            KeyCode::Down | KeyCode::Char('s') => Some(Action::Move(MoveDir::Down)),
            KeyCode::Left | KeyCode::Char('a') => Some(Action::Move(MoveDir::Left)),
            KeyCode::Right | KeyCode::Char('d') => Some(Action::Move(MoveDir::Right)),
            _ => None,
        },
        PhaseKind::GameOver => match code {
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => Some(Action::Restart),
            _ => None,
        },
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], state);
    match state.phase() {
        PhaseKind::Intro => render_intro(frame, chunks[1], state),
        PhaseKind::Exploring => render_exploring(frame, chunks[1], state),
        PhaseKind::Battling => render_battle(frame, chunks[1], state),
        PhaseKind::GameOver => render_game_over(frame, chunks[1]),
    }
    render_log(frame, chunks[2], state);
    render_footer(frame, chunks[3], state);
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let phase = match state.phase() {
        PhaseKind::Intro => "CHOOSE YOUR PARTNER",
        PhaseKind::Exploring => "ROUTE 1",
        PhaseKind::Battling => "BATTLE",
        PhaseKind::GameOver => "GAME OVER",
    };
    let line = Line::from(vec![
        Span::styled(
            " TALLGRASS ",
            Style::default()
                .fg(HIGHLIGHT_TEXT)
                .bg(ACCENT_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {phase}"), Style::default().fg(ACCENT_GOLD)),
        Span::styled(
            format!("  seed {}", state.seed),
            Style::default().fg(TEXT_DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_intro(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block(" Starters ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for (index, key) in STARTER_KEYS.iter().enumerate() {
        let Some(species) = species::starter(key) else {
            continue;
        };
        let selected = index == state.starter_cursor;
        let marker = if selected { "> " } else { "  " };
        lines.push(menu_line(
            &format!("{marker}{} ({:?}, {} HP)", species.name, species.element, species.max_hp),
            selected,
        ));
        let moves: Vec<String> = species
            .moves
            .iter()
            .map(|mv| format!("{} {}-{}", mv.name, mv.damage.min, mv.damage.max))
            .collect();
        lines.push(Line::from(Span::styled(
            format!("    {}", moves.join("  |  ")),
            Style::default().fg(TEXT_DIM),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_exploring(frame: &mut Frame, area: Rect, state: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(28)])
        .split(area);

    render_map(frame, layout[0], state);

    let block = panel_block(" Partner ");
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);
    let mut lines = Vec::new();
    if let Some(starter) = state.session.starter() {
        lines.extend(combatant_lines(starter));
    }
    let pos = state.session.position();
    lines.push(Line::from(Span::styled(
        format!("At ({}, {})", pos.x, pos.y),
        Style::default().fg(TEXT_DIM),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_map(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = panel_block(" Map ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let world = state.session.world();
    let player = state.session.position();
    let lines: Vec<Line> = (0..world.height())
        .map(|y| {
            let spans: Vec<Span> = world
                .row(y)
                .iter()
                .enumerate()
                .map(|(x, tile)| {
                    let (glyph, bg, fg) = tile_glyph(tile.kind);
                    if x == usize::from(player.x) && y == player.y {
                        Span::styled(
                            "@ ",
                            Style::default()
                                .fg(PLAYER)
                                .bg(bg)
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::styled(glyph, Style::default().fg(fg).bg(bg))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_battle(frame: &mut Frame, area: Rect, state: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(area);

    if let Some(wild) = state.session.wild() {
        let title = format!(" WILD {} ", wild.name().to_ascii_uppercase());
        let block = panel_block(title.as_str());
        let inner = block.inner(layout[0]);
        frame.render_widget(block, layout[0]);
        frame.render_widget(Paragraph::new(combatant_lines(wild)), inner);
    }
    if let Some(starter) = state.session.starter() {
        let block = panel_block(" Partner ");
        let inner = block.inner(layout[1]);
        frame.render_widget(block, layout[1]);
        frame.render_widget(Paragraph::new(combatant_lines(starter)), inner);
    }

    let block = panel_block(" Moves ");
    let inner = block.inner(layout[2]);
    frame.render_widget(block, layout[2]);
    let lines: Vec<Line> = state
        .session
        .available_moves()
        .iter()
        .enumerate()
        .map(|(index, mv)| {
            let selected = index == state.move_cursor;
            let marker = if selected { "> " } else { "  " };
            menu_line(
                &format!("{marker}{} ({}-{})", mv.name, mv.damage.min, mv.damage.max),
                selected,
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_game_over(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Your partner fainted.",
            Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to start over.",
            Style::default().fg(TEXT_MAIN),
        )),
    ];
    let block = panel_block(" Game Over ");
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn render_log(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = state
        .session
        .log()
        .iter()
        .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(TEXT_MAIN))))
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Pick a partner to begin.",
            Style::default().fg(TEXT_DIM),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel_block(" Log ")),
        area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints = match state.phase() {
        PhaseKind::Intro => "up/down choose  enter confirm  q quit",
        PhaseKind::Exploring => "arrows/wasd move  q quit",
        PhaseKind::Battling => "up/down pick move  enter attack  q quit",
        PhaseKind::GameOver => "r restart  q quit",
    };
    let mut spans = vec![Span::styled(hints, Style::default().fg(TEXT_DIM))];
    if let Some(error) = &state.last_error {
        spans.push(Span::styled(
            format!("  ({error})"),
            Style::default().fg(ACCENT_RED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn combatant_lines(combatant: &Combatant) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            format!("{} ({:?})", combatant.name(), combatant.species.element),
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        )),
        hp_line(combatant.hp(), combatant.max_hp()),
    ]
}

fn hp_line(current: u16, max: u16) -> Line<'static> {
    let width: usize = 12;
    let ratio = if max == 0 {
        0.0
    } else {
        current as f32 / max as f32
    };
    let filled = ((ratio * width as f32).round() as usize).min(width);
    let empty = width.saturating_sub(filled);
    let color = if ratio > 0.5 {
        ACCENT_GREEN
    } else if ratio > 0.2 {
        ACCENT_GOLD
    } else {
        ACCENT_RED
    };
    Line::from(vec![
        Span::raw("HP "),
        Span::styled(
            "█".repeat(filled),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled("░".repeat(empty), Style::default().fg(TEXT_DIM)),
        Span::raw(format!(" {current}/{max}")),
    ])
}

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(BORDER_ACCENT))
}

fn menu_line(label: &str, selected: bool) -> Line<'static> {
    let style = if selected {
        Style::default()
            .fg(HIGHLIGHT_TEXT)
            .bg(ACCENT_GREEN)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_MAIN)
    };
    Line::from(Span::styled(label.to_string(), style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use tallgrass_core::{GameState, REFERENCE_LAYOUT};

    fn app() -> AppState {
        let session = GameState::new_session(REFERENCE_LAYOUT).expect("session");
        AppState::new(session, 3)
    }

    #[test]
    fn keys_follow_phase() {
        let state = app();
        assert_eq!(key_action(KeyCode::Enter, &state), Some(Action::Confirm));
        assert_eq!(key_action(KeyCode::Left, &state), None);

        let mut state = app();
        state.session = state.session.choose_starter("sproutle").state;
        assert_eq!(
            key_action(KeyCode::Char('a'), &state),
            Some(Action::Move(MoveDir::Left))
        );
        assert_eq!(key_action(KeyCode::Enter, &state), None);
    }

    #[test]
    fn map_screen_draws_player_marker() {
        let mut state = app();
        state.session = state.session.choose_starter("sproutle").state;
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("terminal");
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .expect("draw");

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains('@'));
        assert!(text.contains("Sproutle"));
    }
}
