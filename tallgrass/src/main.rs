use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::EffectStore;

use tallgrass::action::Action;
use tallgrass::config;
use tallgrass::effect::Effect;
use tallgrass::reducer::reducer;
use tallgrass::state::AppState;
use tallgrass::ui;

#[derive(Parser, Debug)]
#[command(name = "tallgrass")]
#[command(about = "Walk the tall grass, meet wild creatures, battle them")]
struct Args {
    /// Seed for encounter and damage rolls (defaults to the clock).
    #[arg(long)]
    seed: Option<u64>,
    /// Map layout file: G grass, W water, R rock, anything else plain.
    #[arg(long)]
    layout: Option<PathBuf>,
    /// RON file overriding encounter rate, counter damage, spawn or log size.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Write diagnostics to this file (filter with RUST_LOG).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    config::init_logging(args.log_file.as_deref())?;

    let session = config::load_session(args.layout.as_deref(), args.rules.as_deref())?;
    let seed = args.seed.unwrap_or_else(config::seed_from_time);
    info!("starting with seed {seed}");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, AppState::new(session, seed));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: AppState,
) -> io::Result<()> {
    let mut store = EffectStore::new(state, reducer);
    dispatch_action(&mut store, Action::Init)?;

    loop {
        terminal.draw(|frame| ui::render(frame, frame.area(), store.state()))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                    dispatch_action(&mut store, Action::Quit)?;
                    break;
                }
                if let Some(action) = ui::key_action(key.code, store.state()) {
                    dispatch_action(&mut store, action)?;
                }
            }
            _ => {}
        }
    }

    info!("session ended after {} commands", store.state().commands_run);
    Ok(())
}

fn dispatch_action(
    store: &mut EffectStore<AppState, Action, Effect>,
    action: Action,
) -> io::Result<()> {
    let result = store.dispatch(action);
    for effect in result.effects {
        handle_effect(effect)?;
    }
    Ok(())
}

fn handle_effect(effect: Effect) -> io::Result<()> {
    match effect {
        Effect::Bell => execute!(io::stdout(), Print('\u{7}')),
    }
}
