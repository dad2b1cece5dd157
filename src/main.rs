//! blockfall - a falling-block puzzle for the terminal

mod bag;
mod board;
mod game;
mod gravity;
mod input;
mod piece;
mod score;
mod settings;
mod snapshot;
mod store;
mod tetromino;
mod theme;
mod ui;

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Action, Game, GameConfig};
use input::InputHandler;
use ratatui::{backend::CrosstermBackend, Terminal};
use score::HighScore;
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};
use store::{FileStore, MemoryStore, Store};
use theme::Theme;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn open_store() -> Box<dyn Store> {
    match FileStore::default_path() {
        Some(path) => {
            tracing::info!("Best score store: {}", path.display());
            Box::new(FileStore::open(path))
        }
        None => {
            tracing::warn!("No data directory, best score will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let session_id: u32 = rand::random();

    // Log to a file so the terminal UI stays clean
    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blockfall=debug".parse().context("bad log directive")?),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "blockfall starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();

    // Bad dimensions or timing are fatal before the terminal is touched
    let mut game = Game::new(
        GameConfig::from_settings(&settings.gameplay),
        HighScore::load(open_store()),
        Theme::from_settings(&settings.visual),
    )
    .context("Invalid game settings")?;
    let input = InputHandler::from_settings(&settings);

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, &input);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        tracing::error!("Exited with error: {}", e);
    }

    println!("Final Score: {} | Best: {}", game.score().points, game.best());
    result.map_err(Into::into)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    input: &InputHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::render_game(frame, &game.snapshot()))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match input.key_down(key) {
                        Some(Action::Quit) => {
                            tracing::info!("Quit requested");
                            return Ok(());
                        }
                        Some(action) => game.process_action(action, Instant::now()),
                        None => {}
                    }
                }
            }
        }

        game.update(Instant::now());
    }
}
