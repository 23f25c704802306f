//! Flapper entry point
//!
//! Minimal terminal launcher: Space or Enter flaps, `q` or Esc quits. Settings
//! are read from the JSON file named by `FLAPPER_SETTINGS`, if set.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use flapper::sim::GamePhase;
use flapper::{
    Error, Game, JsonFileScoreStore, LogFeedback, MemoryScoreStore, PresentationSink,
    RenderSnapshot, ScoreStore, Session, Settings,
};

const SETTINGS_ENV: &str = "FLAPPER_SETTINGS";

/// Prints the score whenever it changes
#[derive(Default)]
struct TerminalHud {
    last_score: Option<u32>,
}

impl PresentationSink for TerminalHud {
    fn present(&mut self, snapshot: &RenderSnapshot) {
        if snapshot.phase != GamePhase::Active {
            self.last_score = None;
            return;
        }
        if self.last_score != Some(snapshot.score) {
            // Raw mode: no implicit carriage return
            print!(
                "score {:>3}   altitude {:>4.0}   tilt {:>3.0}°\r\n",
                snapshot.score,
                snapshot.body_y,
                snapshot.body_tilt_degrees()
            );
            let _ = io::stdout().flush();
            self.last_score = Some(snapshot.score);
        }
    }
}

/// Keys the launcher reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Flap,
    Quit,
}

/// Restores cooked mode however the launcher exits
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            log::warn!("Failed to restore terminal: {}", e);
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Flapper starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("flapper: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let settings = match std::env::var_os(SETTINGS_ENV) {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::default(),
    };

    let session = Session::new(settings.clone(), open_store(&settings))?
        .with_feedback(Arc::new(LogFeedback))
        .with_presentation(Box::new(TerminalHud::default()));
    let mut game = Game::new(session);

    let raw_mode = RawMode::enable()?;
    let result = play(&mut game);
    drop(raw_mode);

    game.end();
    game.with_session(|session| session.flush_persistence());
    result
}

fn play(game: &mut Game) -> Result<(), Error> {
    say("Flapper - Space/Enter to flap, q/Esc to quit")?;
    say(&format!("Best score: {}", game.snapshot().best_score))?;

    'menu: loop {
        say("Press Space to start")?;
        loop {
            match next_key(Duration::from_millis(50))? {
                Some(Key::Flap) => break,
                Some(Key::Quit) => break 'menu,
                None => {}
            }
        }

        game.start()?;
        while game.phase() == GamePhase::Active {
            match next_key(Duration::from_millis(10))? {
                Some(Key::Flap) => game.flap(),
                Some(Key::Quit) => {
                    game.end();
                    break 'menu;
                }
                None => {}
            }
        }

        let summary = game.snapshot();
        say("")?;
        say(&format!("Game over! Score: {}", summary.score))?;
        if summary.new_record {
            say("*** NEW HIGH SCORE! ***")?;
        }
        say(&format!("Best: {}", summary.best_score))?;
    }

    Ok(())
}

/// Wait up to `timeout` for a key press we care about
fn next_key(timeout: Duration) -> io::Result<Option<Key>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(key_action(key)),
        _ => Ok(None),
    }
}

fn key_action(key: KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(Key::Flap),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Key::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Quit),
        _ => None,
    }
}

fn say(line: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}\r\n", line)?;
    stdout.flush()
}

fn open_store(settings: &Settings) -> Arc<dyn ScoreStore> {
    let file_store = settings
        .best_score_path
        .clone()
        .map(JsonFileScoreStore::new)
        .or_else(JsonFileScoreStore::in_data_dir);

    match file_store {
        Some(store) => {
            log::info!("Best score file: {}", store.path().display());
            Arc::new(store)
        }
        None => {
            log::warn!("No data directory found, best score will not survive restarts");
            Arc::new(MemoryScoreStore::new())
        }
    }
}
