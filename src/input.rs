//! Key mapping and the background input collector.
//!
//! The game thread never blocks on input: a dedicated thread sits in
//! `crossterm::event::read` and pushes key presses into an mpsc queue that
//! the game polls non-blockingly once per frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Game actions produced from key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Reveal,
    ToggleFlag,
    Quit,
}

/// Map a key press to a game action. Unmapped keys yield `None`.
pub fn map_key(key: KeyEvent) -> Option<GameAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(GameAction::Quit);
    }
    match key.code {
        KeyCode::Left => Some(GameAction::MoveLeft),
        KeyCode::Right => Some(GameAction::MoveRight),
        KeyCode::Up => Some(GameAction::MoveUp),
        KeyCode::Down => Some(GameAction::MoveDown),
        KeyCode::Char(' ') => Some(GameAction::Reveal),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(GameAction::ToggleFlag),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(GameAction::Quit),
        _ => None,
    }
}

/// Handle to the input-collection thread.
///
/// Shutdown is fire-and-forget: `stop` clears the run flag, which the
/// thread checks before each blocking read, but a read already in flight
/// lingers until the next keypress. The thread is detached, never joined.
pub struct InputCollector {
    queue: Receiver<KeyEvent>,
    run: Arc<AtomicBool>,
}

impl InputCollector {
    /// Spawn the collector thread.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        let run = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&run);
        thread::spawn(move || collect_loop(tx, flag));
        Self { queue: rx, run }
    }

    /// Non-blocking poll for the next captured key press.
    pub fn poll(&self) -> Option<KeyEvent> {
        self.queue.try_recv().ok()
    }

    /// Signal the collector thread to exit after its current read.
    pub fn stop(&self) {
        self.run.store(false, Ordering::Relaxed);
    }
}

fn collect_loop(queue: Sender<KeyEvent>, run: Arc<AtomicBool>) {
    while run.load(Ordering::Relaxed) {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if queue.send(key).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
}
