//! Terminal minesweeper runner.
//!
//! Arrow keys steer, space reveals, `f` flags, `q` quits. Revealing a mine
//! ends the game.

use anyhow::Result;

use tui_mines::game::{Game, GameConfig};

fn main() -> Result<()> {
    let mut game = Game::new(GameConfig::default())?;
    game.enter()?;

    let result = game.run();

    // Always try to restore terminal state.
    let _ = game.exit();
    result
}
