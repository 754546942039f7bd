//! Game orchestration: the render stack and the fixed-rate loop.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::terminal;

use crate::field::{FieldSettings, Minefield, CHUNK_SIZE};
use crate::input::{map_key, GameAction, InputCollector};
use crate::term::{Background, ConsoleRenderer, ScreenCursor, TextLine, Viewport};
use crate::types::{Bounds, Point, Renderable, Rgb, SENTINEL};

/// Target frame rate of the game loop.
const TARGET_FPS: f64 = 60.0;
/// Cursor blink half-period.
const CURSOR_BLINK_SECS: f64 = 0.25;

/// The game's scalar configuration surface.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub view_width: u16,
    pub view_height: u16,
    pub grid_width: i32,
    pub grid_height: i32,
    pub mine_min: u64,
    pub mine_max: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            view_width: 100,
            view_height: 50,
            grid_width: 32,
            grid_height: 32,
            mine_min: 204,
            mine_max: 312,
        }
    }
}

/// Owns the minefield, the renderer, and every renderable on the stack.
pub struct Game {
    renderer: ConsoleRenderer<io::Stdout>,
    field: Minefield,
    background: Background,
    fps_text: TextLine,
    cursor: ScreenCursor,
}

impl Game {
    /// Build a fully generated game from its configuration: roll the mine
    /// count, run the remainder pass, then randomize every chunk eagerly.
    pub fn new(config: GameConfig) -> Result<Self> {
        let mut rng = rand::rng();
        let mut field = Minefield::new(config.grid_width, config.grid_height);
        field.settings = FieldSettings::new(config.mine_min, config.mine_max);
        field.settings.roll_mine_count(&mut rng)?;

        // Remainder before chunks; the accounting depends on it.
        field.randomize_remainder(&mut rng)?;
        let chunks_x = (config.grid_width + CHUNK_SIZE - 1) / CHUNK_SIZE;
        let chunks_y = (config.grid_height + CHUNK_SIZE - 1) / CHUNK_SIZE;
        for cy in 0..chunks_y {
            for cx in 0..chunks_x {
                field.randomize_chunk(&mut rng, Point::new(cx, cy))?;
            }
        }

        let background = Background {
            size: Bounds::new(
                Point::new(0, 0),
                Point::new(config.view_width as i32, config.view_height as i32),
            ),
            color: Rgb::DARK_GREY,
        };

        Ok(Self {
            renderer: ConsoleRenderer::stdout(config.view_width, config.view_height),
            field,
            background,
            fps_text: TextLine::new(Point::new(35, 3), 16),
            cursor: ScreenCursor::new(' ', Rgb::BLACK, Rgb::WHITE),
        })
    }

    /// Enter the terminal session.
    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter()
    }

    /// Restore the terminal session.
    pub fn exit(&mut self) -> Result<()> {
        self.renderer.exit()
    }

    /// Run the fixed-rate game loop until the player quits or detonates a
    /// mine.
    ///
    /// The loop busy-waits on the clock until the minimum frame interval
    /// elapses; no blocking sleep with guaranteed wake latency is assumed.
    /// Input arrives through the collector's queue and is polled exactly
    /// once per frame, whether or not an event is available.
    pub fn run(&mut self) -> Result<()> {
        let input = InputCollector::spawn();
        let frame = Duration::from_secs_f64(1.0 / TARGET_FPS);
        let mut last = Instant::now();
        let mut blink_timer = 0.0f64;
        let mut running = true;

        while running {
            while last.elapsed() < frame {
                thread::yield_now();
            }
            let delta = last.elapsed().as_secs_f64();
            last = Instant::now();

            blink_timer += delta;
            if blink_timer >= CURSOR_BLINK_SECS {
                blink_timer = 0.0;
                self.cursor.ch = if self.cursor.ch == SENTINEL { ' ' } else { SENTINEL };
            }

            self.fps_text.set_text(format!("FPS: {:.0}", 1.0 / delta));

            if let Some(key) = input.poll() {
                match map_key(key) {
                    Some(GameAction::MoveLeft) => self.move_cursor(Point::new(-1, 0)),
                    Some(GameAction::MoveRight) => self.move_cursor(Point::new(1, 0)),
                    Some(GameAction::MoveUp) => self.move_cursor(Point::new(0, -1)),
                    Some(GameAction::MoveDown) => self.move_cursor(Point::new(0, 1)),
                    Some(GameAction::Reveal) => {
                        if self.field.flood_reveal(self.cursor.position) {
                            running = false;
                        }
                    }
                    Some(GameAction::ToggleFlag) => {
                        self.field.toggle_flag(self.cursor.position);
                    }
                    Some(GameAction::Quit) => running = false,
                    None => {}
                }
            }

            let (w, h) = terminal::size().unwrap_or((80, 24));
            let vp = Viewport::new(w, h);

            let Self {
                renderer,
                field,
                background,
                fps_text,
                cursor,
            } = self;
            // Back-to-front: later entries draw over earlier ones.
            let stack: [&dyn Renderable; 4] = [&*background, &*field, &*fps_text, &*cursor];
            for renderable in stack {
                renderer.draw(renderable, vp);
            }
            renderer.render(vp)?;
        }

        input.stop();
        Ok(())
    }

    /// Move the screen cursor, clamped to the field, and keep it visible
    /// through the blink cycle while the player is steering it.
    fn move_cursor(&mut self, delta: Point) {
        self.cursor.position = (self.cursor.position + delta).clamp_to(self.field.bounds());
        self.cursor.ch = ' ';
    }
}
