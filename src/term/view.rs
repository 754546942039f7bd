//! The renderer's per-frame view buffer.

use crate::types::{DisplayTile, Point};

/// A 2D buffer of display tiles plus a write cursor.
///
/// The cursor auto-wraps to the next row past the right edge and back to
/// the origin past the last row. The buffer is ephemeral per frame: fully
/// overwritten by each draw pass and never read by game logic.
#[derive(Debug, Clone)]
pub struct ViewBuffer {
    width: u16,
    height: u16,
    /// Row-major tile storage (y * width + x).
    tiles: Vec<DisplayTile>,
    cursor: Point,
}

impl ViewBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            tiles: vec![DisplayTile::default(); len],
            cursor: Point::default(),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Reallocate at new dimensions, discarding all prior contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.tiles.clear();
        self.tiles.resize(len, DisplayTile::default());
    }

    #[inline(always)]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.x >= self.width as i32 || p.y < 0 || p.y >= self.height as i32 {
            return None;
        }
        Some((p.y as usize) * (self.width as usize) + (p.x as usize))
    }

    pub fn get(&self, p: Point) -> Option<DisplayTile> {
        self.idx(p).map(|i| self.tiles[i])
    }

    /// Move the write cursor.
    pub fn move_cursor(&mut self, position: Point) {
        self.cursor = position;
    }

    /// Write a tile at the cursor and advance it. Out-of-range cursor
    /// positions write nothing but still advance.
    pub fn write(&mut self, tile: DisplayTile) {
        if let Some(i) = self.idx(self.cursor) {
            self.tiles[i] = tile;
        }
        self.advance();
    }

    /// Advance the cursor as if writing, but write nothing.
    pub fn skip(&mut self) {
        self.advance();
    }

    fn advance(&mut self) {
        self.cursor.x += 1;
        if self.cursor.x >= self.width as i32 {
            self.cursor = Point::new(0, self.cursor.y + 1);
        }
        if self.cursor.y >= self.height as i32 {
            self.cursor = Point::new(0, 0);
        }
    }
}
