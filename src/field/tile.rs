//! Tile state bitflags.
//!
//! A tile's whole state fits in one byte so the field can be a flat,
//! cache-friendly array even for very large boards. Combined-flag queries
//! (e.g. checking MINE while ignoring FLAGGED) are plain bit tests.

use bitflags::bitflags;

bitflags! {
    /// Independent state bits of a minefield tile.
    ///
    /// Any combination is representable; `REVEALED | MINE` is a detonated
    /// mine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TileState: u8 {
        const MINE = 1;
        const FLAGGED = 2;
        const REVEALED = 4;
    }
}

/// A minefield tile. Tiles are owned exclusively by the field and addressed
/// by coordinate; none exist outside the field's allocated extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    pub state: TileState,
}

impl Tile {
    pub const fn new(state: TileState) -> Self {
        Self { state }
    }

    pub fn is_mine(&self) -> bool {
        self.state.contains(TileState::MINE)
    }

    pub fn is_flagged(&self) -> bool {
        self.state.contains(TileState::FLAGGED)
    }

    pub fn is_revealed(&self) -> bool {
        self.state.contains(TileState::REVEALED)
    }
}
