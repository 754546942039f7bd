//! Minefield module - tile storage, chunked mine generation, and queries
//!
//! The field is a flat row-major array of one-byte tiles. Mine placement is
//! proportional per chunk so that generation cost can be bounded spatially:
//! each 256x256 chunk receives `trunc(mine_count * chunk_area / grid_area)`
//! mines, and a single up-front remainder pass places whatever the
//! truncated per-chunk quotas leave uncovered. The game generates every
//! chunk eagerly today, but nothing in here requires that; chunks can be
//! randomized lazily as a player explores them.
//!
//! Generation protocol: [`Minefield::randomize_remainder`] must run before
//! any [`Minefield::randomize_chunk`] call, and the field must not be
//! resized in between, or the remainder accounting diverges from the real
//! per-chunk deficit.

pub mod settings;
pub mod tile;

use std::collections::{HashSet, VecDeque};

use arrayvec::ArrayVec;
use rand::Rng;

use crate::types::{Bounds, DisplayTile, Point, Renderable, Rgb};

pub use settings::{FieldError, FieldSettings};
pub use tile::{Tile, TileState};

/// Side length of the square chunks the field is partitioned into for
/// proportional mine placement.
pub const CHUNK_SIZE: i32 = 256;

/// Retry budget per placed mine before rejection sampling is declared
/// stalled. Only reachable when a region's occupancy approaches 100%.
const REJECTION_RETRY_LIMIT: u32 = 100_000;

/// Moore neighborhood offsets.
const ADJACENT_POINTS: [Point; 8] = [
    Point::new(-1, 1),
    Point::new(0, 1),
    Point::new(1, 1),
    Point::new(-1, 0),
    Point::new(1, 0),
    Point::new(-1, -1),
    Point::new(0, -1),
    Point::new(1, -1),
];

/// Background color shared by every tile the field renders.
const FIELD_BG: Rgb = Rgb::LIGHT_GREY;

/// A logical minesweeper field, also renderable as a grid of glyphs.
#[derive(Debug, Clone)]
pub struct Minefield {
    width: i32,
    height: i32,
    /// Row-major tile storage (y * width + x).
    tiles: Vec<Tile>,
    pub settings: FieldSettings,
}

impl Minefield {
    /// Create a new field of the given dimensions, all tiles blank.
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width,
            height,
            tiles: vec![Tile::default(); len],
            settings: FieldSettings::default(),
        }
    }

    /// Discard all tile state and reallocate at a new size.
    pub fn reset(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        let len = (width.max(0) as usize) * (height.max(0) as usize);
        self.tiles.clear();
        self.tiles.resize(len, Tile::default());
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline(always)]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.x >= self.width || p.y < 0 || p.y >= self.height {
            return None;
        }
        Some((p.y as usize) * (self.width as usize) + (p.x as usize))
    }

    /// Get the tile at a position. Returns `None` out of bounds.
    pub fn get(&self, p: Point) -> Option<Tile> {
        self.idx(p).map(|i| self.tiles[i])
    }

    /// In-place handle to a tile, so mutations hit the stored tile and not
    /// a copy. Returns `None` out of bounds.
    fn tile_mut(&mut self, p: Point) -> Option<&mut Tile> {
        self.idx(p).map(|i| &mut self.tiles[i])
    }

    /// A uniformly random point on this field.
    fn random_point<R: Rng>(&self, rng: &mut R) -> Point {
        Self::random_point_within(rng, self.width, self.height)
    }

    /// A uniformly random point in `[0, max_width) x [0, max_height)`.
    fn random_point_within<R: Rng>(rng: &mut R, max_width: i32, max_height: i32) -> Point {
        Point::new(rng.random_range(0..max_width), rng.random_range(0..max_height))
    }

    /// Count mines directly bordering a point, diagonals included.
    /// Out-of-bounds neighbors are excluded, not wrapped.
    pub fn adjacent_mines(&self, point: Point) -> u32 {
        let mut mines = 0;
        for offset in ADJACENT_POINTS {
            if self.get(point + offset).is_some_and(|t| t.is_mine()) {
                mines += 1;
            }
        }
        mines
    }

    /// Fill `points` with in-bounds neighbors of `point` matching
    /// `predicate` and return how many were written. The buffer is
    /// capacity-bounded at 8; it is cleared first.
    pub fn adjacent_points_where<F>(
        &self,
        point: Point,
        predicate: F,
        points: &mut ArrayVec<Point, 8>,
    ) -> usize
    where
        F: Fn(Tile) -> bool,
    {
        points.clear();
        for offset in ADJACENT_POINTS {
            let adj = point + offset;
            if self.get(adj).is_some_and(&predicate) {
                points.push(adj);
            }
        }
        points.len()
    }

    /// Which chunk a point lies in.
    pub fn point_to_chunk(&self, point: Point) -> Point {
        Point::new(point.x / CHUNK_SIZE, point.y / CHUNK_SIZE)
    }

    /// Place the mines that the eventual full sweep of
    /// [`Minefield::randomize_chunk`] calls will not cover.
    ///
    /// The per-chunk quota is an integer truncation of a proportional
    /// share, so summing it over every chunk generally undershoots
    /// `mine_count`. This computes that aggregate analytically, without
    /// touching tile state, accounting separately for whole interior
    /// chunks, the partial chunks along each edge, and the partial corner
    /// chunk, then scatters the deficit uniformly over the entire field.
    pub fn randomize_remainder<R: Rng>(&mut self, rng: &mut R) -> Result<(), FieldError> {
        let mine_count = self.settings.mine_count;
        let width = self.width as i64;
        let height = self.height as i64;
        if mine_count > (width * height).max(0) as u64 {
            return Err(FieldError::QuotaExceedsCapacity {
                quota: mine_count,
                capacity: (width * height).max(0) as u64,
            });
        }
        let area = (width * height) as f64;

        let whole_width = width / CHUNK_SIZE as i64;
        let whole_height = height / CHUNK_SIZE as i64;
        let whole_area = whole_width * whole_height;
        let per_whole_chunk =
            (mine_count as f64 * ((CHUNK_SIZE * CHUNK_SIZE) as f64 / area)) as i64;
        let whole_mines = per_whole_chunk * whole_area;

        // Fractional chunk widths are exact in f64 because CHUNK_SIZE is a
        // power of two; the edge quotas below match the truncations that
        // randomize_chunk performs on the corresponding partial chunks.
        let edge_width = width as f64 / CHUNK_SIZE as f64 - whole_width as f64;
        let edge_height = height as f64 / CHUNK_SIZE as f64 - whole_height as f64;
        let per_width_edge_chunk = (mine_count as f64
            * (edge_width * CHUNK_SIZE as f64 * CHUNK_SIZE as f64 / area))
            as i64;
        let width_edge_mines = per_width_edge_chunk * whole_height;
        let per_height_edge_chunk = (mine_count as f64
            * (edge_height * CHUNK_SIZE as f64 * CHUNK_SIZE as f64 / area))
            as i64;
        let height_edge_mines = per_height_edge_chunk * whole_width;
        let per_corner_chunk = (mine_count as f64
            * (edge_height * edge_width * CHUNK_SIZE as f64 * CHUNK_SIZE as f64 / area))
            as i64;

        let placed_by_chunks =
            whole_mines + width_edge_mines + height_edge_mines + per_corner_chunk;
        let remainder = mine_count as i64 - placed_by_chunks;
        if remainder <= 0 {
            return Ok(());
        }

        self.place_mines(rng, remainder as u64, |field, rng| field.random_point(rng))
    }

    /// Randomize one chunk of the field: clear its FLAGGED/REVEALED bits
    /// and place the chunk's proportional mine quota by rejection sampling.
    ///
    /// Pre-existing MINE bits are left alone, so re-randomizing an
    /// already-mined chunk can only add mines. The game never re-randomizes
    /// after play starts; see DESIGN.md for the record of this decision.
    pub fn randomize_chunk<R: Rng>(&mut self, rng: &mut R, chunk: Point) -> Result<(), FieldError> {
        let chunk_origin = CHUNK_SIZE * chunk;
        let chunk_width = (self.width - chunk_origin.x).min(CHUNK_SIZE);
        let chunk_height = (self.height - chunk_origin.y).min(CHUNK_SIZE);
        if chunk_width <= 0 || chunk_height <= 0 {
            return Ok(());
        }

        let area = (self.width as i64 * self.height as i64) as f64;
        let chunk_area = chunk_width as i64 * chunk_height as i64;
        let quota = (self.settings.mine_count as f64 * (chunk_area as f64 / area)) as i64;
        // A chunk cannot hold more mines than it has tiles; only reachable
        // when mine_count itself exceeds the grid area.
        if quota > chunk_area {
            return Err(FieldError::QuotaExceedsCapacity {
                quota: quota as u64,
                capacity: chunk_area as u64,
            });
        }

        for i in 0..chunk_width {
            for j in 0..chunk_height {
                let p = chunk_origin + Point::new(i, j);
                if let Some(tile) = self.tile_mut(p) {
                    tile.state.remove(TileState::FLAGGED | TileState::REVEALED);
                }
            }
        }

        self.place_mines(rng, quota.max(0) as u64, |_, rng| {
            chunk_origin + Self::random_point_within(rng, chunk_width, chunk_height)
        })
    }

    /// Rejection-sample `quota` mines from `sample`, skipping points that
    /// already hold one. Expected cost grows as the region saturates, so an
    /// excessive retry count is reported as a configuration error instead
    /// of looping forever.
    fn place_mines<R, F>(&mut self, rng: &mut R, quota: u64, sample: F) -> Result<(), FieldError>
    where
        R: Rng,
        F: Fn(&Self, &mut R) -> Point,
    {
        for placed in 0..quota {
            let mut retries = 0u32;
            let mut point = sample(self, rng);
            while self.get(point).is_some_and(|t| t.is_mine()) {
                retries += 1;
                if retries > REJECTION_RETRY_LIMIT {
                    return Err(FieldError::PlacementStalled { placed, quota });
                }
                point = sample(self, rng);
            }
            if let Some(tile) = self.tile_mut(point) {
                tile.state.insert(TileState::MINE);
            }
        }
        Ok(())
    }

    /// Reveal the zero-adjacency region connected to `p`, plus the numbered
    /// tiles bordering it, breadth-first.
    ///
    /// A tile with adjacent mines is revealed directly instead, so the
    /// player can click any tile. Returns true iff the clicked tile was a
    /// mine; queued tiles are mine-free by construction. Out-of-bounds
    /// points are ignored.
    pub fn flood_reveal(&mut self, p: Point) -> bool {
        if self.get(p).is_none() {
            return false;
        }

        let mut visited: HashSet<Point> = HashSet::new();
        let mut open: VecDeque<Point> = VecDeque::new();
        let mut adjacent: ArrayVec<Point, 8> = ArrayVec::new();

        if self.adjacent_mines(p) == 0 {
            open.push_back(p);
        } else if self.reveal_tile(p) {
            return true;
        }

        while let Some(point) = open.pop_front() {
            self.reveal_tile(point);
            let count = self.adjacent_points_where(point, |t| !t.is_mine(), &mut adjacent);
            for i in 0..count {
                let adj = adjacent[i];
                if self.adjacent_mines(adj) == 0 && visited.insert(adj) {
                    open.push_back(adj);
                } else {
                    // Numbered leaf tile: reveal, don't expand past it.
                    self.reveal_tile(adj);
                }
            }
        }
        false
    }

    /// XOR the FLAGGED bit at a point; an involution, with no guard against
    /// flagging revealed or mined tiles. Returns false out of bounds.
    pub fn toggle_flag(&mut self, pos: Point) -> bool {
        match self.tile_mut(pos) {
            Some(tile) => {
                tile.state.toggle(TileState::FLAGGED);
                true
            }
            None => false,
        }
    }

    /// Reveal a tile and report whether it holds a mine. Out-of-bounds
    /// points are ignored and report false.
    pub fn reveal_tile(&mut self, pos: Point) -> bool {
        match self.tile_mut(pos) {
            Some(tile) => {
                tile.state.insert(TileState::REVEALED);
                tile.is_mine()
            }
            None => false,
        }
    }
}

impl Renderable for Minefield {
    fn bounds(&self) -> Bounds {
        Bounds::new(Point::new(0, 0), Point::new(self.width - 1, self.height - 1))
    }

    fn display_tile(&self, p: Point) -> DisplayTile {
        let tile = match self.get(p) {
            Some(tile) => tile,
            None => return DisplayTile::default(),
        };
        if tile.is_flagged() {
            DisplayTile::new('x', Rgb::RED, FIELD_BG)
        } else if tile.is_revealed() {
            if tile.is_mine() {
                DisplayTile::new('m', Rgb::RED, FIELD_BG)
            } else {
                let adj = self.adjacent_mines(p);
                let color = match adj {
                    0 => Rgb::LIGHT_GREY,
                    1 => Rgb::BRIGHTER_BLUE,
                    2 => Rgb::DARKER_GREEN,
                    3 => Rgb::RED,
                    4 => Rgb::BLUE,
                    5 => Rgb::DARKER_RED,
                    6 => Rgb::DARKER_CYAN,
                    7 => Rgb::BLACK,
                    // 8 is unreachable with 8 neighbors, but the table
                    // keeps a fallback.
                    _ => Rgb::WHITE,
                };
                let digit = char::from(b'0' + adj as u8);
                DisplayTile::new(digit, color, FIELD_BG)
            }
        } else {
            DisplayTile::new('\u{25A1}', Rgb::WHITE, FIELD_BG)
        }
    }
}
