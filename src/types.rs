//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// A 2D point in console/grid space.
///
/// Arithmetic uses Rust's default integer semantics: overflow panics in
/// debug builds and wraps in release builds. Coordinates in this codebase
/// stay far below those limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Componentwise minimum of `self` and `other`.
    pub fn min(self, other: Point) -> Point {
        Point::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Componentwise maximum of `self` and `other`.
    pub fn max(self, other: Point) -> Point {
        Point::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Clamp this point into `bounds` (both corners inclusive).
    pub fn clamp_to(self, bounds: Bounds) -> Point {
        self.max(bounds.upper_left).min(bounds.lower_right)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Mul<i32> for Point {
    type Output = Point;

    fn mul(self, rhs: i32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Mul<Point> for i32 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        rhs * self
    }
}

/// Axis-aligned rectangle given by its upper-left and lower-right corners.
///
/// Both corners are inclusive. Constructors do not validate corner ordering;
/// everything produced by this crate satisfies `upper_left <= lower_right`
/// on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub upper_left: Point,
    pub lower_right: Point,
}

impl Bounds {
    pub const fn new(upper_left: Point, lower_right: Point) -> Self {
        Self {
            upper_left,
            lower_right,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        !(p.x < self.upper_left.x
            || p.y < self.upper_left.y
            || p.x > self.lower_right.x
            || p.y > self.lower_right.y)
    }

    pub fn width(&self) -> i32 {
        self.lower_right.x - self.upper_left.x + 1
    }

    pub fn height(&self) -> i32 {
        self.lower_right.y - self.upper_left.y + 1
    }
}

/// 24-bit RGB color. Equality is exact and componentwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const DARK_GREY: Rgb = Rgb::new(6, 6, 6);
    pub const SLIGHTLY_DARKER_GREY: Rgb = Rgb::new(50, 50, 50);
    pub const LIGHT_GREY: Rgb = Rgb::new(75, 75, 75);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const DARKER_RED: Rgb = Rgb::new(200, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const DARKER_GREEN: Rgb = Rgb::new(0, 200, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const DARKER_CYAN: Rgb = Rgb::new(0, 225, 225);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);
    pub const DARKER_BLUE: Rgb = Rgb::new(0, 0, 200);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const BRIGHTER_BLUE: Rgb = Rgb::new(75, 75, 255);
    pub const PURPLE: Rgb = Rgb::new(255, 0, 255);
}

/// The sentinel character for [`DisplayTile`].
///
/// During compositing it means "advance the cursor without writing"; found
/// resident in the view buffer at flush time it renders as a blank space.
pub const SENTINEL: char = '\0';

/// A single renderable console cell: character plus fg/bg colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTile {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl DisplayTile {
    pub const fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Self { ch, fg, bg }
    }
}

impl Default for DisplayTile {
    fn default() -> Self {
        Self {
            ch: SENTINEL,
            fg: Rgb::BLACK,
            bg: Rgb::BLACK,
        }
    }
}

/// Anything that can be composited into the renderer's view buffer.
///
/// Width and height are derived from the bounds, never stored separately.
pub trait Renderable {
    /// The object's footprint in console coordinates (inclusive corners).
    fn bounds(&self) -> Bounds;

    /// The tile to show at a point in the object's local coordinate space.
    fn display_tile(&self, p: Point) -> DisplayTile;

    /// Convenience lookup by separate coordinates.
    fn display_tile_at(&self, x: i32, y: i32) -> DisplayTile {
        self.display_tile(Point::new(x, y))
    }

    fn width(&self) -> i32 {
        self.bounds().width()
    }

    fn height(&self) -> i32 {
        self.bounds().height()
    }
}
