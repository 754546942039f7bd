//! Small renderables that share the view with the minefield.

use crate::types::{Bounds, DisplayTile, Point, Renderable, Rgb, SENTINEL};

/// A solid-color rectangle drawn at the bottom of the render stack.
#[derive(Debug, Clone, Copy)]
pub struct Background {
    pub size: Bounds,
    pub color: Rgb,
}

impl Renderable for Background {
    fn bounds(&self) -> Bounds {
        self.size
    }

    fn display_tile(&self, _p: Point) -> DisplayTile {
        DisplayTile::new(' ', Rgb::default(), self.color)
    }
}

/// A single-cell cursor renderable, replacing the hidden hardware cursor.
///
/// Blinking is done by the game loop swapping `ch` between a space and the
/// sentinel; with the sentinel in place the cursor simply isn't drawn.
#[derive(Debug, Clone, Copy)]
pub struct ScreenCursor {
    pub ch: char,
    pub position: Point,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl ScreenCursor {
    pub fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Self {
            ch,
            position: Point::default(),
            fg,
            bg,
        }
    }
}

impl Renderable for ScreenCursor {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.position)
    }

    fn display_tile(&self, _p: Point) -> DisplayTile {
        DisplayTile::new(self.ch, self.fg, self.bg)
    }
}

/// One row of text at a fixed origin. Cells past the string's end produce
/// the sentinel so whatever is underneath shows through.
#[derive(Debug, Clone, Default)]
pub struct TextLine {
    text: String,
    origin: Point,
    width: i32,
}

impl TextLine {
    pub fn new(origin: Point, width: i32) -> Self {
        Self {
            text: String::new(),
            origin,
            width,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Renderable for TextLine {
    fn bounds(&self) -> Bounds {
        Bounds::new(
            self.origin,
            Point::new(self.origin.x + self.width - 1, self.origin.y),
        )
    }

    fn display_tile(&self, p: Point) -> DisplayTile {
        let ch = if p.x >= 0 {
            self.text.chars().nth(p.x as usize).unwrap_or(SENTINEL)
        } else {
            SENTINEL
        };
        DisplayTile::new(ch, Rgb::WHITE, Rgb::BLACK)
    }
}

/// Arrow glyphs along the four edges of a bounds, hinting that the field
/// can be panned; the interior is left to whatever is underneath.
#[derive(Debug, Clone, Copy)]
pub struct PanningBorder {
    pub bounds: Bounds,
}

const LEFT_ARROW: char = '\u{2190}';
const UP_ARROW: char = '\u{2191}';
const RIGHT_ARROW: char = '\u{2192}';
const DOWN_ARROW: char = '\u{2193}';

impl PanningBorder {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    fn point_to_char(&self, p: Point) -> char {
        if p.x == self.bounds.upper_left.x {
            LEFT_ARROW
        } else if p.x == self.bounds.lower_right.x {
            RIGHT_ARROW
        } else if p.y == self.bounds.upper_left.y {
            UP_ARROW
        } else if p.y == self.bounds.lower_right.y {
            DOWN_ARROW
        } else {
            SENTINEL
        }
    }
}

impl Renderable for PanningBorder {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn display_tile(&self, p: Point) -> DisplayTile {
        DisplayTile::new(self.point_to_char(p), Rgb::WHITE, Rgb::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_fills_with_spaces() {
        let bg = Background {
            size: Bounds::new(Point::new(0, 0), Point::new(9, 4)),
            color: Rgb::DARK_GREY,
        };
        let tile = bg.display_tile(Point::new(3, 3));
        assert_eq!(tile.ch, ' ');
        assert_eq!(tile.bg, Rgb::DARK_GREY);
        assert_eq!(bg.width(), 10);
        assert_eq!(bg.height(), 5);
    }

    #[test]
    fn test_cursor_is_single_cell_at_position() {
        let mut cursor = ScreenCursor::new(' ', Rgb::BLACK, Rgb::WHITE);
        cursor.position = Point::new(7, 9);
        assert_eq!(
            cursor.bounds(),
            Bounds::new(Point::new(7, 9), Point::new(7, 9))
        );
        assert_eq!(cursor.width(), 1);
        assert_eq!(cursor.display_tile(Point::new(0, 0)).bg, Rgb::WHITE);
    }

    #[test]
    fn test_text_line_sentinel_past_end() {
        let mut text = TextLine::new(Point::new(35, 3), 16);
        text.set_text("FPS: 60");
        assert_eq!(text.display_tile(Point::new(0, 0)).ch, 'F');
        assert_eq!(text.display_tile(Point::new(6, 0)).ch, '0');
        assert_eq!(text.display_tile(Point::new(7, 0)).ch, SENTINEL);
        assert_eq!(
            text.bounds(),
            Bounds::new(Point::new(35, 3), Point::new(50, 3))
        );
    }

    #[test]
    fn test_panning_border_edges_and_interior() {
        let border = PanningBorder::new(Bounds::new(Point::new(0, 0), Point::new(10, 10)));
        assert_eq!(border.point_to_char(Point::new(0, 5)), LEFT_ARROW);
        assert_eq!(border.point_to_char(Point::new(10, 5)), RIGHT_ARROW);
        assert_eq!(border.point_to_char(Point::new(5, 0)), UP_ARROW);
        assert_eq!(border.point_to_char(Point::new(5, 10)), DOWN_ARROW);
        assert_eq!(border.point_to_char(Point::new(5, 5)), SENTINEL);
    }
}
