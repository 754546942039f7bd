//! ConsoleRenderer: composites renderables into a view buffer and flushes
//! it to a terminal with minimal escape-sequence traffic.
//!
//! The flush path hand-emits the VT escape family (`ESC[38;2;R;G;Bm` and
//! friends) because the exact byte sequences are an external contract;
//! crossterm is used only for session setup (raw mode, alternate screen).

use std::collections::HashMap;
use std::io::{self, Write};

use anyhow::Result;
use crossterm::{cursor, style::ResetColor, terminal, QueueableCommand};

use crate::term::view::ViewBuffer;
use crate::types::{Bounds, Point, Renderable, Rgb, SENTINEL};

/// Actual terminal dimensions, queried once per frame by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Cache of pre-formatted `R;G;Bm` escape payloads, keyed by color.
///
/// Owned by the renderer instance; there is deliberately no process-global
/// cache.
#[derive(Debug, Default)]
pub struct ColorCache {
    payloads: HashMap<Rgb, String>,
}

impl ColorCache {
    /// Write a full color-set escape to `out`: the foreground or background
    /// introducer followed by the cached payload.
    pub fn write_escape<W: Write>(
        &mut self,
        out: &mut W,
        foreground: bool,
        color: Rgb,
    ) -> io::Result<()> {
        if foreground {
            out.write_all(b"\x1b[38;2;")?;
        } else {
            out.write_all(b"\x1b[48;2;")?;
        }
        let payload = self
            .payloads
            .entry(color)
            .or_insert_with(|| format!("{};{};{}m", color.r, color.g, color.b));
        out.write_all(payload.as_bytes())
    }
}

/// Renders an ordered stack of renderables to a terminal-like sink.
///
/// Generic over the sink so tests can flush into a `Vec<u8>`.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    view: ViewBuffer,
    colors: ColorCache,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout(width: u16, height: u16) -> Self {
        Self::new(width, height, io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(width: u16, height: u16, out: W) -> Self {
        Self {
            out,
            view: ViewBuffer::new(width, height),
            colors: ColorCache::default(),
        }
    }

    pub fn view(&self) -> &ViewBuffer {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewBuffer {
        &mut self.view
    }

    pub fn sink(&self) -> &W {
        &self.out
    }

    /// Reallocate the view buffer; prior contents are discarded and no
    /// stale-cell carryover is guaranteed across the resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.view.resize(width, height);
    }

    /// Enter the terminal session: raw mode, alternate screen, hidden
    /// cursor. Escape emission elsewhere is unconditional, so rendering
    /// still works if the terminal never negotiated VT processing.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.out.queue(terminal::EnterAlternateScreen)?;
        self.out.queue(cursor::Hide)?;
        self.out.queue(terminal::DisableLineWrap)?;
        self.out.flush()?;
        Ok(())
    }

    /// Restore the terminal session.
    pub fn exit(&mut self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(terminal::EnableLineWrap)?;
        self.out.queue(cursor::Show)?;
        self.out.queue(terminal::LeaveAlternateScreen)?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// The view bounds clipped to the physical terminal.
    ///
    /// The lower-right corner is `(min(view_w, vp_w), min(view_h, vp_h))`
    /// and is treated exclusively by the flush loop, so the renderer never
    /// writes past the terminal edge even when configured larger.
    pub fn view_bounds(&self, vp: Viewport) -> Bounds {
        let corner = Point::new(
            (self.view.width() as i32).min(vp.width as i32),
            (self.view.height() as i32).min(vp.height as i32),
        );
        Bounds::new(Point::new(0, 0), corner)
    }

    /// Composite a renderable into the view buffer.
    ///
    /// Visibility is an all-or-nothing test on the origin only: a
    /// renderable whose upper-left corner lies outside the current view
    /// bounds is skipped entirely, with no partial clipping. Within the
    /// pass, a sentinel tile advances the cursor without writing, and the
    /// end of each renderable row forces the cursor to the start of the
    /// next row so one object's wrap never bleeds into the next draw.
    /// Later draws overwrite earlier ones cell by cell.
    pub fn draw(&mut self, renderable: &dyn Renderable, vp: Viewport) {
        let origin = renderable.bounds().upper_left;
        if !self.view_bounds(vp).contains(origin) {
            return;
        }
        self.view.move_cursor(origin);
        let max_width = renderable.width().min(self.view.width() as i32 - 1);
        let max_height = renderable.height().min(self.view.height() as i32 - 1);
        for j in 0..max_height {
            for i in 0..max_width {
                let tile = renderable.display_tile_at(i, j);
                if tile.ch == SENTINEL {
                    self.view.skip();
                    continue;
                }
                self.view.write(tile);
            }
            let next_row = self.view.cursor().y + 1;
            self.view.move_cursor(Point::new(0, next_row));
        }
    }

    /// Serialize the view buffer to the sink and flush it.
    pub fn render(&mut self, vp: Viewport) -> Result<()> {
        let clip = self.view_bounds(vp).lower_right;
        encode_frame_into(&self.view, clip, &mut self.colors, &mut self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode one frame of `view` into `out`, clipped to the exclusive corner
/// `clip`, without flushing.
///
/// Emission order: save-cursor, move-to-origin, hide-cursor, the color
/// escapes for the first cell, then every cell in row-major order with
/// `\r\n` between rows (not after the last), then color reset and
/// restore-cursor. Within the frame a color escape is emitted only when the
/// color differs from the immediately preceding cell's; resident sentinel
/// characters are rendered as spaces.
pub fn encode_frame_into<W: Write>(
    view: &ViewBuffer,
    clip: Point,
    colors: &mut ColorCache,
    out: &mut W,
) -> io::Result<()> {
    let first = view.get(Point::new(0, 0)).unwrap_or_default();
    let mut last_fg = first.fg;
    let mut last_bg = first.bg;

    out.write_all(b"\x1b7")?; // Save cursor position
    out.write_all(b"\x1b[0;0H")?; // Cursor to origin
    out.write_all(b"\x1b[?25l")?; // Hide cursor
    colors.write_escape(out, true, last_fg)?;
    colors.write_escape(out, false, last_bg)?;

    let mut ch_buf = [0u8; 4];
    for j in 0..clip.y {
        for i in 0..clip.x {
            let mut tile = view.get(Point::new(i, j)).unwrap_or_default();
            if tile.ch == SENTINEL {
                tile.ch = ' ';
            }
            if tile.fg != last_fg {
                colors.write_escape(out, true, tile.fg)?;
                last_fg = tile.fg;
            }
            if tile.bg != last_bg {
                colors.write_escape(out, false, tile.bg)?;
                last_bg = tile.bg;
            }
            out.write_all(tile.ch.encode_utf8(&mut ch_buf).as_bytes())?;
        }
        if j != clip.y - 1 {
            out.write_all(b"\r\n")?;
        }
    }

    out.write_all(b"\x1b[0m")?; // Reset colors
    out.write_all(b"\x1b8")?; // Restore cursor position
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DisplayTile;

    fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle)
            .count()
    }

    fn uniform_view(width: u16, height: u16, ch: char) -> ViewBuffer {
        let mut view = ViewBuffer::new(width, height);
        for _ in 0..(width as u32 * height as u32) {
            view.write(DisplayTile::new(ch, Rgb::WHITE, Rgb::BLACK));
        }
        view
    }

    #[test]
    fn test_uniform_row_emits_one_color_escape_pair() {
        let view = uniform_view(3, 1, 'a');
        let mut colors = ColorCache::default();
        let mut out = Vec::new();
        encode_frame_into(&view, Point::new(3, 1), &mut colors, &mut out).unwrap();

        assert_eq!(count_occurrences(&out, b"\x1b[38;2;"), 1);
        assert_eq!(count_occurrences(&out, b"\x1b[48;2;"), 1);
    }

    #[test]
    fn test_color_change_emits_new_escape() {
        let mut view = ViewBuffer::new(3, 1);
        view.write(DisplayTile::new('a', Rgb::WHITE, Rgb::BLACK));
        view.write(DisplayTile::new('b', Rgb::RED, Rgb::BLACK));
        view.write(DisplayTile::new('c', Rgb::RED, Rgb::BLACK));

        let mut colors = ColorCache::default();
        let mut out = Vec::new();
        encode_frame_into(&view, Point::new(3, 1), &mut colors, &mut out).unwrap();

        // One for the first cell, one for the white->red change.
        assert_eq!(count_occurrences(&out, b"\x1b[38;2;"), 2);
        assert_eq!(count_occurrences(&out, b"\x1b[48;2;"), 1);
        assert!(count_occurrences(&out, b"\x1b[38;2;255;0;0m") == 1);
    }

    #[test]
    fn test_preamble_and_postamble_bytes() {
        let view = uniform_view(2, 1, 'a');
        let mut colors = ColorCache::default();
        let mut out = Vec::new();
        encode_frame_into(&view, Point::new(2, 1), &mut colors, &mut out).unwrap();

        assert!(out.starts_with(b"\x1b7\x1b[0;0H\x1b[?25l"));
        assert!(out.ends_with(b"\x1b[0m\x1b8"));
    }

    #[test]
    fn test_rows_separated_by_newline_except_last() {
        let view = uniform_view(2, 3, 'a');
        let mut colors = ColorCache::default();
        let mut out = Vec::new();
        encode_frame_into(&view, Point::new(2, 3), &mut colors, &mut out).unwrap();

        assert_eq!(count_occurrences(&out, b"\r\n"), 2);
    }

    #[test]
    fn test_resident_sentinel_renders_as_space() {
        // Untouched buffer cells hold the sentinel and must come out as
        // blanks.
        let view = ViewBuffer::new(2, 1);
        let mut colors = ColorCache::default();
        let mut out = Vec::new();
        encode_frame_into(&view, Point::new(2, 1), &mut colors, &mut out).unwrap();

        assert_eq!(count_occurrences(&out, b"  "), 1);
        assert_eq!(count_occurrences(&out, b"\0"), 0);
    }

    #[test]
    fn test_color_cache_reuses_payload() {
        let mut colors = ColorCache::default();
        let mut out = Vec::new();
        colors.write_escape(&mut out, true, Rgb::new(1, 2, 3)).unwrap();
        colors.write_escape(&mut out, false, Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(out, b"\x1b[38;2;1;2;3m\x1b[48;2;1;2;3m");
        assert_eq!(colors.payloads.len(), 1);
    }

    struct Patch {
        bounds: Bounds,
        tile: DisplayTile,
    }

    impl Renderable for Patch {
        fn bounds(&self) -> Bounds {
            self.bounds
        }

        fn display_tile(&self, _p: Point) -> DisplayTile {
            self.tile
        }
    }

    #[test]
    fn test_draw_skips_renderable_with_origin_outside_view() {
        let mut renderer = ConsoleRenderer::new(10, 10, Vec::new());
        let before = renderer.view().clone();

        let patch = Patch {
            bounds: Bounds::new(Point::new(20, 20), Point::new(25, 25)),
            tile: DisplayTile::new('#', Rgb::WHITE, Rgb::BLACK),
        };
        renderer.draw(&patch, Viewport::new(10, 10));

        for y in 0..10 {
            for x in 0..10 {
                let p = Point::new(x, y);
                assert_eq!(renderer.view().get(p), before.get(p));
            }
        }
    }

    #[test]
    fn test_draw_writes_clamped_extent() {
        let mut renderer = ConsoleRenderer::new(10, 10, Vec::new());
        let patch = Patch {
            bounds: Bounds::new(Point::new(1, 1), Point::new(3, 2)),
            tile: DisplayTile::new('#', Rgb::WHITE, Rgb::BLACK),
        };
        renderer.draw(&patch, Viewport::new(10, 10));

        assert_eq!(renderer.view().get(Point::new(1, 1)).unwrap().ch, '#');
        assert_eq!(renderer.view().get(Point::new(3, 1)).unwrap().ch, '#');
        // Rows after the first start at column 0: the end-of-row cursor
        // move targets the start of the next view row, not the origin
        // column.
        assert_eq!(renderer.view().get(Point::new(0, 2)).unwrap().ch, '#');
        assert_eq!(renderer.view().get(Point::new(2, 2)).unwrap().ch, '#');
        // One past the renderable's extent stays untouched.
        assert_eq!(renderer.view().get(Point::new(4, 1)), Some(DisplayTile::default()));
        assert_eq!(renderer.view().get(Point::new(1, 3)), Some(DisplayTile::default()));
    }

    #[test]
    fn test_draw_sentinel_leaves_underlying_cell() {
        struct Checker;
        impl Renderable for Checker {
            fn bounds(&self) -> Bounds {
                Bounds::new(Point::new(0, 0), Point::new(3, 0))
            }

            fn display_tile(&self, p: Point) -> DisplayTile {
                if p.x % 2 == 0 {
                    DisplayTile::new(SENTINEL, Rgb::WHITE, Rgb::BLACK)
                } else {
                    DisplayTile::new('#', Rgb::WHITE, Rgb::BLACK)
                }
            }
        }

        let mut renderer = ConsoleRenderer::new(10, 10, Vec::new());
        let base = Patch {
            bounds: Bounds::new(Point::new(0, 0), Point::new(5, 0)),
            tile: DisplayTile::new('.', Rgb::WHITE, Rgb::BLACK),
        };
        renderer.draw(&base, Viewport::new(10, 10));
        renderer.draw(&Checker, Viewport::new(10, 10));

        // Sentinel positions keep the earlier draw; others are overwritten.
        assert_eq!(renderer.view().get(Point::new(0, 0)).unwrap().ch, '.');
        assert_eq!(renderer.view().get(Point::new(1, 0)).unwrap().ch, '#');
        assert_eq!(renderer.view().get(Point::new(2, 0)).unwrap().ch, '.');
        assert_eq!(renderer.view().get(Point::new(3, 0)).unwrap().ch, '#');
    }

    #[test]
    fn test_later_draws_win_per_cell() {
        let mut renderer = ConsoleRenderer::new(10, 10, Vec::new());
        let under = Patch {
            bounds: Bounds::new(Point::new(0, 0), Point::new(4, 4)),
            tile: DisplayTile::new('u', Rgb::WHITE, Rgb::BLACK),
        };
        let over = Patch {
            bounds: Bounds::new(Point::new(2, 2), Point::new(3, 3)),
            tile: DisplayTile::new('o', Rgb::WHITE, Rgb::BLACK),
        };
        renderer.draw(&under, Viewport::new(10, 10));
        renderer.draw(&over, Viewport::new(10, 10));

        assert_eq!(renderer.view().get(Point::new(1, 1)).unwrap().ch, 'u');
        assert_eq!(renderer.view().get(Point::new(2, 2)).unwrap().ch, 'o');
    }

    #[test]
    fn test_view_bounds_clip_to_viewport() {
        let renderer = ConsoleRenderer::new(100, 50, Vec::new());
        let bounds = renderer.view_bounds(Viewport::new(80, 24));
        assert_eq!(bounds.lower_right, Point::new(80, 24));

        let bounds = renderer.view_bounds(Viewport::new(120, 60));
        assert_eq!(bounds.lower_right, Point::new(100, 50));
    }
}
