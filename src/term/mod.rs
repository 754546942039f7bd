//! Terminal rendering module.
//!
//! Renders into an in-memory view buffer that is serialized to the terminal
//! once per frame with run-length suppression of color escapes: within one
//! flush a color-set sequence is emitted only when the color changes from
//! the immediately preceding cell.

pub mod renderer;
pub mod view;
pub mod widgets;

pub use renderer::{encode_frame_into, ColorCache, ConsoleRenderer, Viewport};
pub use view::ViewBuffer;
pub use widgets::{Background, PanningBorder, ScreenCursor, TextLine};
