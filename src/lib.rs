//! Terminal minesweeper.
//!
//! The interesting parts live in two subsystems: [`field`], a chunked,
//! proportionally distributed mine generator with breadth-first flood
//! reveal, and [`term`], a view-buffer renderer that serializes frames to
//! the terminal with run-length suppression of color escapes. [`game`]
//! wires them together under a fixed-rate loop fed by a background input
//! collector.

pub mod field;
pub mod game;
pub mod input;
pub mod term;
pub mod types;
