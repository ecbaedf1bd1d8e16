//! Tile colour palette.

use xs_core::Color;

/// Blank, unexplored floor. Renderers leave it undrawn.
pub const BLANK: Color = Color::DEFAULT;
/// Wall, grey.
pub const WALL: Color = Color::from_rgb(128, 128, 128);
/// Start, green.
pub const START: Color = Color::from_rgb(80, 200, 80);
/// Goal, red.
pub const GOAL: Color = Color::from_rgb(255, 85, 85);

/// Blank tile waiting in the open set.
pub const OPEN: Color = Color::from_rgb(80, 210, 210);
/// Blank tile already in the closed set.
pub const CLOSED: Color = Color::from_rgb(100, 130, 255);
/// Blank tile on the reconstructed route.
pub const PATH: Color = Color::from_rgb(220, 200, 60);

/// Console text.
pub const CONSOLE_FG: Color = Color::from_rgb(248, 248, 242);
