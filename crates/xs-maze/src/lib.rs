//! Tile grid and maze generation.
//!
//! - [`TileGrid`]: a fixed-size arena of [`Tile`]s with 8-way neighbour
//!   resolution; implements the `xs-paths` pather traits so it can be
//!   searched directly.
//! - [`MazeGen`]: walls the border and places a single-opening Start and
//!   Goal tile, with bounded rejection sampling.

pub mod error;
pub mod grid;
pub mod mapgen;

pub use error::{MazeError, Placement};
pub use grid::{MIN_GRID_DIM, Tile, TileGrid, TileKind, UNMOVABLE};
pub use mapgen::{Maze, MazeGen, MIN_MAZE_DIM, MIN_SEPARATION, PADDING};
