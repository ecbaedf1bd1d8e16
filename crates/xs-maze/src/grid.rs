//! The tile grid the maze is carved into and the search runs over.
//!
//! [`TileGrid`] owns every [`Tile`] in one contiguous row-major arena.
//! Neighbours are never stored as references: they are resolved on demand
//! from coordinates, and a neighbour that would fall off the grid is simply
//! `None`.

use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

use xs_core::{Direction, Point, Range};
use xs_paths::{AstarPather, Pather, WeightedPather, heuristic};

use crate::error::MazeError;

/// Smallest width or height [`TileGrid::build`] accepts.
pub const MIN_GRID_DIM: i32 = 7;

/// Cost sentinel for a direction that leads off the grid.
pub const UNMOVABLE: i32 = i32::MAX;

/// What occupies a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    #[default]
    Blank,
    Wall,
    Start,
    Goal,
}

impl TileKind {
    /// Two-character text form used by [`TileGrid::print_maze`].
    pub const fn glyph(self) -> &'static str {
        match self {
            TileKind::Blank => "  ",
            TileKind::Wall => "# ",
            TileKind::Start => "S ",
            TileKind::Goal => "G ",
        }
    }

    /// Whether the search may enter a tile of this kind.
    #[inline]
    pub const fn is_passable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }
}

/// A single grid cell.
///
/// Identity is the coordinate: two tiles compare equal iff their positions
/// match, whatever their kind.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pos: Point,
    pub kind: TileKind,
    cost: [i32; 8],
}

impl Tile {
    /// Grid coordinate of this tile.
    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Cost of moving one step in direction `d`, or [`UNMOVABLE`] at the
    /// grid edge. Lower is more favourable.
    #[inline]
    pub fn cost(&self, d: Direction) -> i32 {
        self.cost[d.index()]
    }

    /// Whether the tile has a neighbour in direction `d`.
    #[inline]
    pub fn can_move(&self, d: Direction) -> bool {
        self.cost(d) != UNMOVABLE
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.hash(state);
    }
}

/// A fixed-size grid of tiles.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Allocate a `width` x `height` grid of blank tiles.
    ///
    /// Each tile's direction costs are precomputed from the search
    /// heuristic (1 orthogonal, 2 diagonal), with [`UNMOVABLE`] on edges.
    pub fn build(width: i32, height: i32) -> Result<Self, MazeError> {
        if width < MIN_GRID_DIM || height < MIN_GRID_DIM {
            return Err(MazeError::GridTooSmall {
                width,
                height,
                min: MIN_GRID_DIM,
            });
        }
        let bounds = Range::new(0, 0, width, height);
        let tiles = bounds
            .iter()
            .map(|pos| {
                let mut cost = [UNMOVABLE; 8];
                for d in Direction::ALL {
                    let n = pos.step(d);
                    if bounds.contains(n) {
                        cost[d.index()] = heuristic(pos, n);
                    }
                }
                Tile {
                    pos,
                    kind: TileKind::Blank,
                    cost,
                }
            })
            .collect();
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Width in tiles.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The bounding range, `(0, 0)` to `(width, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Whether `p` lies on the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        self.contains(p)
            .then(|| (p.y * self.width + p.x) as usize)
    }

    /// The tile at `p`, or `None` off the grid.
    #[inline]
    pub fn tile(&self, p: Point) -> Option<&Tile> {
        self.index(p).map(|i| &self.tiles[i])
    }

    /// The kind of the tile at `p`, or `None` off the grid.
    #[inline]
    pub fn kind(&self, p: Point) -> Option<TileKind> {
        self.tile(p).map(|t| t.kind)
    }

    /// Set the kind of the tile at `p`. No-op off the grid.
    pub fn set(&mut self, p: Point, kind: TileKind) {
        if let Some(i) = self.index(p) {
            self.tiles[i].kind = kind;
        }
    }

    /// Set every tile to `kind`.
    pub fn fill(&mut self, kind: TileKind) {
        for t in &mut self.tiles {
            t.kind = kind;
        }
    }

    /// The tile adjacent to `tile` in direction `d`, or `None` at the edge.
    pub fn neighbour_of(&self, tile: &Tile, d: Direction) -> Option<&Tile> {
        if !tile.can_move(d) {
            return None;
        }
        self.tile(tile.pos.step(d))
    }

    /// All eight neighbours of `p` in compass order; `None` where off-grid.
    pub fn neighbours(&self, p: Point) -> [Option<&Tile>; 8] {
        Direction::ALL.map(|d| self.tile(p.step(d)))
    }

    /// Count tiles of the given kind.
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }

    /// Position of the first tile (row-major) of the given kind.
    pub fn find(&self, kind: TileKind) -> Option<Point> {
        self.tiles.iter().find(|t| t.kind == kind).map(|t| t.pos)
    }

    /// Row-major iterator over all tiles.
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    /// Text dump of the grid, one line per row.
    pub fn print_maze(&self) -> String {
        let mut s = String::with_capacity(self.tiles.len() * 2 + self.height as usize);
        for row in self.tiles.chunks(self.width as usize) {
            for t in row {
                s.push_str(t.kind.glyph());
            }
            let _ = writeln!(s);
        }
        s
    }
}

impl<'a> IntoIterator for &'a TileGrid {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Search adapters
// ---------------------------------------------------------------------------

impl Pather for TileGrid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        let Some(tile) = self.tile(p) else {
            return;
        };
        for d in Direction::ALL {
            if let Some(n) = self.neighbour_of(tile, d) {
                if n.kind.is_passable() {
                    buf.push(n.pos);
                }
            }
        }
    }
}

impl WeightedPather for TileGrid {
    fn cost(&self, from: Point, to: Point) -> i32 {
        match (self.tile(from), Direction::from_delta(to - from)) {
            (Some(tile), Some(d)) => tile.cost(d),
            _ => heuristic(from, to),
        }
    }
}

impl AstarPather for TileGrid {
    fn estimate(&self, from: Point, to: Point) -> i32 {
        heuristic(from, to)
    }
}
