//! Maze generation.
//!
//! [`MazeGen::generate`] walls the border of a [`TileGrid`], places a Start
//! and a Goal tile by rejection sampling inside a padded box, and seals
//! each of them behind walls except for a single random cardinal opening.
//! [`MazeGen::branch`] optionally grows extra wall segments afterwards.

use rand::{Rng, RngExt};
use xs_core::{Direction, Point};
use xs_paths::{chebyshev, manhattan};

use crate::error::{MazeError, Placement};
use crate::grid::{TileGrid, TileKind};

/// Smallest width or height [`MazeGen::generate`] accepts. From any start
/// inside the padded box some candidate is always at least
/// [`MIN_SEPARATION`] away, so placement cannot stall.
pub const MIN_MAZE_DIM: i32 = 13;

/// Start and Goal keep at least this many tiles from each edge.
pub const PADDING: i32 = 3;

/// Minimum Manhattan distance between Start and Goal.
pub const MIN_SEPARATION: i32 = 6;

/// Default bound on rejection-sampling attempts per placement.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Result of a successful generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Maze {
    pub start: Point,
    pub goal: Point,
    /// The sole non-wall neighbour direction of the start tile.
    pub start_opening: Direction,
    /// The sole non-wall neighbour direction of the goal tile.
    pub goal_opening: Direction,
}

impl Maze {
    /// The tile through which the search leaves the start.
    #[inline]
    pub fn start_egress(&self) -> Point {
        self.start.step(self.start_opening)
    }

    /// The tile through which the goal is entered.
    #[inline]
    pub fn goal_egress(&self) -> Point {
        self.goal.step(self.goal_opening)
    }
}

/// Maze generator driven by a caller-supplied random source.
pub struct MazeGen<R: Rng> {
    pub rng: R,
    max_attempts: u32,
}

impl<R: Rng> MazeGen<R> {
    /// Create a generator using `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Bound the rejection-sampling attempts per placement (builder).
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Generate a fresh maze into `grid`.
    ///
    /// Every tile is reset to blank first, so a grid may be regenerated in
    /// place. Fails with [`MazeError::GridTooSmall`] below
    /// [`MIN_MAZE_DIM`] and with [`MazeError::PlacementExhausted`] if a
    /// placement runs out of attempts.
    pub fn generate(&mut self, grid: &mut TileGrid) -> Result<Maze, MazeError> {
        if grid.width() < MIN_MAZE_DIM || grid.height() < MIN_MAZE_DIM {
            return Err(MazeError::GridTooSmall {
                width: grid.width(),
                height: grid.height(),
                min: MIN_MAZE_DIM,
            });
        }

        grid.fill(TileKind::Blank);
        wall_border(grid);

        let start = self.place(grid, Placement::Start, None)?;
        grid.set(start, TileKind::Start);
        let start_opening = self.open_one_side(grid, start);

        let goal = self.place(grid, Placement::Goal, Some(start))?;
        grid.set(goal, TileKind::Goal);
        let goal_opening = self.open_one_side(grid, goal);

        log::debug!(
            "maze generated: start {start} open {start_opening}, goal {goal} open {goal_opening}"
        );
        Ok(Maze {
            start,
            goal,
            start_opening,
            goal_opening,
        })
    }

    /// Sample interior coordinates until one satisfies the padding,
    /// separation and blank-tile constraints.
    fn place(
        &mut self,
        grid: &TileGrid,
        placement: Placement,
        away_from: Option<Point>,
    ) -> Result<Point, MazeError> {
        let (w, h) = (grid.width(), grid.height());
        for attempt in 1..=self.max_attempts {
            let p = Point::new(
                self.rng.random_range(1..w - 1),
                self.rng.random_range(1..h - 1),
            );
            if p.x < PADDING || p.x >= w - PADDING || p.y < PADDING || p.y >= h - PADDING {
                continue;
            }
            if away_from.is_some_and(|s| manhattan(p, s) < MIN_SEPARATION) {
                continue;
            }
            if grid.kind(p) != Some(TileKind::Blank) {
                continue;
            }
            log::debug!("{placement} placed at {p} after {attempt} attempts");
            return Ok(p);
        }
        log::warn!(
            "{placement} placement gave up after {} attempts on a {w}x{h} grid",
            self.max_attempts
        );
        Err(MazeError::PlacementExhausted {
            placement,
            attempts: self.max_attempts,
        })
    }

    /// Wall all eight neighbours of `p` except one random cardinal side,
    /// which is cleared. Returns the open side.
    pub fn open_one_side(&mut self, grid: &mut TileGrid, p: Point) -> Direction {
        let opening = Direction::CARDINAL[self.rng.random_range(0..Direction::CARDINAL.len())];
        for d in Direction::ALL {
            let kind = if d == opening {
                TileKind::Blank
            } else {
                TileKind::Wall
            };
            grid.set(p.step(d), kind);
        }
        opening
    }

    /// Grow extra wall structure: each iteration picks a random wall tile
    /// and extends a straight segment of 1 to 3 walls from it in a random
    /// cardinal direction.
    ///
    /// Segments only ever cover blank tiles and stop short of the start,
    /// the goal and the 3x3 area around each egress tile, so the single
    /// openings stay intact. Returns the number of walls added; zero
    /// iterations leave the grid untouched.
    pub fn branch(&mut self, grid: &mut TileGrid, maze: &Maze, iterations: u32) -> usize {
        let protected = [maze.start_egress(), maze.goal_egress()];
        let mut added = 0;
        for _ in 0..iterations {
            let walls: Vec<Point> = grid
                .iter()
                .filter(|t| t.kind == TileKind::Wall)
                .map(|t| t.pos())
                .collect();
            if walls.is_empty() {
                break;
            }
            let mut p = walls[self.rng.random_range(0..walls.len())];
            let d = Direction::CARDINAL[self.rng.random_range(0..Direction::CARDINAL.len())];
            let len = self.rng.random_range(1..=3);
            for _ in 0..len {
                p = p.step(d);
                if grid.kind(p) != Some(TileKind::Blank)
                    || protected.iter().any(|&e| chebyshev(p, e) <= 1)
                {
                    break;
                }
                grid.set(p, TileKind::Wall);
                added += 1;
            }
        }
        if iterations > 0 {
            log::debug!("branching: {added} walls added over {iterations} iterations");
        }
        added
    }
}

/// Set every tile on the outer ring of the grid to a wall.
pub fn wall_border(grid: &mut TileGrid) {
    let bounds = grid.bounds();
    for p in bounds.iter() {
        if bounds.on_edge(p) {
            grid.set(p, TileKind::Wall);
        }
    }
}
