//! The pathfinding controller.
//!
//! Owns the tile grid, the generated maze and the search engine, and wires
//! them to the outside world through three calls: [`Controller::initialize`]
//! generates a maze and restarts the search, [`Controller::advance`] steps
//! the search on a fixed game-time cadence, and [`Controller::render`]
//! emits one quad per tile.

use rand::Rng;
use xs_core::{Color, Point};
use xs_maze::{Maze, MazeError, MazeGen, TileGrid, TileKind};
use xs_paths::{SearchStatus, StepOutcome, StepSearch};

use crate::colors;
use crate::config::ClientConfig;
use crate::render::{Quad, Renderer, Viewport};

pub struct Controller<R: Rng> {
    config: ClientConfig,
    generator: MazeGen<R>,
    grid: TileGrid,
    search: StepSearch,
    maze: Option<Maze>,
    last_step: f64,
    path: Vec<Point>,
}

impl<R: Rng> Controller<R> {
    /// Allocate the grid described by `config`. No maze is generated until
    /// [`initialize`](Self::initialize) is called.
    pub fn new(config: ClientConfig, rng: R) -> Result<Self, MazeError> {
        let grid = TileGrid::build(config.grid_width, config.grid_height)?;
        let search = StepSearch::new(grid.bounds()).with_selection(config.selection());
        let generator = MazeGen::new(rng).with_max_attempts(config.max_attempts);
        Ok(Self {
            config,
            generator,
            grid,
            search,
            maze: None,
            last_step: 0.0,
            path: Vec::new(),
        })
    }

    /// Generate a new maze and restart the search from its start tile.
    ///
    /// On failure the previous search is discarded and the controller stays
    /// idle until the next successful call.
    pub fn initialize(&mut self) -> Result<Maze, MazeError> {
        self.maze = None;
        self.path.clear();
        let maze = match self.generator.generate(&mut self.grid) {
            Ok(maze) => maze,
            Err(err) => {
                self.search = StepSearch::new(self.grid.bounds())
                    .with_selection(self.config.selection());
                return Err(err);
            }
        };
        self.generator.branch(&mut self.grid, &maze, self.config.branches);
        for row in self.grid.print_maze().lines() {
            log::debug!("{row}");
        }
        self.begin(maze);
        Ok(maze)
    }

    /// Replace the grid with a prepared one and search it for `maze`.
    pub fn load(&mut self, grid: TileGrid, maze: Maze) {
        self.config.grid_width = grid.width();
        self.config.grid_height = grid.height();
        self.search = StepSearch::new(grid.bounds());
        self.grid = grid;
        self.path.clear();
        self.begin(maze);
    }

    fn begin(&mut self, maze: Maze) {
        self.search.set_selection(self.config.selection());
        if !self.search.reset(&self.grid, maze.start, maze.goal) {
            log::warn!("maze endpoints {} and {} lie off the grid", maze.start, maze.goal);
        }
        self.maze = Some(maze);
    }

    /// Step the search if more than the step interval has passed since the
    /// last step. `elapsed` is monotonic game time in milliseconds.
    ///
    /// Returns the step's outcome, or `None` if no step was due.
    pub fn advance(&mut self, elapsed: f64) -> Option<StepOutcome> {
        if self.last_step >= elapsed - self.config.step_interval {
            return None;
        }
        self.last_step = elapsed;
        Some(self.step())
    }

    /// Step the search once, ignoring the cadence.
    pub fn step(&mut self) -> StepOutcome {
        let outcome = self.search.step(&self.grid);
        if let StepOutcome::GoalReached(_) = outcome {
            self.path = self.search.path().unwrap_or_default();
            log::info!(
                "path of {} tiles found in {} steps",
                self.path.len(),
                self.search.steps()
            );
        }
        outcome
    }

    /// Step until the search stops or `max_steps` more steps have run.
    pub fn finish(&mut self, max_steps: usize) -> SearchStatus {
        for _ in 0..max_steps {
            if !self.search.status().is_searching() {
                break;
            }
            self.step();
        }
        self.search.status()
    }

    /// Emit one quad per tile in row-major order, scaled so the grid fills
    /// `viewport`.
    pub fn render<D: Renderer>(&self, viewport: Viewport, renderer: &mut D) {
        let cw = viewport.width as f32 / self.grid.width() as f32;
        let ch = viewport.height as f32 / self.grid.height() as f32;
        for tile in &self.grid {
            let p = tile.pos();
            renderer.draw_quad(Quad {
                x: p.x as f32 * cw,
                y: p.y as f32 * ch,
                width: cw,
                height: ch,
                color: self.tile_color(p, tile.kind),
            });
        }
    }

    fn tile_color(&self, p: Point, kind: TileKind) -> Color {
        match kind {
            TileKind::Wall => colors::WALL,
            TileKind::Start => colors::START,
            TileKind::Goal => colors::GOAL,
            TileKind::Blank if self.path.contains(&p) => colors::PATH,
            TileKind::Blank if self.search.is_open(p) => colors::OPEN,
            TileKind::Blank if self.search.is_closed(p) => colors::CLOSED,
            TileKind::Blank => colors::BLANK,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn search(&self) -> &StepSearch {
        &self.search
    }

    /// The current maze, if one has been generated or loaded.
    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    /// The route from start to goal once the search has found it.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Game time of the last step taken through [`advance`](Self::advance).
    pub fn last_step(&self) -> f64 {
        self.last_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use xs_core::Direction;
    use xs_maze::mapgen::wall_border;

    fn controller(seed: u64) -> Controller<StdRng> {
        Controller::new(ClientConfig::default(), StdRng::seed_from_u64(seed)).unwrap()
    }

    fn open_field() -> (TileGrid, Maze) {
        let mut grid = TileGrid::build(7, 7).unwrap();
        wall_border(&mut grid);
        let maze = Maze {
            start: Point::new(1, 1),
            goal: Point::new(5, 5),
            start_opening: Direction::North,
            goal_opening: Direction::South,
        };
        grid.set(maze.start, TileKind::Start);
        grid.set(maze.goal, TileKind::Goal);
        (grid, maze)
    }

    #[test]
    fn initialize_seeds_search() {
        let mut c = controller(1);
        assert!(c.maze().is_none());
        let maze = c.initialize().unwrap();
        assert_eq!(c.maze(), Some(&maze));
        assert_eq!(c.grid().count(TileKind::Start), 1);
        assert_eq!(c.grid().count(TileKind::Goal), 1);
        assert_eq!(c.search().status(), SearchStatus::Searching);
        assert_eq!(c.search().start(), Some(maze.start));
        assert_eq!(c.search().goal(), Some(maze.goal));
        assert!(c.search().is_open(maze.start));
        assert!(c.path().is_empty());
    }

    #[test]
    fn grid_too_small() {
        let mut config = ClientConfig::default();
        config.grid_width = 5;
        assert!(matches!(
            Controller::new(config.clone(), StdRng::seed_from_u64(0)),
            Err(MazeError::GridTooSmall { width: 5, .. })
        ));

        config.grid_width = 10;
        let mut c = Controller::new(config, StdRng::seed_from_u64(0)).unwrap();
        assert!(matches!(
            c.initialize(),
            Err(MazeError::GridTooSmall { min: 13, .. })
        ));
        assert!(c.maze().is_none());
        assert_eq!(c.advance(1000.0), Some(StepOutcome::Idle));
    }

    #[test]
    fn advance_is_gated_by_interval() {
        let mut c = controller(2);
        let maze = c.initialize().unwrap();
        assert_eq!(c.advance(100.0), None);
        assert_eq!(c.advance(250.0), None);
        assert_eq!(c.advance(251.0), Some(StepOutcome::Expanded(maze.start)));
        assert_eq!(c.last_step(), 251.0);
        assert_eq!(c.advance(400.0), None);
        assert_eq!(c.advance(501.0), None);
        assert!(c.advance(502.0).is_some());
        assert_eq!(c.search().steps(), 2);
    }

    #[test]
    fn searches_generated_mazes() {
        for seed in 0..30 {
            let mut c = controller(seed);
            let maze = c.initialize().unwrap();
            let limit = (c.grid().width() * c.grid().height()) as usize;
            assert_eq!(c.finish(limit), SearchStatus::Found, "seed {seed}");
            let path = c.path();
            assert_eq!(path.first(), Some(&maze.start));
            assert_eq!(path.last(), Some(&maze.goal));
            assert_eq!(path[1], maze.start_egress());
            assert_eq!(path[path.len() - 2], maze.goal_egress());
        }
    }

    #[test]
    fn branching_keeps_search_terminal() {
        let mut config = ClientConfig::default();
        config.branches = 40;
        config.greedy = true;
        for seed in 0..10 {
            let mut c = Controller::new(config.clone(), StdRng::seed_from_u64(seed)).unwrap();
            c.initialize().unwrap();
            let status = c.finish(10_000);
            assert!(matches!(status, SearchStatus::Found | SearchStatus::NoPath));
        }
    }

    #[test]
    fn open_field_reaches_goal() {
        let mut c = controller(0);
        let (grid, maze) = open_field();
        c.load(grid, maze);
        assert_eq!(c.config().grid_width, 7);
        assert_eq!(c.search().range(), c.grid().bounds());

        let mut steps = 0;
        while c.search().current() != Some(maze.goal) {
            c.step();
            steps += 1;
            assert!(steps <= 25, "goal not reached within 25 steps");
        }
        assert_eq!(c.search().status(), SearchStatus::Found);
        let path = c.path();
        assert_eq!(path.first(), Some(&maze.start));
        assert_eq!(path.last(), Some(&maze.goal));
        for w in path.windows(2) {
            assert!(Direction::from_delta(w[1] - w[0]).is_some());
        }
    }

    #[test]
    fn render_row_major() {
        let mut c = controller(4);
        let maze = c.initialize().unwrap();
        let mut quads: Vec<Quad> = Vec::new();
        c.render(Viewport::new(64, 18), &mut quads);
        assert_eq!(quads.len(), 32 * 18);
        for (i, q) in quads.iter().enumerate() {
            assert_eq!(q.x, (i % 32) as f32 * 2.0);
            assert_eq!(q.y, (i / 32) as f32);
            assert_eq!((q.width, q.height), (2.0, 1.0));
        }
        assert_eq!(quads[0].color, colors::WALL);
        let at = |p: Point| quads[(p.y * 32 + p.x) as usize].color;
        assert_eq!(at(maze.start), colors::START);
        assert_eq!(at(maze.goal), colors::GOAL);
        assert_eq!(at(maze.start_egress()), colors::BLANK);
    }

    #[test]
    fn render_highlights_search() {
        let mut c = controller(5);
        let maze = c.initialize().unwrap();
        c.step();
        let mut quads: Vec<Quad> = Vec::new();
        c.render(Viewport::new(32, 18), &mut quads);
        let at = |p: Point| quads[(p.y * 32 + p.x) as usize].color;
        assert!(c.search().is_closed(maze.start));
        assert_eq!(at(maze.start), colors::START);
        assert_eq!(at(maze.start_egress()), colors::OPEN);

        c.step();
        let mut quads: Vec<Quad> = Vec::new();
        c.render(Viewport::new(32, 18), &mut quads);
        let at = |p: Point| quads[(p.y * 32 + p.x) as usize].color;
        assert_eq!(at(maze.start_egress()), colors::CLOSED);
        let open = quads.iter().filter(|q| q.color == colors::OPEN).count();
        assert_eq!(open, c.search().open_len());

        c.finish(10_000);
        let mut quads: Vec<Quad> = Vec::new();
        c.render(Viewport::new(32, 18), &mut quads);
        let highlighted = quads.iter().filter(|q| q.color == colors::PATH).count();
        assert_eq!(highlighted, c.path().len() - 2);
    }

    #[test]
    fn restart_discards_previous_run() {
        let mut c = controller(6);
        c.initialize().unwrap();
        c.finish(10_000);
        assert!(!c.path().is_empty());
        let maze = c.initialize().unwrap();
        assert!(c.path().is_empty());
        assert_eq!(c.search().steps(), 0);
        assert_eq!(c.search().open_len(), 1);
        assert_eq!(c.search().closed_len(), 0);
        assert_eq!(c.grid().find(TileKind::Start), Some(maze.start));
    }
}
