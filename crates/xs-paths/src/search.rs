use xs_core::{Point, Range};

use crate::traits::AstarPather;

// ---------------------------------------------------------------------------
// Public state types
// ---------------------------------------------------------------------------

/// How the next frontier node is chosen from the open set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Lowest stored `f = g + h` (A*).
    #[default]
    FScore,
    /// Lowest goal estimate `h` only, ignoring accumulated cost (greedy
    /// best-first).
    Greedy,
}

/// Externally visible state of a [`StepSearch`].
///
/// Only `Searching` advances; the other three are idle states, with
/// `Found` and `NoPath` carrying the result of the last run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    Idle,
    Searching,
    Found,
    NoPath,
}

impl SearchStatus {
    /// Whether stepping has any effect.
    #[inline]
    pub fn is_searching(self) -> bool {
        self == SearchStatus::Searching
    }
}

/// Result of a single [`StepSearch::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepOutcome {
    /// The engine was not searching; nothing changed.
    Idle,
    /// The given node was closed and its neighbours examined.
    Expanded(Point),
    /// The goal was selected as the frontier; the search is over.
    GoalReached(Point),
    /// The open set ran dry without reaching the goal.
    NoPath,
}

// ---------------------------------------------------------------------------
// Internal node storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Membership {
    #[default]
    Unseen,
    Open,
    Closed,
    /// Was open when the goal was reached and the frontier was dropped.
    Dropped,
}

#[derive(Clone, Default)]
struct Node {
    g: i32,
    h: i32,
    parent: Option<usize>,
    membership: Membership,
    generation: u32,
}

impl Node {
    #[inline]
    fn f(&self) -> i32 {
        self.g.saturating_add(self.h)
    }
}

// ---------------------------------------------------------------------------
// StepSearch
// ---------------------------------------------------------------------------

/// An A*-style search that advances one expansion per [`step`](Self::step).
///
/// All per-run state (open and closed sets, `g`/`f` scores, predecessor
/// links) lives in flat node arrays indexed like the grid, so the state
/// stays consistent between externally paced steps. [`reset`](Self::reset)
/// starts a new run by bumping a generation counter instead of clearing
/// the arrays.
///
/// The open set keeps insertion order. Selection scans it front to back
/// and only a strictly lower score replaces the best candidate, so on
/// exact ties the earliest discovered node wins.
pub struct StepSearch {
    rng: Range,
    width: usize,
    nodes: Vec<Node>,
    generation: u32,
    open: Vec<usize>,
    closed: Vec<usize>,
    start: Option<usize>,
    goal: Option<usize>,
    current: Option<usize>,
    status: SearchStatus,
    selection: Selection,
    steps: usize,
    nbuf: Vec<Point>,
}

impl StepSearch {
    /// Create an idle search over the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        Self {
            rng,
            width: rng.width().max(0) as usize,
            nodes: vec![Node::default(); rng.len()],
            generation: 0,
            open: Vec::new(),
            closed: Vec::new(),
            start: None,
            goal: None,
            current: None,
            status: SearchStatus::Idle,
            selection: Selection::default(),
            steps: 0,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Set the frontier selection policy (builder).
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Change the frontier selection policy. Takes effect on the next step.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// The frontier selection policy.
    #[inline]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The grid rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Discard any previous run and start searching from `start` to `goal`.
    ///
    /// The start node is seeded into the open set with `g = 0`. Returns
    /// `false` and leaves the engine idle if either point lies outside the
    /// range.
    pub fn reset<P: AstarPather>(&mut self, pather: &P, start: Point, goal: Point) -> bool {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: stale nodes could alias the new generation.
            self.nodes.iter_mut().for_each(|n| *n = Node::default());
            self.generation = 1;
        }
        self.open.clear();
        self.closed.clear();
        self.current = None;
        self.steps = 0;
        self.start = None;
        self.goal = None;

        let (Some(si), Some(gi)) = (self.idx(start), self.idx(goal)) else {
            log::warn!("search reset outside {}: start {start}, goal {goal}", self.rng);
            self.status = SearchStatus::Idle;
            return false;
        };

        self.start = Some(si);
        self.goal = Some(gi);
        self.nodes[si] = Node {
            g: 0,
            h: pather.estimate(start, goal),
            parent: None,
            membership: Membership::Open,
            generation: self.generation,
        };
        self.open.push(si);
        self.status = SearchStatus::Searching;
        log::debug!("search reset: start {start}, goal {goal}");
        true
    }

    /// Advance the search by one expansion.
    ///
    /// Selects the best open node as `current`. If it is the goal the open
    /// set is dropped and the run ends with [`SearchStatus::Found`].
    /// Otherwise `current` is closed and each passable, unclosed neighbour
    /// is (re)scored through it when it is new to the open set or the new
    /// `g` is strictly better. Calling this while idle is a no-op.
    pub fn step<P: AstarPather>(&mut self, pather: &P) -> StepOutcome {
        if !self.status.is_searching() {
            return StepOutcome::Idle;
        }
        let (Some(pos), Some(goal)) = (self.select(), self.goal) else {
            self.status = SearchStatus::NoPath;
            return StepOutcome::NoPath;
        };

        let ci = self.open.remove(pos);
        let current_point = self.point(ci);
        self.current = Some(ci);
        self.steps += 1;

        if ci == goal {
            self.nodes[ci].membership = Membership::Dropped;
            for &i in &self.open {
                self.nodes[i].membership = Membership::Dropped;
            }
            self.open.clear();
            self.status = SearchStatus::Found;
            log::info!(
                "goal {current_point} reached after {} steps (g = {})",
                self.steps,
                self.nodes[ci].g
            );
            return StepOutcome::GoalReached(current_point);
        }

        self.nodes[ci].membership = Membership::Closed;
        self.closed.push(ci);
        let current_g = self.nodes[ci].g;
        let goal_point = self.point(goal);
        log::trace!(
            "step {}: expanding {current_point} (g = {current_g}, f = {})",
            self.steps,
            self.nodes[ci].f()
        );

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        pather.neighbors(current_point, &mut nbuf);

        for &np in nbuf.iter() {
            let Some(ni) = self.idx(np) else {
                continue;
            };
            let cur_gen = self.generation;
            let n = &mut self.nodes[ni];
            if n.generation != cur_gen {
                *n = Node {
                    generation: cur_gen,
                    ..Node::default()
                };
            }
            if n.membership == Membership::Closed {
                continue;
            }
            let tentative_g = current_g.saturating_add(pather.cost(current_point, np));
            let was_open = n.membership == Membership::Open;
            if was_open && tentative_g >= n.g {
                continue;
            }

            n.parent = Some(ci);
            n.g = tentative_g;
            n.h = pather.estimate(np, goal_point);
            if !was_open {
                n.membership = Membership::Open;
                self.open.push(ni);
            }
            log::trace!("  {np}: g = {}, f = {}", n.g, n.f());
        }

        self.nbuf = nbuf;

        if self.open.is_empty() {
            self.status = SearchStatus::NoPath;
            log::info!(
                "no path: open set exhausted after {} steps, {} nodes closed",
                self.steps,
                self.closed.len()
            );
            return StepOutcome::NoPath;
        }
        StepOutcome::Expanded(current_point)
    }

    /// Reconstruct the route from start to goal by following predecessor
    /// links back from the goal.
    ///
    /// Returns `None` unless the last run ended with [`SearchStatus::Found`].
    pub fn path(&self) -> Option<Vec<Point>> {
        if self.status != SearchStatus::Found {
            return None;
        }
        let mut path = Vec::new();
        let mut ci = self.goal;
        while let Some(i) = ci {
            path.push(self.point(i));
            ci = self.node(i).and_then(|n| n.parent);
        }
        path.reverse();
        Some(path)
    }

    /// Position in `open` of the best candidate under the current policy.
    fn select(&self) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (pos, &i) in self.open.iter().enumerate() {
            let node = &self.nodes[i];
            let score = match self.selection {
                Selection::FScore => node.f(),
                Selection::Greedy => node.h,
            };
            if best.is_none_or(|(_, s)| score < s) {
                best = Some((pos, score));
            }
        }
        best.map(|(pos, _)| pos)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current state.
    #[inline]
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Number of steps taken in this run.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Start of the current run.
    pub fn start(&self) -> Option<Point> {
        self.start.map(|i| self.point(i))
    }

    /// Goal of the current run.
    pub fn goal(&self) -> Option<Point> {
        self.goal.map(|i| self.point(i))
    }

    /// The node selected by the most recent step.
    pub fn current(&self) -> Option<Point> {
        self.current.map(|i| self.point(i))
    }

    /// Whether `p` is in the open set.
    pub fn is_open(&self, p: Point) -> bool {
        self.membership(p) == Membership::Open
    }

    /// Whether `p` is in the closed set.
    pub fn is_closed(&self, p: Point) -> bool {
        self.membership(p) == Membership::Closed
    }

    /// Whether `p` has been discovered in this run.
    pub fn is_discovered(&self, p: Point) -> bool {
        self.membership(p) != Membership::Unseen
    }

    /// Best known cost from start to `p`, for discovered nodes.
    pub fn g_score(&self, p: Point) -> Option<i32> {
        self.discovered(p).map(|n| n.g)
    }

    /// `g_score(p)` plus the goal estimate of `p`, for discovered nodes.
    pub fn f_score(&self, p: Point) -> Option<i32> {
        self.discovered(p).map(Node::f)
    }

    /// Predecessor of `p` on the best known route. `None` for the start
    /// node and for undiscovered nodes.
    pub fn came_from(&self, p: Point) -> Option<Point> {
        self.discovered(p)
            .and_then(|n| n.parent)
            .map(|i| self.point(i))
    }

    /// Number of open nodes.
    #[inline]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Number of closed nodes.
    #[inline]
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// Open nodes in insertion order.
    pub fn open_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.open.iter().map(|&i| self.point(i))
    }

    /// Closed nodes in the order they were closed.
    pub fn closed_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.closed.iter().map(|&i| self.point(i))
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    #[inline]
    fn node(&self, i: usize) -> Option<&Node> {
        let n = &self.nodes[i];
        (n.generation == self.generation && n.membership != Membership::Unseen).then_some(n)
    }

    fn discovered(&self, p: Point) -> Option<&Node> {
        self.idx(p).and_then(|i| self.node(i))
    }

    fn membership(&self, p: Point) -> Membership {
        self.discovered(p)
            .map_or(Membership::Unseen, |n| n.membership)
    }

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{chebyshev, heuristic};
    use crate::traits::{Pather, WeightedPather};
    use std::collections::HashSet;
    use xs_core::Direction;

    /// Open field with explicit walls; moves cost the heuristic distance.
    struct Field {
        rng: Range,
        walls: HashSet<Point>,
    }

    impl Field {
        fn new(w: i32, h: i32) -> Self {
            Self {
                rng: Range::new(0, 0, w, h),
                walls: HashSet::new(),
            }
        }

        fn wall(mut self, pts: &[(i32, i32)]) -> Self {
            self.walls.extend(pts.iter().map(|&(x, y)| Point::new(x, y)));
            self
        }

        fn passable(&self, p: Point) -> bool {
            self.rng.contains(p) && !self.walls.contains(&p)
        }
    }

    impl Pather for Field {
        fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
            for d in Direction::ALL {
                let n = p.step(d);
                if self.passable(n) {
                    buf.push(n);
                }
            }
        }
    }

    impl WeightedPather for Field {
        fn cost(&self, from: Point, to: Point) -> i32 {
            heuristic(from, to)
        }
    }

    impl AstarPather for Field {
        fn estimate(&self, from: Point, to: Point) -> i32 {
            heuristic(from, to)
        }
    }

    fn run(search: &mut StepSearch, field: &Field, limit: usize) -> StepOutcome {
        for _ in 0..limit {
            match search.step(field) {
                StepOutcome::Expanded(_) => continue,
                other => return other,
            }
        }
        panic!("search did not finish within {limit} steps");
    }

    fn check_invariants(search: &StepSearch) {
        let goal = search.goal().unwrap();
        let open: HashSet<Point> = search.open_points().collect();
        let closed: HashSet<Point> = search.closed_points().collect();
        assert!(open.is_disjoint(&closed));
        for p in open.iter().chain(closed.iter()) {
            let g = search.g_score(*p).unwrap();
            assert_eq!(search.f_score(*p), Some(g + heuristic(*p, goal)));
        }
    }

    #[test]
    fn reset_seeds_start() {
        let field = Field::new(8, 8);
        let mut search = StepSearch::new(field.rng);
        assert_eq!(search.status(), SearchStatus::Idle);
        assert!(search.reset(&field, Point::new(1, 1), Point::new(5, 4)));
        assert_eq!(search.status(), SearchStatus::Searching);
        assert_eq!(search.open_len(), 1);
        assert!(search.is_open(Point::new(1, 1)));
        assert_eq!(search.g_score(Point::new(1, 1)), Some(0));
        assert_eq!(search.f_score(Point::new(1, 1)), Some(6 + 4));
        assert_eq!(search.came_from(Point::new(1, 1)), None);
        assert_eq!(search.g_score(Point::new(2, 2)), None);
    }

    #[test]
    fn reset_outside_range_stays_idle() {
        let field = Field::new(4, 4);
        let mut search = StepSearch::new(field.rng);
        assert!(!search.reset(&field, Point::new(1, 1), Point::new(9, 9)));
        assert_eq!(search.status(), SearchStatus::Idle);
        assert_eq!(search.step(&field), StepOutcome::Idle);
    }

    #[test]
    fn step_while_idle_is_noop() {
        let field = Field::new(4, 4);
        let mut search = StepSearch::new(field.rng);
        assert_eq!(search.step(&field), StepOutcome::Idle);
        assert_eq!(search.steps(), 0);
        assert_eq!(search.current(), None);
    }

    #[test]
    fn first_expansion_scores_neighbours() {
        let field = Field::new(5, 5);
        let mut search = StepSearch::new(field.rng);
        search.reset(&field, Point::new(2, 2), Point::new(2, 0));
        assert_eq!(search.step(&field), StepOutcome::Expanded(Point::new(2, 2)));
        assert!(search.is_closed(Point::new(2, 2)));
        assert_eq!(search.open_len(), 8);
        // Diagonal moves cost 2, orthogonal 1.
        assert_eq!(search.g_score(Point::new(1, 1)), Some(2));
        assert_eq!(search.g_score(Point::new(2, 1)), Some(1));
        assert_eq!(search.came_from(Point::new(2, 1)), Some(Point::new(2, 2)));
        // Open set keeps compass discovery order.
        let first: Vec<Point> = search.open_points().take(2).collect();
        assert_eq!(first, vec![Point::new(1, 1), Point::new(2, 1)]);
        assert_eq!(search.step(&field), StepOutcome::Expanded(Point::new(2, 1)));
    }

    #[test]
    fn ties_go_to_first_discovered() {
        // East of the start is walled, so NE and SE tie on f = 4; NE is
        // discovered first in compass order.
        let field = Field::new(5, 5).wall(&[(3, 2)]);
        let mut search = StepSearch::new(field.rng);
        search.reset(&field, Point::new(2, 2), Point::new(4, 2));
        search.step(&field);
        assert_eq!(search.f_score(Point::new(3, 1)), Some(4));
        assert_eq!(search.f_score(Point::new(3, 3)), Some(4));
        assert_eq!(search.step(&field), StepOutcome::Expanded(Point::new(3, 1)));
    }

    #[test]
    fn greedy_selection_ignores_cost() {
        let field = Field::new(9, 3);
        let mut search = StepSearch::new(field.rng).with_selection(Selection::Greedy);
        assert_eq!(search.selection(), Selection::Greedy);
        search.reset(&field, Point::new(0, 1), Point::new(8, 1));
        let outcome = run(&mut search, &field, 64);
        assert_eq!(outcome, StepOutcome::GoalReached(Point::new(8, 1)));
        // Straight run east: one expansion per column plus the goal.
        assert_eq!(search.steps(), 9);
    }

    #[test]
    fn invariants_hold_every_step() {
        let field = Field::new(10, 8).wall(&[(4, 1), (4, 2), (4, 3), (4, 4), (4, 5), (4, 6)]);
        for selection in [Selection::FScore, Selection::Greedy] {
            let mut search = StepSearch::new(field.rng).with_selection(selection);
            search.reset(&field, Point::new(1, 3), Point::new(8, 3));
            loop {
                check_invariants(&search);
                match search.step(&field) {
                    StepOutcome::Expanded(_) => continue,
                    StepOutcome::GoalReached(_) => break,
                    other => panic!("unexpected outcome {other:?}"),
                }
            }
        }
    }

    #[test]
    fn goal_reached_then_idle() {
        let field = Field::new(7, 7);
        let mut search = StepSearch::new(field.rng);
        let (start, goal) = (Point::new(1, 1), Point::new(5, 5));
        search.reset(&field, start, goal);
        let outcome = run(&mut search, &field, 25);
        assert_eq!(outcome, StepOutcome::GoalReached(goal));
        assert_eq!(search.status(), SearchStatus::Found);
        assert_eq!(search.current(), Some(goal));
        assert_eq!(search.open_len(), 0);

        let (steps, closed) = (search.steps(), search.closed_len());
        assert_eq!(search.step(&field), StepOutcome::Idle);
        assert_eq!(search.steps(), steps);
        assert_eq!(search.closed_len(), closed);
        assert_eq!(search.current(), Some(goal));
    }

    #[test]
    fn path_follows_predecessors() {
        let field = Field::new(8, 6).wall(&[(3, 0), (3, 1), (3, 2), (3, 3), (3, 4)]);
        let mut search = StepSearch::new(field.rng);
        let (start, goal) = (Point::new(1, 1), Point::new(6, 1));
        search.reset(&field, start, goal);
        assert_eq!(search.path(), None);
        run(&mut search, &field, 48);

        let path = search.path().unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for w in path.windows(2) {
            assert_eq!(chebyshev(w[0], w[1]), 1);
            assert!(field.passable(w[1]));
        }
        // The wall forces the route through row 5.
        assert!(path.iter().any(|p| p.y == 5));
    }

    #[test]
    fn start_equals_goal() {
        let field = Field::new(3, 3);
        let mut search = StepSearch::new(field.rng);
        search.reset(&field, Point::new(1, 1), Point::new(1, 1));
        assert_eq!(search.step(&field), StepOutcome::GoalReached(Point::new(1, 1)));
        assert_eq!(search.path(), Some(vec![Point::new(1, 1)]));
    }

    #[test]
    fn walled_off_goal_exhausts_reachable_area() {
        // Goal at (6, 2) boxed in by walls.
        let field = Field::new(9, 5).wall(&[
            (5, 1), (6, 1), (7, 1),
            (5, 2), (7, 2),
            (5, 3), (6, 3), (7, 3),
        ]);
        let mut search = StepSearch::new(field.rng);
        search.reset(&field, Point::new(1, 2), Point::new(6, 2));
        let outcome = run(&mut search, &field, 100);
        assert_eq!(outcome, StepOutcome::NoPath);
        assert_eq!(search.status(), SearchStatus::NoPath);
        assert_eq!(search.open_len(), 0);
        assert_eq!(search.path(), None);

        let reachable: HashSet<Point> = field
            .rng
            .iter()
            .filter(|&p| field.passable(p) && p != Point::new(6, 2))
            .collect();
        let closed: HashSet<Point> = search.closed_points().collect();
        assert_eq!(closed, reachable);
        assert_eq!(search.step(&field), StepOutcome::Idle);
    }

    #[test]
    fn reset_discards_previous_run() {
        let field = Field::new(6, 6);
        let mut search = StepSearch::new(field.rng);
        search.reset(&field, Point::new(0, 0), Point::new(5, 5));
        run(&mut search, &field, 36);
        assert!(search.reset(&field, Point::new(5, 0), Point::new(0, 5)));
        assert_eq!(search.closed_len(), 0);
        assert_eq!(search.steps(), 0);
        assert!(!search.is_closed(Point::new(0, 0)));
        assert_eq!(search.g_score(Point::new(1, 1)), None);
        assert!(search.is_open(Point::new(5, 0)));
    }
}
