use xs_core::Point;

/// Minimal pathfinding interface: neighbour enumeration.
pub trait Pather {
    /// Append the passable neighbors of `p` into `buf`, in a stable order.
    /// The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// Pather with weighted (positive-cost) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Point, to: Point) -> i32;
}

/// Full A* pather with a goal-distance estimate.
pub trait AstarPather: WeightedPather {
    /// Heuristic estimate of distance from `from` to `to`.
    ///
    /// The estimate is not required to be admissible; an inflated estimate
    /// trades route optimality for fewer expansions.
    fn estimate(&self, from: Point, to: Point) -> i32;
}
