use std::fmt;

/// Which special tile a placement attempt was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Start,
    Goal,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Goal => f.write_str("goal"),
        }
    }
}

/// Errors raised while building a grid or generating a maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// The grid is smaller than the operation supports.
    GridTooSmall { width: i32, height: i32, min: i32 },
    /// Rejection sampling found no acceptable tile within the attempt bound.
    PlacementExhausted { placement: Placement, attempts: u32 },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooSmall { width, height, min } => {
                write!(f, "grid {width}x{height} is too small (minimum {min}x{min})")
            }
            Self::PlacementExhausted { placement, attempts } => {
                write!(f, "could not place {placement} tile after {attempts} attempts")
            }
        }
    }
}

impl std::error::Error for MazeError {}
