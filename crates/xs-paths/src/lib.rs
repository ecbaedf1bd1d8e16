//! Steppable pathfinding for grid-based games.
//!
//! The centrepiece is [`StepSearch`], an A*-style search whose state (open
//! and closed sets, score maps, predecessor links) persists between calls so
//! that it can be advanced one expansion at a time, e.g. once per timer tick
//! while a renderer shows its progress.
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | passable neighbours, in a stable order |
//! | [`WeightedPather`] : [`Pather`] | per-move cost |
//! | [`AstarPather`] : [`WeightedPather`] | goal-distance estimate |

mod distance;
mod search;
mod traits;

pub use distance::{chebyshev, heuristic, manhattan};
pub use search::{SearchStatus, Selection, StepOutcome, StepSearch};
pub use traits::{AstarPather, Pather, WeightedPather};
