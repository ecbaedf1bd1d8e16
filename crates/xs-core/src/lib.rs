//! **xs-core**: core types shared by the pathfinding workspace.
//!
//! This crate provides the geometry primitives used across the grid, maze
//! generator and search engine, plus the packed [`Color`] handed to
//! renderers.

pub mod geom;
pub mod style;

pub use geom::{Direction, Point, Range};
pub use style::Color;
