//! Pathfinding demo client.
//!
//! Generates a single-opening maze, then advances an A*-style search one
//! expansion per fixed game-time interval and draws its progress. The
//! [`Controller`] is independent of any back-end: it draws through the
//! [`Renderer`] trait, implemented for the terminal by [`TermRenderer`].

pub mod colors;
pub mod config;
pub mod console;
pub mod controller;
pub mod render;
pub mod term;
pub mod timer;

pub use config::{ClientConfig, ConfigError, DEFAULT_CONFIG};
pub use console::Console;
pub use controller::Controller;
pub use render::{Quad, Renderer, Viewport};
pub use term::{Command, TermRenderer};
pub use timer::{FrameClock, Timer};
