//! **gridplan-core** — core types for 2-D occupancy-grid path planning.
//!
//! This crate provides the foundational types shared by the planners in
//! `gridplan-paths`: the [`Cell`] coordinate, the [`Range`] rectangle and
//! the immutable occupancy [`Grid`].

pub mod geom;
pub mod grid;

pub use geom::{Cell, Range};
pub use grid::{BLOCKED, FREE, GOAL_MARKER, Grid, GridError, START_MARKER};
