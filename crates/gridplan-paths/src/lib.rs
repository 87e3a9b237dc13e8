//! Path planning on 2-D occupancy grids.
//!
//! Two planners restricted to axis-aligned single-cell moves:
//!
//! - **Weighted A\*** informed best-first search ([`Planner::astar`])
//! - **RRT** randomized incremental tree growth ([`Planner::rrt`])
//!
//! Both run through [`Planner`], which owns and reuses internal tables so
//! that repeated queries avoid reallocating, and both return a [`Plan`]:
//! an optional path plus a planner-specific exploration trace meant for
//! visualization.
//!
//! ```
//! use gridplan_core::{Cell, Grid};
//! use gridplan_paths::Planner;
//!
//! let grid = Grid::parse(
//!     "
//! ....
//! .##.
//! ....",
//! )
//! .unwrap();
//! let mut planner = Planner::new();
//! let plan = planner.astar(&grid, Cell::new(0, 0), Cell::new(2, 3));
//! assert_eq!(plan.steps(), Some(5));
//! ```

mod astar;
mod config;
mod distance;
mod neighbors;
mod plan;
mod planner;
mod rrt;
mod traits;

pub use config::{AstarConfig, ConfigError, RrtConfig};
pub use distance::manhattan;
pub use neighbors::{CARDINAL, Neighbors};
pub use plan::{AstarTrace, Plan, Pop, RrtTrace, Snapshots};
#[cfg(feature = "serde")]
pub use plan::TraceError;
pub use planner::Planner;
pub use rrt::{connect, steer};
pub use traits::{Occupancy, step_is_clear};
