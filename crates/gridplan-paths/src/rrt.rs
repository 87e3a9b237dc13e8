//! Rapidly-exploring random tree restricted to unit grid steps.
//!
//! Each round samples a target cell (the goal itself with probability
//! [`goal_bias`](crate::RrtConfig::goal_bias)), finds the tree cell
//! nearest to it and grows one step from there toward the target.

use gridplan_core::Cell;
use log::{debug, trace, warn};
use rand::{Rng, RngExt};

use crate::distance::manhattan;
use crate::plan::{Plan, RrtTrace};
use crate::planner::Planner;
use crate::traits::{Occupancy, step_is_clear};

/// One grid step from `from` toward `target`.
///
/// Moves vertically when `|Δrow| > |Δcol|`, horizontally otherwise (ties
/// included). The sign follows the delta; a zero delta steps left.
pub fn steer(from: Cell, target: Cell) -> Cell {
    let dr = target.row - from.row;
    let dc = target.col - from.col;
    if dr.abs() > dc.abs() {
        if dr > 0 { from.shift(1, 0) } else { from.shift(-1, 0) }
    } else if dc > 0 {
        from.shift(0, 1)
    } else {
        from.shift(0, -1)
    }
}

/// The cells visited by repeatedly steering from `from` to `to`, excluding
/// `from` and ending with `to`. `None` if any of them is not free.
pub fn connect<G: Occupancy + ?Sized>(grid: &G, from: Cell, to: Cell) -> Option<Vec<Cell>> {
    let mut cells = Vec::with_capacity(manhattan(from, to) as usize);
    let mut cur = from;
    while cur != to {
        let next = steer(cur, to);
        if !step_is_clear(grid, cur, next) {
            return None;
        }
        cells.push(next);
        cur = next;
    }
    Some(cells)
}

/// Index and cell of the tree node closest to `target`; the earliest
/// inserted wins ties.
fn nearest(tree: &[Cell], target: Cell) -> Option<(usize, Cell)> {
    tree.iter()
        .copied()
        .enumerate()
        .min_by_key(|&(_, c)| manhattan(c, target))
}

impl Planner {
    /// Grow a random tree from `start` until it reaches `goal` or the
    /// iteration budget runs out.
    ///
    /// Every round consumes one iteration, whether or not it extends the
    /// tree. A round's extension is dropped if the stepped-to cell is out
    /// of bounds, blocked, or already in the tree. After each accepted
    /// extension the whole tree is recorded in the trace.
    ///
    /// When an accepted cell lies within
    /// [`goal_threshold`](crate::RrtConfig::goal_threshold) of `goal` and
    /// the steered line to it is clear, `goal` joins the tree under that
    /// cell and the root-to-goal branch is returned. The path always ends
    /// with a single `goal` and moves one cell at a time.
    ///
    /// A blocked or out-of-bounds endpoint fails immediately with an empty
    /// trace. Results depend on `rng`; a seeded generator reproduces a
    /// run exactly.
    pub fn rrt<G, R>(&mut self, grid: &G, start: Cell, goal: Cell, rng: &mut R) -> Plan<RrtTrace>
    where
        G: Occupancy + ?Sized,
        R: Rng + ?Sized,
    {
        let mut tr = RrtTrace::default();

        if let Err(err) = self.rrt_config.validate() {
            warn!("rrt: invalid config: {err}");
            return Plan::failed(tr);
        }
        if !grid.is_free(start) || !grid.is_free(goal) {
            debug!("rrt: endpoint blocked or out of bounds ({start} -> {goal})");
            return Plan::failed(tr);
        }

        let bounds = grid.bounds();
        self.prepare(bounds);
        let cur_gen = self.next_rrt_generation();
        let config = self.rrt_config;

        let Some(si) = self.idx(start) else {
            return Plan::failed(tr);
        };
        self.in_tree[si] = cur_gen;
        tr.insert(start, None);

        // The root may already be close enough (always when start == goal).
        if let Some(path) = self.rrt_finish(grid, &mut tr, 0, goal, cur_gen) {
            debug!("rrt: {start} -> {goal} connected from the root");
            return Plan {
                path: Some(path),
                trace: tr,
            };
        }

        for iteration in 0..config.max_iterations {
            let target = if rng.random_bool(config.goal_bias) {
                goal
            } else {
                Cell::new(
                    rng.random_range(bounds.min.row..bounds.max.row),
                    rng.random_range(bounds.min.col..bounds.max.col),
                )
            };
            if !grid.is_free(target) {
                continue;
            }

            let Some((near_i, near)) = nearest(tr.tree(), target) else {
                break;
            };
            let next = steer(near, target);
            if !step_is_clear(grid, near, next) {
                continue;
            }
            let Some(ni) = self.idx(next) else {
                continue;
            };
            if self.in_tree[ni] == cur_gen {
                continue;
            }

            self.in_tree[ni] = cur_gen;
            let next_i = tr.insert(next, Some(near_i));
            tr.mark();
            trace!("rrt: round {iteration}: {near} -> {next}");

            if let Some(path) = self.rrt_finish(grid, &mut tr, next_i, goal, cur_gen) {
                debug!(
                    "rrt: {start} -> {goal} in {} steps after {} rounds ({} nodes)",
                    path.len() - 1,
                    iteration + 1,
                    tr.tree().len()
                );
                return Plan {
                    path: Some(path),
                    trace: tr,
                };
            }
        }

        debug!(
            "rrt: no path {start} -> {goal} after {} rounds ({} nodes)",
            config.max_iterations,
            tr.tree().len()
        );
        Plan::failed(tr)
    }

    /// Try to finish a run from the tree node at `node_i`.
    ///
    /// Succeeds when the node is within the goal threshold and the steered
    /// line to `goal` is clear. `goal` is then hung off the node (unless it
    /// is the node) and the root-to-goal path returned.
    fn rrt_finish<G: Occupancy + ?Sized>(
        &mut self,
        grid: &G,
        tr: &mut RrtTrace,
        node_i: usize,
        goal: Cell,
        cur_gen: u32,
    ) -> Option<Vec<Cell>> {
        let node = tr.tree()[node_i];
        if manhattan(node, goal) >= self.rrt_config.goal_threshold {
            return None;
        }
        let bridge = connect(grid, node, goal)?;
        if node != goal {
            // Goal cannot be in the tree yet: it would have finished the
            // run when it was added.
            if let Some(gi) = self.idx(goal) {
                self.in_tree[gi] = cur_gen;
            }
            tr.insert(goal, Some(node_i));
        }
        let mut path = tr.branch(node_i);
        path.extend(bridge);
        Some(path)
    }
}
