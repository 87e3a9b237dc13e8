use gridplan_core::Cell;
use log::{debug, warn};

use crate::distance::manhattan;
use crate::plan::{AstarTrace, Plan};
use crate::planner::{Entry, NO_PARENT, OpenRef, Planner};
use crate::traits::Occupancy;

/// `g + w * h`, saturating at `i32::MAX` so huge weights cannot overflow.
#[inline]
fn f_cost(g: i32, weight: i32, c: Cell, goal: Cell) -> i32 {
    weight.saturating_mul(manhattan(c, goal)).saturating_add(g)
}

impl Planner {
    /// Search from `start` to `goal` with weighted A*.
    ///
    /// Entries are ordered by `f = g + w * h`, where `g` is the number of
    /// steps taken, `h` the Manhattan distance to `goal` and `w` the
    /// configured [`heuristic_weight`](crate::AstarConfig::heuristic_weight).
    /// Equal `f` pops first-in first-out. Neighbors are queued down, up,
    /// right, left.
    ///
    /// Returns the path (both endpoints included) of the first entry for
    /// `goal` to leave the open set, or `None` if the open set runs dry, an
    /// endpoint is blocked or out of bounds, or the expansion cap is hit.
    pub fn astar<G: Occupancy + ?Sized>(
        &mut self,
        grid: &G,
        start: Cell,
        goal: Cell,
    ) -> Plan<AstarTrace> {
        let mut trace = AstarTrace::default();

        if let Err(err) = self.astar_config.validate() {
            warn!("astar: invalid config: {err}");
            return Plan::failed(trace);
        }
        if !grid.is_free(start) || !grid.is_free(goal) {
            debug!("astar: endpoint blocked or out of bounds ({start} -> {goal})");
            return Plan::failed(trace);
        }

        self.prepare(grid.bounds());
        let cur_gen = self.next_astar_generation();
        let weight = self.astar_config.heuristic_weight;
        let cap = self.astar_config.max_expansions;

        self.entries.clear();
        self.entries.push(Entry {
            cell: start,
            g: 0,
            parent: NO_PARENT,
        });
        let mut open = std::mem::take(&mut self.open);
        open.clear();
        open.push(OpenRef {
            f: f_cost(0, weight, start, goal),
            seq: 0,
        });

        let mut nbrs = std::mem::take(&mut self.nbrs);
        let mut pops = 0usize;

        let found = 'search: loop {
            if cap.is_some_and(|cap| pops >= cap) {
                warn!("astar: gave up after {pops} expansions ({start} -> {goal})");
                break 'search None;
            }
            let Some(current) = open.pop() else {
                break 'search None;
            };
            pops += 1;

            let Entry { cell, g, .. } = self.entries[current.seq];
            trace.record_pop(cell, current.f);

            if cell == goal {
                break 'search Some(current.seq);
            }

            let Some(ci) = self.idx(cell) else {
                continue;
            };
            if self.closed[ci] == cur_gen {
                // Already finalized; the pop is still recorded.
                trace.mark();
                continue;
            }
            self.closed[ci] = cur_gen;
            trace.close(cell);
            trace.mark();

            for &n in nbrs.cardinal(cell, |n| grid.is_free(n)) {
                let Some(ni) = self.idx(n) else {
                    continue;
                };
                if self.closed[ni] == cur_gen {
                    continue;
                }
                let seq = self.entries.len();
                self.entries.push(Entry {
                    cell: n,
                    g: g + 1,
                    parent: current.seq,
                });
                open.push(OpenRef {
                    f: f_cost(g + 1, weight, n, goal),
                    seq,
                });
            }
        };

        open.clear();
        self.open = open;
        self.nbrs = nbrs;

        let Some(mut ei) = found else {
            debug!(
                "astar: no path {start} -> {goal} ({} cells closed)",
                trace.closed_order().len()
            );
            return Plan::failed(trace);
        };

        // Reconstruct path.
        let mut path = Vec::with_capacity(self.entries[ei].g as usize + 1);
        while ei != NO_PARENT {
            let e = &self.entries[ei];
            path.push(e.cell);
            ei = e.parent;
        }
        path.reverse();

        debug!(
            "astar: {start} -> {goal} in {} steps ({} pops)",
            path.len() - 1,
            pops
        );
        Plan {
            path: Some(path),
            trace,
        }
    }
}
