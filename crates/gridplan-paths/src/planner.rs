use gridplan_core::{Cell, Range};

use crate::config::{AstarConfig, RrtConfig};
use crate::neighbors::Neighbors;

// ---------------------------------------------------------------------------
// Internal A* open-set entries
// ---------------------------------------------------------------------------

/// Sentinel parent index for a search root.
pub(crate) const NO_PARENT: usize = usize::MAX;

/// One open-set entry. Entries live in an append-only arena and link to
/// the entry they were expanded from, so each carries its own path.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Entry {
    pub(crate) cell: Cell,
    pub(crate) g: i32,
    pub(crate) parent: usize,
}

/// Reference into the entry arena, ordered by `f` then arena index.
///
/// The arena index doubles as the insertion sequence, so entries with
/// equal `f` pop first-in first-out.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct OpenRef {
    pub(crate) f: i32,
    pub(crate) seq: usize,
}

impl Ord for OpenRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest (f, seq) first.
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Runs A* and RRT searches over an [`Occupancy`](crate::Occupancy) map.
///
/// `Planner` owns the per-cell tables, the open heap and the entry arena,
/// so repeated queries on same-sized grids reuse their allocations.
/// Tables are stamped with a generation counter instead of being cleared
/// between runs.
#[derive(Debug, Clone)]
pub struct Planner {
    pub(crate) astar_config: AstarConfig,
    pub(crate) rrt_config: RrtConfig,
    pub(crate) bounds: Range,
    pub(crate) width: usize,
    // A* caches
    pub(crate) closed: Vec<u32>,
    pub(crate) astar_generation: u32,
    pub(crate) entries: Vec<Entry>,
    pub(crate) open: std::collections::BinaryHeap<OpenRef>,
    // RRT caches
    pub(crate) in_tree: Vec<u32>,
    pub(crate) rrt_generation: u32,
    // shared scratch buffer for neighbor queries
    pub(crate) nbrs: Neighbors,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    /// Create a planner with default configuration.
    pub fn new() -> Self {
        Self::with_config(AstarConfig::default(), RrtConfig::default())
    }

    /// Create a planner with the given configuration.
    pub fn with_config(astar_config: AstarConfig, rrt_config: RrtConfig) -> Self {
        Self {
            astar_config,
            rrt_config,
            bounds: Range::default(),
            width: 0,
            closed: Vec::new(),
            astar_generation: 0,
            entries: Vec::new(),
            open: std::collections::BinaryHeap::new(),
            in_tree: Vec::new(),
            rrt_generation: 0,
            nbrs: Neighbors::new(),
        }
    }

    #[inline]
    pub fn astar_config(&self) -> &AstarConfig {
        &self.astar_config
    }

    #[inline]
    pub fn set_astar_config(&mut self, config: AstarConfig) {
        self.astar_config = config;
    }

    #[inline]
    pub fn rrt_config(&self) -> &RrtConfig {
        &self.rrt_config
    }

    #[inline]
    pub fn set_rrt_config(&mut self, config: RrtConfig) {
        self.rrt_config = config;
    }

    /// Point the caches at `bounds`, reallocating only when they are too
    /// small.
    pub(crate) fn prepare(&mut self, bounds: Range) {
        let len = bounds.len();
        self.bounds = bounds;
        self.width = bounds.cols().max(0) as usize;
        if len > self.closed.len() {
            self.closed.clear();
            self.closed.resize(len, 0);
            self.astar_generation = 0;
            self.in_tree.clear();
            self.in_tree.resize(len, 0);
            self.rrt_generation = 0;
        }
    }

    /// Start a new A* generation and return its stamp.
    pub(crate) fn next_astar_generation(&mut self) -> u32 {
        self.astar_generation = self.astar_generation.wrapping_add(1);
        if self.astar_generation == 0 {
            // Wrapped: old stamps could collide, so wipe them.
            self.closed.fill(0);
            self.astar_generation = 1;
        }
        self.astar_generation
    }

    /// Start a new RRT generation and return its stamp.
    pub(crate) fn next_rrt_generation(&mut self) -> u32 {
        self.rrt_generation = self.rrt_generation.wrapping_add(1);
        if self.rrt_generation == 0 {
            self.in_tree.fill(0);
            self.rrt_generation = 1;
        }
        self.rrt_generation
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Cell` to a flat index. Returns `None` if out of bounds.
    #[inline]
    pub(crate) fn idx(&self, c: Cell) -> Option<usize> {
        if !self.bounds.contains(c) {
            return None;
        }
        let row = (c.row - self.bounds.min.row) as usize;
        let col = (c.col - self.bounds.min.col) as usize;
        Some(row * self.width + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn open_ref_pops_lowest_f_then_fifo() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenRef { f: 5, seq: 0 });
        heap.push(OpenRef { f: 3, seq: 1 });
        heap.push(OpenRef { f: 5, seq: 2 });
        heap.push(OpenRef { f: 3, seq: 3 });
        let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|r| r.seq).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn prepare_smaller_preserves_capacity() {
        let mut pl = Planner::new();
        pl.prepare(Range::with_shape(20, 20));
        let cap = pl.closed.len();
        assert_eq!(cap, 400);

        pl.prepare(Range::with_shape(5, 5));
        assert_eq!(pl.closed.len(), cap);
        assert_eq!(pl.width, 5);
        assert_eq!(pl.idx(Cell::new(1, 2)), Some(7));
        assert_eq!(pl.idx(Cell::new(5, 0)), None);
    }

    #[test]
    fn prepare_larger_reallocates() {
        let mut pl = Planner::new();
        pl.prepare(Range::with_shape(5, 5));
        pl.next_astar_generation();
        pl.prepare(Range::with_shape(10, 10));
        assert_eq!(pl.closed.len(), 100);
        assert_eq!(pl.in_tree.len(), 100);
        assert_eq!(pl.astar_generation, 0);
    }

    #[test]
    fn generation_wrap_clears_stamps() {
        let mut pl = Planner::new();
        pl.prepare(Range::with_shape(2, 2));
        pl.closed[3] = 7;
        pl.astar_generation = u32::MAX;
        assert_eq!(pl.next_astar_generation(), 1);
        assert!(pl.closed.iter().all(|&s| s == 0));
    }

    #[test]
    fn idx_respects_offset_bounds() {
        let mut pl = Planner::new();
        pl.prepare(Range::new(2, 3, 5, 6));
        assert_eq!(pl.idx(Cell::new(2, 3)), Some(0));
        assert_eq!(pl.idx(Cell::new(4, 5)), Some(8));
        assert_eq!(pl.idx(Cell::new(0, 0)), None);
    }
}
