//! Planner output: the [`Plan`] shape and the per-planner trace types.
//!
//! Both traces grow append-only, so every snapshot is a prefix of one
//! underlying cell list. They store that list once plus the prefix
//! length at each step, and hand snapshots out as slices on demand.

use gridplan_core::Cell;

/// The result of one planner run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan<T> {
    /// Cells from start to goal inclusive, or `None` if no path was found.
    pub path: Option<Vec<Cell>>,
    /// Exploration record for visualization.
    pub trace: T,
}

impl<T> Plan<T> {
    pub(crate) fn failed(trace: T) -> Self {
        Self { path: None, trace }
    }

    /// Whether a path was found.
    #[inline]
    pub fn found(&self) -> bool {
        self.path.is_some()
    }

    /// Number of unit moves along the path.
    pub fn steps(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.len().saturating_sub(1))
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// An append-only cell list with recorded prefix boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSnapshots"))]
pub struct Snapshots {
    cells: Vec<Cell>,
    ends: Vec<usize>,
}

impl Snapshots {
    #[inline]
    pub(crate) fn push(&mut self, c: Cell) -> usize {
        self.cells.push(c);
        self.cells.len() - 1
    }

    /// Record the current list as a snapshot.
    #[inline]
    pub(crate) fn mark(&mut self) {
        self.ends.push(self.cells.len());
    }

    /// Number of snapshots.
    #[inline]
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// The `i`-th snapshot.
    pub fn get(&self, i: usize) -> Option<&[Cell]> {
        self.ends.get(i).map(|&end| &self.cells[..end])
    }

    /// The most recent snapshot.
    pub fn last(&self) -> Option<&[Cell]> {
        self.ends.last().map(|&end| &self.cells[..end])
    }

    /// Iterate snapshots in recording order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[Cell]> + '_ {
        self.ends.iter().map(|&end| &self.cells[..end])
    }

    /// The full underlying list, including cells appended after the
    /// last snapshot.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

// ---------------------------------------------------------------------------
// A* trace
// ---------------------------------------------------------------------------

/// A cell taken off the A* open set with the `f` cost it was queued at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pop {
    pub cell: Cell,
    pub f: i32,
}

/// Expansion record of an A* run.
///
/// One snapshot per non-goal pop: the closed set at that moment. Popping
/// a cell that is already closed still records a (repeated) snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AstarTrace {
    closed: Snapshots,
    pops: Vec<Pop>,
}

impl AstarTrace {
    #[inline]
    pub(crate) fn close(&mut self, c: Cell) {
        self.closed.push(c);
    }

    #[inline]
    pub(crate) fn mark(&mut self) {
        self.closed.mark();
    }

    #[inline]
    pub(crate) fn record_pop(&mut self, cell: Cell, f: i32) {
        self.pops.push(Pop { cell, f });
    }

    /// Number of snapshots.
    #[inline]
    pub fn len(&self) -> usize {
        self.closed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.closed.is_empty()
    }

    /// The closed set after the `i`-th recorded pop.
    pub fn snapshot(&self, i: usize) -> Option<&[Cell]> {
        self.closed.get(i)
    }

    /// Iterate closed-set snapshots in order.
    pub fn snapshots(&self) -> impl ExactSizeIterator<Item = &[Cell]> + '_ {
        self.closed.iter()
    }

    /// Cells in the order they were closed.
    #[inline]
    pub fn closed_order(&self) -> &[Cell] {
        self.closed.cells()
    }

    /// Every pop in order, including no-op pops of closed cells and the
    /// final goal pop.
    #[inline]
    pub fn pops(&self) -> &[Pop] {
        &self.pops
    }
}

// ---------------------------------------------------------------------------
// RRT trace
// ---------------------------------------------------------------------------

/// Growth record of an RRT run, and the tree itself.
///
/// One snapshot per accepted extension: the whole tree at that moment.
/// The goal, when connected, is appended after the last snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRrtTrace"))]
pub struct RrtTrace {
    tree: Snapshots,
    parents: Vec<Option<usize>>,
}

impl RrtTrace {
    /// Append `c` to the tree under the node at index `parent`.
    pub(crate) fn insert(&mut self, c: Cell, parent: Option<usize>) -> usize {
        debug_assert!(parent.is_none_or(|p| p < self.parents.len()));
        self.parents.push(parent);
        self.tree.push(c)
    }

    #[inline]
    pub(crate) fn mark(&mut self) {
        self.tree.mark();
    }

    /// Root-to-node path for the node at index `i`.
    pub(crate) fn branch(&self, mut i: usize) -> Vec<Cell> {
        let cells = self.tree.cells();
        let mut path = vec![cells[i]];
        while let Some(p) = self.parents[i] {
            path.push(cells[p]);
            i = p;
        }
        path.reverse();
        path
    }

    /// Number of snapshots.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The tree after the `i`-th accepted extension.
    pub fn snapshot(&self, i: usize) -> Option<&[Cell]> {
        self.tree.get(i)
    }

    /// Iterate tree snapshots in order.
    pub fn snapshots(&self) -> impl ExactSizeIterator<Item = &[Cell]> + '_ {
        self.tree.iter()
    }

    /// All tree cells in insertion order. Empty if the run never started.
    #[inline]
    pub fn tree(&self) -> &[Cell] {
        self.tree.cells()
    }

    /// Index of the parent of the node at index `i`.
    pub fn parent_index(&self, i: usize) -> Option<usize> {
        self.parents.get(i).copied().flatten()
    }

    /// Parent of `c`, or `None` for the root and for cells not in the tree.
    pub fn parent_of(&self, c: Cell) -> Option<Cell> {
        let i = self.tree().iter().position(|&t| t == c)?;
        self.parent_index(i).map(|p| self.tree()[p])
    }

    /// Iterate `(child, parent)` edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        let cells = self.tree();
        self.parents
            .iter()
            .enumerate()
            .filter_map(move |(i, p)| p.map(|p| (cells[i], cells[p])))
    }
}

// ---------------------------------------------------------------------------
// Checked deserialization
// ---------------------------------------------------------------------------

/// A deserialized trace that breaks the prefix or tree layout.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceError {
    /// Snapshot `index` ends past the end of the cell list.
    EndOutOfRange { index: usize, end: usize, len: usize },
    /// Snapshot `index` is shorter than the one before it.
    EndDecreasing { index: usize },
    /// Parent links and tree cells differ in number.
    ParentCount { cells: usize, parents: usize },
    /// Node `node` links to a parent inserted at or after it.
    ParentOrder { node: usize, parent: usize },
}

#[cfg(feature = "serde")]
impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOutOfRange { index, end, len } => {
                write!(f, "snapshot {index} ends at {end}, past {len} cells")
            }
            Self::EndDecreasing { index } => {
                write!(f, "snapshot {index} is shorter than the previous one")
            }
            Self::ParentCount { cells, parents } => {
                write!(f, "{parents} parent links for {cells} tree cells")
            }
            Self::ParentOrder { node, parent } => {
                write!(f, "node {node} has parent {parent}, which is not earlier")
            }
        }
    }
}

#[cfg(feature = "serde")]
impl std::error::Error for TraceError {}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSnapshots {
    cells: Vec<Cell>,
    ends: Vec<usize>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSnapshots> for Snapshots {
    type Error = TraceError;

    fn try_from(raw: RawSnapshots) -> Result<Self, Self::Error> {
        let len = raw.cells.len();
        let mut prev = 0;
        for (index, &end) in raw.ends.iter().enumerate() {
            if end > len {
                return Err(TraceError::EndOutOfRange { index, end, len });
            }
            if end < prev {
                return Err(TraceError::EndDecreasing { index });
            }
            prev = end;
        }
        Ok(Self {
            cells: raw.cells,
            ends: raw.ends,
        })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRrtTrace {
    tree: Snapshots,
    parents: Vec<Option<usize>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRrtTrace> for RrtTrace {
    type Error = TraceError;

    fn try_from(raw: RawRrtTrace) -> Result<Self, Self::Error> {
        let cells = raw.tree.cells().len();
        if raw.parents.len() != cells {
            return Err(TraceError::ParentCount {
                cells,
                parents: raw.parents.len(),
            });
        }
        for (node, p) in raw.parents.iter().enumerate() {
            if let Some(parent) = *p {
                if parent >= node {
                    return Err(TraceError::ParentOrder { node, parent });
                }
            }
        }
        Ok(Self {
            tree: raw.tree,
            parents: raw.parents,
        })
    }
}
