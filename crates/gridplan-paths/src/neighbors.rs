use gridplan_core::Cell;

/// Unit moves in expansion order: down, up, right, left.
pub const CARDINAL: [Cell; 4] = [
    Cell::new(1, 0),
    Cell::new(-1, 0),
    Cell::new(0, 1),
    Cell::new(0, -1),
];

/// Cached neighbor computation helper.
///
/// Enumerates the 4-connected neighbors of a cell in the fixed
/// [`CARDINAL`] order, filtered by a predicate.
#[derive(Debug, Clone)]
pub struct Neighbors {
    buf: Vec<Cell>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    /// Create a new `Neighbors` helper.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(4),
        }
    }

    /// Return the 4-directional neighbors of `c`, keeping only those for
    /// which `keep` returns `true`.
    pub fn cardinal(&mut self, c: Cell, keep: impl Fn(Cell) -> bool) -> &[Cell] {
        self.buf.clear();
        for d in CARDINAL {
            let n = c + d;
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}
