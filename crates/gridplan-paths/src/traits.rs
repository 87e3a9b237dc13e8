use gridplan_core::{Cell, Grid, Range};

/// Read-only occupancy interface the planners search through.
pub trait Occupancy {
    /// The rectangle of addressable cells.
    fn bounds(&self) -> Range;

    /// Whether `c` is inside [`bounds`](Occupancy::bounds) and traversable.
    /// Out-of-bounds cells must report `false`.
    fn is_free(&self, c: Cell) -> bool;
}

impl Occupancy for Grid {
    #[inline]
    fn bounds(&self) -> Range {
        Grid::bounds(self)
    }

    #[inline]
    fn is_free(&self, c: Cell) -> bool {
        Grid::is_free(self, c)
    }
}

impl<T: Occupancy + ?Sized> Occupancy for &T {
    #[inline]
    fn bounds(&self) -> Range {
        (**self).bounds()
    }

    #[inline]
    fn is_free(&self, c: Cell) -> bool {
        (**self).is_free(c)
    }
}

/// Both endpoints of a single axis-aligned step are free.
///
/// Steps are one cell long, so there is nothing in between to sweep.
#[inline]
pub fn step_is_clear<G: Occupancy + ?Sized>(grid: &G, from: Cell, to: Cell) -> bool {
    grid.is_free(from) && grid.is_free(to)
}
