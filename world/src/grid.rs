//! Dense per-cell lookup tables rebuilt from entity collections.

use railway_tycoon_core::CellCoord;

/// Row-major grid mapping each cell to at most one value.
#[derive(Clone, Debug)]
pub(crate) struct CellGrid<T> {
    columns: u32,
    rows: u32,
    cells: Vec<Option<T>>,
}

impl<T: Copy> CellGrid<T> {
    fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    /// Builds a grid from `(cell, value)` pairs. The first value claiming a
    /// cell wins; entries outside the grid are ignored.
    pub(crate) fn from_entries<I>(columns: u32, rows: u32, entries: I) -> Self
    where
        I: IntoIterator<Item = (CellCoord, T)>,
    {
        let mut grid = Self::new(columns, rows);
        for (cell, value) in entries {
            if let Some(index) = grid.index(cell) {
                if let Some(slot) = grid.cells.get_mut(index) {
                    if slot.is_none() {
                        *slot = Some(value);
                    }
                }
            }
        }
        grid
    }

    /// Value stored at `cell`, if any.
    pub(crate) fn get(&self, cell: CellCoord) -> Option<T> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        cell_index(self.columns, self.rows, cell)
    }
}

/// Row-major position of `cell` in a `columns` x `rows` grid.
pub(crate) fn cell_index(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    if cell.column() < columns && cell.row() < rows {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(columns).ok()?;
        Some(row * width + column)
    } else {
        None
    }
}
