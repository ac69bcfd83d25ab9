//! Growable board extent and the visibility mask laid over it.
//!
//! Board coordinates are never stored on entities. They are derived from the
//! spiral coordinate of a logical position plus the extent's origin, so growing
//! the board towards negative spiral rows or columns re-projects everything
//! that was placed before.

use silk_road_core::{coords_for, BoardCoord, Position, Spiral, SpiralCoord, MAX_ROUTE_LENGTH};

/// Dimensions of the board plus the board cell that holds logical position zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridExtent {
    rows: u32,
    columns: u32,
    origin_row: u32,
    origin_column: u32,
}

impl GridExtent {
    /// Creates a single-cell extent anchored on position zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: 1,
            columns: 1,
            origin_row: 0,
            origin_column: 0,
        }
    }

    /// Number of rows covered by the extent.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns covered by the extent.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Board cell that holds logical position zero.
    #[must_use]
    pub const fn origin(&self) -> BoardCoord {
        BoardCoord::new(self.origin_row, self.origin_column)
    }

    /// Projects a spiral coordinate onto the board, if the extent covers it.
    #[must_use]
    pub fn board_coord(&self, coord: SpiralCoord) -> Option<BoardCoord> {
        let row = i64::from(coord.row()) + i64::from(self.origin_row);
        let column = i64::from(coord.column()) + i64::from(self.origin_column);
        let row = u32::try_from(row).ok().filter(|row| *row < self.rows)?;
        let column = u32::try_from(column)
            .ok()
            .filter(|column| *column < self.columns)?;
        Some(BoardCoord::new(row, column))
    }

    /// Reports whether the extent covers the spiral coordinate.
    #[must_use]
    pub fn contains(&self, coord: SpiralCoord) -> bool {
        self.board_coord(coord).is_some()
    }

    /// Grows the extent until it covers `coord`.
    ///
    /// Returns `None` without touching the extent when the coordinate is
    /// already covered. Coordinates above or left of the board shift the
    /// origin by the deficit and grow that side by the same amount.
    pub fn ensure_contains(&mut self, coord: SpiralCoord) -> Option<GridGrowth> {
        let row = i64::from(coord.row()) + i64::from(self.origin_row);
        let column = i64::from(coord.column()) + i64::from(self.origin_column);
        let (row_shift, rows) = grow_axis(row, self.rows);
        let (column_shift, columns) = grow_axis(column, self.columns);

        if row_shift == 0 && column_shift == 0 && rows == self.rows && columns == self.columns {
            return None;
        }

        self.rows = rows;
        self.columns = columns;
        self.origin_row = self.origin_row.saturating_add(row_shift);
        self.origin_column = self.origin_column.saturating_add(column_shift);

        Some(GridGrowth {
            row_shift,
            column_shift,
            rows,
            columns,
        })
    }
}

impl Default for GridExtent {
    fn default() -> Self {
        Self::new()
    }
}

/// Describes a single growth step of a [`GridExtent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGrowth {
    /// Rows added above the previous board; the origin moved down by this much.
    pub row_shift: u32,
    /// Columns added left of the previous board; the origin moved right by this much.
    pub column_shift: u32,
    /// Row count after growing.
    pub rows: u32,
    /// Column count after growing.
    pub columns: u32,
}

fn grow_axis(offset: i64, length: u32) -> (u32, u32) {
    if offset < 0 {
        let shift = u32::try_from(offset.unsigned_abs()).unwrap_or(u32::MAX);
        (shift, length.saturating_add(shift))
    } else {
        let needed = u32::try_from(offset.saturating_add(1)).unwrap_or(u32::MAX);
        (0, length.max(needed))
    }
}

/// Row-major flags marking which board cells belong to the visible road.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityMask {
    rows: u32,
    columns: u32,
    cells: Vec<bool>,
}

impl VisibilityMask {
    /// Marks the board cell of every position below `visible_target`.
    #[must_use]
    pub fn recompute(visible_target: u32, extent: &GridExtent) -> Self {
        let capacity_u64 = u64::from(extent.rows()) * u64::from(extent.columns());
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut mask = Self {
            rows: extent.rows(),
            columns: extent.columns(),
            cells: vec![false; capacity],
        };

        let walked = usize::try_from(visible_target).unwrap_or(usize::MAX);
        for (_, coord) in Spiral::new().take(walked) {
            if let Some(index) = extent
                .board_coord(coord)
                .and_then(|cell| mask.index(cell))
            {
                mask.cells[index] = true;
            }
        }

        mask
    }

    /// Reports whether the cell displays part of the visible road.
    #[must_use]
    pub fn is_visible(&self, cell: BoardCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of visible cells.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.cells.iter().filter(|visible| **visible).count()
    }

    /// Provides the dimensions of the mask as `(rows, columns)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Row-major visibility flags.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn index(&self, cell: BoardCoord) -> Option<usize> {
        if cell.row() < self.rows && cell.column() < self.columns {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Changes produced while fitting a position onto the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct BoardChange {
    pub(crate) extended: bool,
    pub(crate) resized: bool,
}

/// Extent, mask and visible target kept consistent with each other.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    extent: GridExtent,
    mask: VisibilityMask,
    visible_target: u32,
}

impl Board {
    pub(crate) fn new(initial_length: u32) -> Self {
        let visible_target = initial_length.clamp(1, MAX_ROUTE_LENGTH);
        let mut extent = GridExtent::new();
        let walked = usize::try_from(visible_target).unwrap_or(usize::MAX);
        for (_, coord) in Spiral::new().take(walked) {
            let _ = extent.ensure_contains(coord);
        }
        let mask = VisibilityMask::recompute(visible_target, &extent);
        Self {
            extent,
            mask,
            visible_target,
        }
    }

    /// Extends the visible road and the extent so that `position` is on the board.
    pub(crate) fn fit(&mut self, position: Position) -> BoardChange {
        let mut change = BoardChange::default();
        let target = position.get().saturating_add(1);
        if target <= self.visible_target {
            return change;
        }

        let covered = usize::try_from(self.visible_target).unwrap_or(usize::MAX);
        let walked = usize::try_from(target).unwrap_or(usize::MAX);
        for (_, coord) in Spiral::new().take(walked).skip(covered) {
            if self.extent.ensure_contains(coord).is_some() {
                change.resized = true;
            }
        }
        self.visible_target = target;
        change.extended = true;

        let mask = VisibilityMask::recompute(self.visible_target, &self.extent);
        self.apply_mask(mask);
        change
    }

    fn apply_mask(&mut self, mask: VisibilityMask) {
        assert_eq!(
            mask.dimensions(),
            (self.extent.rows(), self.extent.columns()),
            "visibility mask must match the board extent"
        );
        self.mask = mask;
    }

    pub(crate) fn cell_for(&self, position: Position) -> Option<BoardCoord> {
        self.extent.board_coord(coords_for(position))
    }

    /// Board cell of a position that is known to be on the board.
    ///
    /// # Panics
    ///
    /// Panics when the position lies outside the extent, which means an entity
    /// was placed without fitting the board first.
    pub(crate) fn placed_cell(&self, position: Position) -> BoardCoord {
        match self.cell_for(position) {
            Some(cell) => cell,
            None => panic!(
                "position {position} lies outside the {}x{} board",
                self.extent.rows(),
                self.extent.columns()
            ),
        }
    }

    pub(crate) const fn extent(&self) -> &GridExtent {
        &self.extent
    }

    pub(crate) const fn mask(&self) -> &VisibilityMask {
        &self.mask
    }

    pub(crate) const fn visible_target(&self) -> u32 {
        self.visible_target
    }

    pub(crate) fn route_size(&self) -> u32 {
        self.visible_target.max(1)
    }
}
