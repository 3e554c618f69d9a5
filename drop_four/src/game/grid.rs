//! Board cell storage with gravity-aware column queries.

use super::entities::{Cell, Team};

/// Default grid width.
pub const DEFAULT_COLUMNS: usize = 8;

/// Default grid height.
pub const DEFAULT_ROWS: usize = 5;

/// Fixed-size grid of cells addressed with one-based `(column, row)`.
///
/// Filled cells in a column always form a contiguous run starting at row 1.
/// The grid itself does not re-validate placements: callers obtain the row
/// from [`Grid::find_lowest_available_row`] for the same column right before
/// calling [`Grid::place_token`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: usize,
    rows: usize,
    // Column-major, `cells[column - 1][row - 1]`.
    cells: Vec<Vec<Cell>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

impl Grid {
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![vec![Cell::Empty; rows]; columns],
        }
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Cell at a one-based coordinate, `None` when off the grid.
    #[must_use]
    pub fn get(&self, column: usize, row: usize) -> Option<Cell> {
        if column == 0 || row == 0 {
            return None;
        }
        self.cells.get(column - 1)?.get(row - 1).copied()
    }

    /// First empty row scanning the column bottom-up.
    ///
    /// Returns `None` when the column is full or out of range.
    #[must_use]
    pub fn find_lowest_available_row(&self, column: usize) -> Option<usize> {
        if column == 0 {
            return None;
        }
        self.cells
            .get(column - 1)?
            .iter()
            .position(|cell| cell.is_empty())
            .map(|idx| idx + 1)
    }

    pub fn place_token(&mut self, column: usize, row: usize, team: Team) {
        self.cells[column - 1][row - 1] = Cell::owned_by(team);
    }

    /// True iff every column's top row is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|column| column.last().is_some_and(|cell| !cell.is_empty()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.is_empty())
    }

    pub fn reset(&mut self) {
        for column in &mut self.cells {
            column.fill(Cell::Empty);
        }
    }

    /// Text rows, top row first, one character per cell.
    #[must_use]
    pub fn render_rows(&self) -> Vec<String> {
        (1..=self.rows)
            .rev()
            .map(|row| {
                (1..=self.columns)
                    .map(|column| self.cells[column - 1][row - 1].to_string())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::default();
        assert_eq!(grid.columns(), 8);
        assert_eq!(grid.rows(), 5);
        assert!(grid.is_empty());
        assert!(!grid.is_full());
    }

    #[test]
    fn test_column_fills_bottom_up() {
        let mut grid = Grid::new(4, 3);
        for expected in 1..=3 {
            let row = grid.find_lowest_available_row(2).unwrap();
            assert_eq!(row, expected);
            grid.place_token(2, row, Team::Zero);
        }
        assert_eq!(grid.find_lowest_available_row(2), None);
        assert_eq!(grid.find_lowest_available_row(1), Some(1));
    }

    #[test]
    fn test_out_of_range_column() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.find_lowest_available_row(0), None);
        assert_eq!(grid.find_lowest_available_row(5), None);
        assert_eq!(grid.get(5, 1), None);
        assert_eq!(grid.get(1, 4), None);
    }

    #[test]
    fn test_full_and_reset() {
        let mut grid = Grid::new(2, 2);
        for column in 1..=2 {
            for row in 1..=2 {
                grid.place_token(column, row, Team::One);
            }
        }
        assert!(grid.is_full());

        grid.reset();
        assert!(grid.is_empty());
        assert_eq!(grid.find_lowest_available_row(1), Some(1));
    }

    #[test]
    fn test_top_row_decides_fullness() {
        let mut grid = Grid::new(2, 2);
        grid.place_token(1, 1, Team::Zero);
        grid.place_token(1, 2, Team::One);
        grid.place_token(2, 1, Team::Zero);
        assert!(!grid.is_full());
    }

    #[test]
    fn test_render_rows_top_first() {
        let mut grid = Grid::new(3, 2);
        grid.place_token(1, 1, Team::Zero);
        grid.place_token(1, 2, Team::One);
        grid.place_token(3, 1, Team::One);
        assert_eq!(grid.render_rows(), vec!["O..".to_string(), "X.O".to_string()]);
    }
}
