//! Four-in-a-row detection around a freshly placed token.

use serde::Serialize;

use super::{
    entities::{Cell, Coord, Team},
    grid::Grid,
};

/// Tokens in a line needed to win.
pub const DEFAULT_WIN_LENGTH: usize = 4;

/// Scan order: horizontal, vertical, rising diagonal, falling diagonal.
pub const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Outcome of a win check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WinResult {
    pub has_won: bool,
    /// Placed cell first, then positive-direction hits, then negative-direction
    /// hits, nearest first. Empty unless `has_won`.
    pub winning_cells: Vec<Coord>,
}

impl WinResult {
    fn no_win() -> Self {
        Self::default()
    }
}

/// Check with the standard win length.
#[must_use]
pub fn check_win(grid: &Grid, placed_column: usize, placed_row: usize, team: Team) -> WinResult {
    check_win_with_length(grid, placed_column, placed_row, team, DEFAULT_WIN_LENGTH)
}

/// Checks whether the token at `(placed_column, placed_row)` completes a line
/// of `win_length` cells owned by `team`.
///
/// Directions are tried in [`DIRECTIONS`] order and the first satisfying one
/// is returned.
#[must_use]
pub fn check_win_with_length(
    grid: &Grid,
    placed_column: usize,
    placed_row: usize,
    team: Team,
    win_length: usize,
) -> WinResult {
    let owner = Cell::owned_by(team);

    for (dc, dr) in DIRECTIONS {
        let mut cells = vec![(placed_column, placed_row)];

        for sign in [1isize, -1] {
            let mut step = 1isize;
            while let Some(coord) = offset(placed_column, placed_row, dc * sign * step, dr * sign * step)
                && grid.get(coord.0, coord.1) == Some(owner)
            {
                cells.push(coord);
                step += 1;
            }
        }

        if cells.len() >= win_length {
            return WinResult {
                has_won: true,
                winning_cells: cells,
            };
        }
    }

    WinResult::no_win()
}

fn offset(column: usize, row: usize, dc: isize, dr: isize) -> Option<Coord> {
    let column = column.checked_add_signed(dc)?;
    let row = row.checked_add_signed(dr)?;
    (column > 0 && row > 0).then_some((column, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_all(grid: &mut Grid, coords: &[Coord], team: Team) {
        for &(column, row) in coords {
            grid.place_token(column, row, team);
        }
    }

    #[test]
    fn test_horizontal_win_bottom_row() {
        let mut grid = Grid::default();
        place_all(&mut grid, &[(1, 1), (2, 1), (3, 1), (4, 1)], Team::Zero);

        let result = check_win(&grid, 4, 1, Team::Zero);
        assert!(result.has_won);
        // Placed cell, then nothing to the right, then leftwards nearest first.
        assert_eq!(result.winning_cells, vec![(4, 1), (3, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn test_three_in_a_row_is_not_a_win() {
        let mut grid = Grid::default();
        place_all(&mut grid, &[(1, 1), (2, 1), (3, 1)], Team::Zero);
        assert!(!check_win(&grid, 3, 1, Team::Zero).has_won);

        let mut grid = Grid::default();
        place_all(&mut grid, &[(5, 1), (5, 2), (5, 3)], Team::One);
        let result = check_win(&grid, 5, 3, Team::One);
        assert!(!result.has_won);
        assert!(result.winning_cells.is_empty());
    }

    #[test]
    fn test_vertical_win() {
        let mut grid = Grid::default();
        place_all(&mut grid, &[(2, 1), (2, 2), (2, 3), (2, 4)], Team::One);

        let result = check_win(&grid, 2, 4, Team::One);
        assert!(result.has_won);
        assert_eq!(result.winning_cells, vec![(2, 4), (2, 3), (2, 2), (2, 1)]);
    }

    #[test]
    fn test_rising_diagonal_win() {
        let mut grid = Grid::default();
        place_all(&mut grid, &[(1, 1), (2, 2), (3, 3), (4, 4)], Team::Zero);

        let result = check_win(&grid, 4, 4, Team::Zero);
        assert!(result.has_won);
        assert_eq!(result.winning_cells.len(), 4);
        assert!(result.winning_cells.contains(&(1, 1)));
    }

    #[test]
    fn test_falling_diagonal_win_from_middle() {
        let mut grid = Grid::default();
        place_all(&mut grid, &[(3, 4), (4, 3), (5, 2), (6, 1)], Team::One);

        let result = check_win(&grid, 4, 3, Team::One);
        assert!(result.has_won);
        // (1,-1) forward: (5,2),(6,1); backward: (3,4).
        assert_eq!(result.winning_cells, vec![(4, 3), (5, 2), (6, 1), (3, 4)]);
    }

    #[test]
    fn test_other_team_breaks_the_line() {
        let mut grid = Grid::default();
        place_all(&mut grid, &[(1, 1), (2, 1), (4, 1)], Team::Zero);
        grid.place_token(3, 1, Team::One);
        assert!(!check_win(&grid, 4, 1, Team::Zero).has_won);
    }

    #[test]
    fn test_horizontal_reported_before_vertical() {
        let mut grid = Grid::default();
        place_all(
            &mut grid,
            &[(1, 4), (2, 4), (3, 4), (4, 1), (4, 2), (4, 3), (4, 4)],
            Team::Zero,
        );
        let result = check_win(&grid, 4, 4, Team::Zero);
        assert!(result.has_won);
        assert!(result.winning_cells.iter().all(|&(_, row)| row == 4));
    }

    #[test]
    fn test_line_longer_than_win_length_reports_all_cells() {
        let mut grid = Grid::default();
        place_all(&mut grid, &[(1, 1), (2, 1), (4, 1), (5, 1), (3, 1)], Team::Zero);
        let result = check_win(&grid, 3, 1, Team::Zero);
        assert!(result.has_won);
        assert_eq!(result.winning_cells, vec![(3, 1), (4, 1), (5, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn test_custom_win_length() {
        let mut grid = Grid::new(5, 5);
        place_all(&mut grid, &[(1, 1), (2, 1), (3, 1)], Team::Zero);
        assert!(check_win_with_length(&grid, 3, 1, Team::Zero, 3).has_won);
        assert!(!check_win_with_length(&grid, 3, 1, Team::Zero, 4).has_won);
    }
}
