/// Property-based tests for gravity and win scanning using proptest
///
/// These tests verify grid and win-scanner behaviour across randomly
/// generated grid sizes and move sequences.
use drop_four::game::{
    Cell, Grid, Team, check_win,
    win::{DEFAULT_WIN_LENGTH, DIRECTIONS},
};
use proptest::prelude::*;

// Reference check: any window of four cells along a direction that
// contains the placed cell and is owned by the team.
fn brute_force_win(grid: &Grid, column: usize, row: usize, team: Team) -> bool {
    let owner = Cell::owned_by(team);
    let len = DEFAULT_WIN_LENGTH as isize;

    DIRECTIONS.iter().any(|&(dc, dr)| {
        (0..len).any(|back| {
            (0..len).all(|i| {
                let c = column as isize + dc * (i - back);
                let r = row as isize + dr * (i - back);
                c > 0 && r > 0 && grid.get(c as usize, r as usize) == Some(owner)
            })
        })
    })
}

fn gravity_holds(grid: &Grid) -> bool {
    (1..=grid.columns()).all(|column| {
        (2..=grid.rows()).all(|row| {
            grid.get(column, row) == Some(Cell::Empty)
                || grid.get(column, row - 1) != Some(Cell::Empty)
        })
    })
}

proptest! {
    #[test]
    fn test_column_rows_increase_until_full(
        columns in 1usize..=10,
        rows in 1usize..=8,
        pick in 0usize..10,
    ) {
        let mut grid = Grid::new(columns, rows);
        let column = pick % columns + 1;

        for expected in 1..=rows {
            let row = grid.find_lowest_available_row(column);
            prop_assert_eq!(row, Some(expected));
            grid.place_token(column, expected, Team::Zero);
        }
        prop_assert_eq!(grid.find_lowest_available_row(column), None);
        prop_assert_eq!(grid.find_lowest_available_row(columns + 1), None);
    }

    #[test]
    fn test_random_games_match_reference_scan(
        moves in prop::collection::vec(1usize..=8, 1..60),
    ) {
        let mut grid = Grid::default();
        let mut team = Team::Zero;

        for column in moves {
            let Some(row) = grid.find_lowest_available_row(column) else {
                continue;
            };
            grid.place_token(column, row, team);
            prop_assert!(gravity_holds(&grid));

            let result = check_win(&grid, column, row, team);
            prop_assert_eq!(result.has_won, brute_force_win(&grid, column, row, team));

            if result.has_won {
                prop_assert!(result.winning_cells.len() >= DEFAULT_WIN_LENGTH);
                prop_assert_eq!(result.winning_cells[0], (column, row));
                for &(c, r) in &result.winning_cells {
                    prop_assert_eq!(grid.get(c, r), Some(Cell::owned_by(team)));
                }
                break;
            }
            prop_assert!(result.winning_cells.is_empty());
            team = team.other();
        }
    }

    #[test]
    fn test_three_in_a_row_never_wins(
        start_column in 1usize..=3,
        direction in 0usize..4,
    ) {
        let (dc, dr) = DIRECTIONS[direction];
        let mut grid = Grid::default();
        // Start low enough that a falling diagonal stays on the grid.
        let start_row: isize = if dr < 0 { 4 } else { 1 };

        let mut last = (0, 0);
        for i in 0..3isize {
            let c = (start_column as isize + dc * i) as usize;
            let r = (start_row + dr * i) as usize;
            grid.place_token(c, r, Team::One);
            last = (c, r);
        }
        prop_assert!(!check_win(&grid, last.0, last.1, Team::One).has_won);

        // Completing the line wins.
        let c = (last.0 as isize + dc) as usize;
        let r = (last.1 as isize + dr) as usize;
        grid.place_token(c, r, Team::One);
        prop_assert!(check_win(&grid, c, r, Team::One).has_won);
    }
}
