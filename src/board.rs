//! Board cells, team marks and winning lines
//!
//! The board is an ordered sequence of cells, each carrying the category it
//! was assigned at the start of the round and the mark of the team that
//! claimed it (if any). Winning lines are fixed tables per board size.

use std::fmt::Display;

use enum_map::Enum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One of the two competing teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
pub enum Team {
    /// Team A, marked `O`, always opens a session
    A,
    /// Team B, marked `X`
    B,
}

impl Team {
    /// The team acting after this one
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Marker drawn on claimed cells
    pub fn marker(self) -> char {
        match self {
            Self::A => 'O',
            Self::B => 'X',
        }
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "Team A"),
            Self::B => write!(f, "Team B"),
        }
    }
}

/// Supported board dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardSize {
    /// Classic 3×3 board, lines of three
    #[default]
    Three,
    /// 4×4 bingo-style board
    Four,
}

impl BoardSize {
    /// Number of cells on one side of the board
    pub fn side(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Total number of cells
    pub fn cell_count(self) -> usize {
        self.side() * self.side()
    }
}

/// Which set of winning lines applies to the 4×4 board
///
/// The 3×3 board always uses its eight standard lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinLines {
    /// Rows, columns, both full diagonals and the four extra diagonal
    /// fragments of the reference rules
    #[default]
    Reference,
    /// Rows, columns and both full diagonals only
    Symmetric,
}

const THREE_LINES: [&[usize]; 8] = [
    &[0, 1, 2],
    &[3, 4, 5],
    &[6, 7, 8],
    &[0, 3, 6],
    &[1, 4, 7],
    &[2, 5, 8],
    &[0, 4, 8],
    &[2, 4, 6],
];

const FOUR_LINES: [&[usize]; 10] = [
    &[0, 1, 2, 3],
    &[4, 5, 6, 7],
    &[8, 9, 10, 11],
    &[12, 13, 14, 15],
    &[0, 4, 8, 12],
    &[1, 5, 9, 13],
    &[2, 6, 10, 14],
    &[3, 7, 11, 15],
    &[0, 5, 10, 15],
    &[3, 6, 9, 12],
];

// Not symmetric. Listed exactly as the house rules enumerate them.
const FOUR_FRAGMENTS: [&[usize]; 4] = [&[1, 6, 11], &[2, 7, 12], &[3, 8, 13], &[2, 5, 8, 11]];

/// Returns every winning line for a board size, in scan order
pub fn winning_lines(size: BoardSize, win_lines: WinLines) -> Vec<&'static [usize]> {
    match (size, win_lines) {
        (BoardSize::Three, _) => THREE_LINES.to_vec(),
        (BoardSize::Four, WinLines::Symmetric) => FOUR_LINES.to_vec(),
        (BoardSize::Four, WinLines::Reference) => FOUR_LINES
            .iter()
            .chain(FOUR_FRAGMENTS.iter())
            .copied()
            .collect_vec(),
    }
}

/// A single board position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Index into the question bank's categories, `None` when the bank had none
    pub category: Option<usize>,
    /// Team that claimed this cell
    pub mark: Option<Team>,
}

/// The playing board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    size: BoardSize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board without category assignments
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![Cell::default(); size.cell_count()],
        }
    }

    /// The board's dimensions
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// All cells in index order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at `index`, if it exists
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Draws a category for every cell, uniformly and independently with replacement
    ///
    /// With no categories available every cell is left unassigned.
    pub fn assign_categories(&mut self, category_count: usize, rng: &mut fastrand::Rng) {
        for cell in &mut self.cells {
            cell.category = (category_count > 0).then(|| rng.usize(..category_count));
        }
    }

    /// Claims an empty cell for `team`
    ///
    /// Returns `false` (and changes nothing) if the cell is out of range or
    /// already marked.
    pub fn place(&mut self, index: usize, team: Team) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) if cell.mark.is_none() => {
                cell.mark = Some(team);
                true
            }
            _ => false,
        }
    }

    /// Removes every mark, keeping category assignments
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.mark = None;
        }
    }

    /// Number of marked cells
    pub fn marks_placed(&self) -> usize {
        self.cells.iter().filter(|cell| cell.mark.is_some()).count()
    }

    /// Whether every cell carries a mark
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.mark.is_some())
    }

    /// Scans the winning lines in order and returns the owner of the first complete one
    pub fn winner(&self, win_lines: WinLines) -> Option<Team> {
        winning_lines(self.size, win_lines)
            .into_iter()
            .find_map(|line| {
                let first = self.cells.get(*line.first()?)?.mark?;
                line.iter()
                    .all(|&index| self.cells.get(index).and_then(|cell| cell.mark) == Some(first))
                    .then_some(first)
            })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn board_with(size: BoardSize, marks: &[(usize, Team)]) -> Board {
        let mut board = Board::new(size);
        for &(index, team) in marks {
            assert!(board.place(index, team));
        }
        board
    }

    #[test]
    fn test_team_alternation_and_markers() {
        assert_eq!(Team::A.other(), Team::B);
        assert_eq!(Team::B.other(), Team::A);
        assert_eq!(Team::A.marker(), 'O');
        assert_eq!(Team::B.marker(), 'X');
        assert_eq!(Team::B.to_string(), "Team B");
    }

    #[test]
    fn test_board_sizes() {
        assert_eq!(Board::new(BoardSize::Three).cells().len(), 9);
        assert_eq!(Board::new(BoardSize::Four).cells().len(), 16);
    }

    #[test]
    fn test_three_by_three_lines() {
        let lines = winning_lines(BoardSize::Three, WinLines::Reference);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines, winning_lines(BoardSize::Three, WinLines::Symmetric));
        assert!(lines.iter().all(|line| line.len() == 3));
    }

    #[test]
    fn test_four_by_four_reference_table() {
        let lines = winning_lines(BoardSize::Four, WinLines::Reference);
        let expected: Vec<&[usize]> = vec![
            &[0, 1, 2, 3],
            &[4, 5, 6, 7],
            &[8, 9, 10, 11],
            &[12, 13, 14, 15],
            &[0, 4, 8, 12],
            &[1, 5, 9, 13],
            &[2, 6, 10, 14],
            &[3, 7, 11, 15],
            &[0, 5, 10, 15],
            &[3, 6, 9, 12],
            &[1, 6, 11],
            &[2, 7, 12],
            &[3, 8, 13],
            &[2, 5, 8, 11],
        ];
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_four_by_four_symmetric_has_only_full_lines() {
        let lines = winning_lines(BoardSize::Four, WinLines::Symmetric);
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|line| line.len() == 4));
    }

    #[test]
    fn test_top_row_wins() {
        let board = board_with(BoardSize::Three, &[(0, Team::A), (1, Team::A), (2, Team::A)]);
        assert_eq!(board.winner(WinLines::Reference), Some(Team::A));
    }

    #[test]
    fn test_anti_diagonal_wins() {
        let board = board_with(BoardSize::Three, &[(2, Team::B), (4, Team::B), (6, Team::B)]);
        assert_eq!(board.winner(WinLines::Reference), Some(Team::B));
    }

    #[test]
    fn test_mixed_line_does_not_win() {
        let board = board_with(BoardSize::Three, &[(0, Team::A), (1, Team::B), (2, Team::A)]);
        assert_eq!(board.winner(WinLines::Reference), None);
    }

    #[test]
    fn test_fragment_wins_only_under_reference_rules() {
        let board = board_with(
            BoardSize::Four,
            &[(1, Team::A), (6, Team::A), (11, Team::A)],
        );
        assert_eq!(board.winner(WinLines::Reference), Some(Team::A));
        assert_eq!(board.winner(WinLines::Symmetric), None);
    }

    #[test]
    fn test_four_by_four_needs_four_in_a_row() {
        let board = board_with(
            BoardSize::Four,
            &[(0, Team::B), (1, Team::B), (2, Team::B)],
        );
        assert_eq!(board.winner(WinLines::Reference), None);
    }

    #[test]
    fn test_place_rejects_marked_and_out_of_range() {
        let mut board = Board::new(BoardSize::Three);
        assert!(board.place(4, Team::A));
        assert!(!board.place(4, Team::B));
        assert!(!board.place(9, Team::B));
        assert_eq!(board.get(4).and_then(|cell| cell.mark), Some(Team::A));
        assert_eq!(board.marks_placed(), 1);
    }

    #[test]
    fn test_clear_keeps_categories() {
        let mut board = Board::new(BoardSize::Three);
        board.assign_categories(3, &mut fastrand::Rng::with_seed(1));
        let categories: Vec<_> = board.cells().iter().map(|cell| cell.category).collect();
        board.place(0, Team::A);
        board.clear();
        assert_eq!(board.marks_placed(), 0);
        let after: Vec<_> = board.cells().iter().map(|cell| cell.category).collect();
        assert_eq!(categories, after);
    }

    #[test]
    fn test_assign_categories_in_range_and_seeded() {
        let mut first = Board::new(BoardSize::Four);
        let mut second = Board::new(BoardSize::Four);
        first.assign_categories(5, &mut fastrand::Rng::with_seed(42));
        second.assign_categories(5, &mut fastrand::Rng::with_seed(42));
        assert!(
            first
                .cells()
                .iter()
                .all(|cell| cell.category.is_some_and(|c| c < 5))
        );
        assert_eq!(first.cells(), second.cells());
    }

    #[test]
    fn test_assign_categories_without_bank() {
        let mut board = Board::new(BoardSize::Three);
        board.assign_categories(0, &mut fastrand::Rng::with_seed(3));
        assert!(board.cells().iter().all(|cell| cell.category.is_none()));
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new(BoardSize::Three);
        assert!(!board.is_full());
        for index in 0..9 {
            board.place(index, if index % 2 == 0 { Team::A } else { Team::B });
        }
        assert!(board.is_full());
    }
}
