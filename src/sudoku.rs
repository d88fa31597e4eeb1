//! Generalized Sudoku board and its reduction to an exact-cover instance.
//!
//! A board of side `N = b^2` (9x9, 16x16, 25x25, ...) is mapped onto `dlx::Solver` with
//! `N^3` candidate rows (one per `(row, col, digit)` triple) and `4*N^2` constraint
//! columns (cell, row, box, and placement constraints). This mirrors the column
//! arithmetic of `SudokuMapper::Mapping` in the original C++ source exactly.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dlx::Solver;

const COLOR_RED: &str = "\x1b[1;31m";
const COLOR_DEFAULT: &str = "\x1b[0;49m";

/// A square grid of side `N`. Cells hold zero-based digits in `0..N`, or `-1` if unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    side: u32,
    vals: Vec<i32>,
    predefined: Vec<bool>,
}

impl FromStr for Board {
    type Err = Box<dyn Error>;

    /// Parses a puzzle string using the dotted single-digit format (no side given; the
    /// side is the square root of the token count) or the whitespace-tokenized
    /// pipe-delimited multi-digit format, auto-detected by the presence of `|`.
    fn from_str(example: &str) -> Result<Self, Self::Err> {
        let tokens = if example.contains('|') {
            Board::multi_digit_tokens(example)?
        } else {
            Board::single_digit_tokens(example)
        };

        let total = tokens.len();
        let side = (total as f64).sqrt().round() as u32;
        if (side * side) as usize != total || total == 0 {
            return Err("puzzle string does not describe a square grid".into());
        }

        let predefined = tokens.iter().map(|&t| t != -1).collect();

        Ok(Board {
            side,
            vals: tokens,
            predefined,
        })
    }
}

impl Board {
    /// An empty board of the given side with every cell unknown.
    pub fn empty(side: u32) -> Self {
        let total = (side * side) as usize;
        Board {
            side,
            vals: vec![-1; total],
            predefined: vec![false; total],
        }
    }

    fn single_digit_tokens(example: &str) -> Vec<i32> {
        example
            .chars()
            .filter(|c| *c == '.' || c.is_ascii_digit())
            .map(|c| if c == '.' { -1 } else { c as i32 - '1' as i32 })
            .collect()
    }

    fn multi_digit_tokens(example: &str) -> Result<Vec<i32>, Box<dyn Error>> {
        let mut tokens = Vec::new();
        for tok in example.split_whitespace() {
            if tok.starts_with('|') || tok.starts_with('-') {
                continue;
            }
            if tok == "." || tok == ".." {
                tokens.push(-1);
                continue;
            }
            let num: i32 = tok.parse()?;
            tokens.push(num - 1);
        }
        Ok(tokens)
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn get(&self, r: u32, c: u32) -> i32 {
        self.vals[(r * self.side + c) as usize]
    }

    /// Sets a cell's value. Debug-checked precondition: the cell was unknown.
    pub fn set(&mut self, r: u32, c: u32, n: u32) {
        let idx = (r * self.side + c) as usize;
        debug_assert_eq!(self.vals[idx], -1, "cell already assigned");
        self.vals[idx] = n as i32;
    }

    pub fn is_predefined(&self, r: u32, c: u32) -> bool {
        self.predefined[(r * self.side + c) as usize]
    }

    /// Flat zero-based grid, `-1` for unknown cells. Used by the HTTP response layer,
    /// which serializes the raw values rather than the ANSI-decorated text form.
    pub fn grid(&self) -> Vec<Vec<i32>> {
        self.vals
            .chunks(self.side as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

impl fmt::Display for Board {
    /// Pretty-prints the grid with ANSI-red predefined cells, one-based digits, and a
    /// blank line between box rows -- mirrors the original `SudokuBoard::Print`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let box_size = (self.side as f64).sqrt().round() as u32;
        let width = self.side.to_string().len();

        for r in 0..self.side {
            if r % box_size == 0 {
                writeln!(f)?;
            }
            for c in 0..self.side {
                if c % box_size == 0 {
                    write!(f, " ")?;
                }
                let predefined = self.is_predefined(r, c);
                if predefined {
                    write!(f, "{}", COLOR_RED)?;
                }
                write!(f, "{:>width$}", self.get(r, c) + 1, width = width)?;
                if predefined {
                    write!(f, "{}", COLOR_DEFAULT)?;
                }
                write!(f, " ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Column arithmetic for a single `(r, c, n)` candidate, mirroring the original C++
/// `SudokuMapper::Mapping` member functions exactly.
struct Mapping {
    r: u32,
    c: u32,
    n: u32,
    side: u32,
}

impl Mapping {
    fn row(&self) -> u32 {
        self.r * self.side * self.side + self.c * self.side + self.n
    }

    fn cell_col(&self) -> u32 {
        self.c * self.side + self.n
    }

    fn row_col(&self) -> u32 {
        self.side * self.side + self.r * self.side + self.n
    }

    fn box_col(&self) -> u32 {
        let box_size = (self.side as f64).sqrt().round() as u32;
        let area = (self.r / box_size) * box_size + self.c / box_size;
        2 * self.side * self.side + area * self.side + self.n
    }

    fn place_col(&self) -> u32 {
        3 * self.side * self.side + self.r * self.side + self.c
    }
}

/// Bridges a `Board` to a `dlx::Solver` instance: builds the full candidate population
/// and decodes a returned solution's row ids back into `(r, c, n)` triples.
pub struct SudokuMapper {
    // Dense: `populate` assigns every row id in `[0, side^3)` a `(r, c, n)` triple, so a
    // `Vec` indexed by row id is both simpler and faster than a hash map here.
    dl_row_to_cell: Vec<(u32, u32, u32)>,
    side: u32,
}

impl SudokuMapper {
    /// Builds a fully-populated solver for `board`'s side, then deletes the rows implied
    /// by every already-filled cell so the solver only branches over unknowns.
    fn build(board: &Board) -> (Solver, Self) {
        let side = board.side();
        let mut solver = Solver::new(side * side * side, side * side * 4);
        let mut mapper = SudokuMapper {
            dl_row_to_cell: vec![(0, 0, 0); (side * side * side) as usize],
            side,
        };

        mapper.populate(&mut solver);

        for r in 0..side {
            for c in 0..side {
                let n = board.get(r, c);
                if n >= 0 {
                    let m = Mapping {
                        r,
                        c,
                        n: n as u32,
                        side,
                    };
                    solver.delete_row(m.row());
                }
            }
        }

        (solver, mapper)
    }

    fn populate(&mut self, solver: &mut Solver) {
        for r in 0..self.side {
            for c in 0..self.side {
                for n in 0..self.side {
                    let m = Mapping {
                        r,
                        c,
                        n,
                        side: self.side,
                    };
                    let row = m.row();
                    self.dl_row_to_cell[row as usize] = (r, c, n);

                    solver.add(row, m.cell_col());
                    solver.add(row, m.row_col());
                    solver.add(row, m.box_col());
                    solver.add(row, m.place_col());
                }
            }
        }
    }

    /// Writes every `(r, c, n)` implied by `solution`'s row ids into `board`.
    pub fn decode(&self, solution: &[i32], board: &mut Board) {
        for &row in solution {
            let (r, c, n) = self.dl_row_to_cell[row as usize];
            if board.get(r, c) == -1 {
                board.set(r, c, n);
            }
        }
    }
}

/// Parses `puzzle` and builds a populated solver plus its decode mapper.
pub fn create_sudoku_solver(puzzle: &str) -> Result<(Solver, SudokuMapper, Board), Box<dyn Error>> {
    let board = Board::from_str(puzzle)?;
    let (solver, mapper) = SudokuMapper::build(&board);
    Ok((solver, mapper, board))
}

/// Builds a populated solver plus decode mapper for an empty board of the given side.
pub fn create_empty_solver(side: u32) -> (Solver, SudokuMapper, Board) {
    let board = Board::empty(side);
    let (solver, mapper) = SudokuMapper::build(&board);
    (solver, mapper, board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_digit_parsing_reads_dots_as_unknown() {
        let board = Board::from_str(&".".repeat(81)).unwrap();
        assert_eq!(board.side(), 9);
        assert_eq!(board.get(0, 0), -1);
        assert!(!board.is_predefined(0, 0));
    }

    #[test]
    fn single_digit_parsing_reads_digits_zero_based() {
        let mut puzzle = "5".to_string();
        puzzle.push_str(&".".repeat(80));
        let board = Board::from_str(&puzzle).unwrap();
        assert_eq!(board.get(0, 0), 4);
        assert!(board.is_predefined(0, 0));
    }

    #[test]
    fn multi_digit_parsing_handles_pipes_and_two_digit_tokens() {
        let mut side16 = String::new();
        for _ in 0..16 {
            side16.push_str("| ");
            for _ in 0..16 {
                side16.push_str(". ");
            }
            side16.push('\n');
        }
        let board = Board::from_str(&side16).unwrap();
        assert_eq!(board.side(), 16);
        assert!(board.get(0, 0) == -1);
    }

    #[test]
    fn malformed_length_is_rejected() {
        let bad = ".".repeat(80); // not a perfect square
        assert!(Board::from_str(&bad).is_err());
    }

    #[test]
    fn mapping_columns_cover_the_four_constraint_families_disjointly() {
        let side = 9u32;
        let m = Mapping {
            r: 3,
            c: 4,
            n: 2,
            side,
        };
        let cols = [m.cell_col(), m.row_col(), m.box_col(), m.place_col()];
        assert!(cols[0] < side * side);
        assert!(cols[1] >= side * side && cols[1] < 2 * side * side);
        assert!(cols[2] >= 2 * side * side && cols[2] < 3 * side * side);
        assert!(cols[3] >= 3 * side * side && cols[3] < 4 * side * side);
    }

    #[test]
    fn empty_board_solver_solves_and_decodes_to_a_full_valid_grid() {
        let (mut solver, mapper, mut board) = create_empty_solver(9);
        let solution = solver.solve();
        assert!(!solution.is_empty());
        mapper.decode(&solution, &mut board);

        for r in 0..9 {
            for c in 0..9 {
                assert!(board.get(r, c) >= 0);
            }
        }
    }

    #[test]
    fn predefined_cells_survive_decoding_unchanged() {
        let mut puzzle = "5".to_string();
        puzzle.push_str(&".".repeat(80));
        let (mut solver, mapper, mut board) = create_sudoku_solver(&puzzle).unwrap();
        let solution = solver.solve();
        mapper.decode(&solution, &mut board);
        assert_eq!(board.get(0, 0), 4);
    }

    #[test]
    fn display_renders_one_based_digits() {
        let board = Board::empty(9);
        let rendered = board.to_string();
        assert!(rendered.contains('0'));
    }
}
