use std::error::Error;

use cpu_time::ProcessTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::sudoku::create_sudoku_solver;

/// The only solving strategy this crate exposes. Kept as an enum (rather than a bare
/// function) so the HTTP layer's call site reads the same way it did when alternative
/// strategies existed.
#[derive(Debug)]
pub enum SolverType {
    Dlx,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SolvedSudoku {
    pub grid: Vec<Vec<i32>>,
    visited_nodes: u64,
    cpu_time_ms: u128,
}

/// A single puzzle string carried through a `handle_req` batch alongside its result.
pub struct Puzzle {
    puzzle: String,
    result: Option<SolvedSudoku>,
}

impl Puzzle {
    pub fn new(puzzle: String) -> Self {
        Puzzle {
            puzzle,
            result: None,
        }
    }

    fn solve(&mut self, solver_type: &SolverType) -> Result<(), Box<dyn Error>> {
        let start = ProcessTime::now();

        let (mut solver, mapper, mut board) = match solver_type {
            SolverType::Dlx => create_sudoku_solver(&self.puzzle)?,
        };

        let solution = solver.solve();
        mapper.decode(&solution, &mut board);
        debug!("Solved board:\n{}", board);

        self.result = Some(SolvedSudoku {
            grid: board.grid(),
            visited_nodes: solver.visited_nodes(),
            cpu_time_ms: start.elapsed().as_millis(),
        });

        Ok(())
    }

    pub fn into_result(self) -> Option<SolvedSudoku> {
        self.result
    }
}

/// Solves every entry in `data` in place and returns the batch's total CPU time.
pub fn handle_req(data: &mut [Puzzle], solver_type: SolverType) -> Result<u128, Box<dyn Error>> {
    let total = ProcessTime::now();

    for e in data.iter_mut() {
        debug!("Beginning to solve a new Sudoku");
        e.solve(&solver_type)?;
        debug!(
            "Finished the current iteration in {} ms",
            e.result.as_ref().map(|r| r.cpu_time_ms).unwrap_or(0)
        );
    }

    Ok(total.elapsed().as_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_req_solves_an_empty_board() {
        let mut data = vec![Puzzle::new(".".repeat(81))];
        let total_ms = handle_req(&mut data, SolverType::Dlx).unwrap();
        let result = data.pop().unwrap().into_result().unwrap();

        assert!(result.grid.iter().flatten().all(|&v| v >= 0));
        assert!(total_ms < 60_000);
    }

    #[test]
    fn handle_req_preserves_batch_order() {
        let mut data = vec![
            Puzzle::new(".".repeat(81)),
            Puzzle::new(format!("5{}", ".".repeat(80))),
        ];
        handle_req(&mut data, SolverType::Dlx).unwrap();

        assert_eq!(data[1].result.as_ref().unwrap().grid[0][0], 4);
    }
}
