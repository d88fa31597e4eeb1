pub mod constraint;
pub mod controller;
pub mod dlx;
pub mod middleware;
pub mod solver;
pub mod sudoku;

// Necessary to export the modules to be integration tested in 'tests'
