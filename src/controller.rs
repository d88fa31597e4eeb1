use std::str::FromStr;

use actix_web::{post, web, HttpResponse, Responder};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    constraint::check_default_constraints,
    solver::{handle_req, Puzzle, SolverType, SolvedSudoku},
    sudoku::Board,
};

/// Matches the single-digit dotted format: any run of `.` and `1`-`9`.
static SINGLE_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[.\d\s]+$").unwrap());

/// Matches the pipe-delimited multi-digit format: digits, dots, pipes, dashes, and
/// whitespace only.
static MULTI_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d.|\-\s]+$").unwrap());

#[derive(Serialize, Deserialize)]
pub struct Entry {
    pub grid: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub data: Vec<SolvedSudoku>,
    total_cpu_ms: u128,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[post("/solve")]
pub async fn solve(entries: web::Json<Vec<Entry>>) -> impl Responder {
    for e in entries.iter() {
        if let Err(resp) = validate(&e.grid) {
            return HttpResponse::BadRequest().json(resp);
        }
    }

    let mut data = entries
        .iter()
        .map(|e| Puzzle::new(e.grid.clone()))
        .collect::<Vec<_>>();

    let total_cpu_ms = match handle_req(&mut data, SolverType::Dlx) {
        Ok(ms) => ms,
        Err(err) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                code: 400,
                message: err.to_string(),
            })
        }
    };

    let solved = data
        .into_iter()
        .filter_map(Puzzle::into_result)
        .collect::<Vec<_>>();

    info!(
        "Processed {} entries in {} ms",
        entries.len(),
        total_cpu_ms
    );

    HttpResponse::Ok().json(Response {
        data: solved,
        total_cpu_ms,
    })
}

/// Rejects malformed grids (bad characters, wrong size) and semantically invalid ones
/// (grids that already violate default Sudoku constraints) before a solver is built.
fn validate(grid: &str) -> Result<(), ErrorResponse> {
    let syntax_ok = if grid.contains('|') {
        MULTI_DIGIT_RE.is_match(grid)
    } else {
        SINGLE_DIGIT_RE.is_match(grid)
    };

    if !syntax_ok {
        return Err(ErrorResponse {
            code: 400,
            message: "grid contains characters outside the expected puzzle format".into(),
        });
    }

    let board = Board::from_str(grid).map_err(|err| ErrorResponse {
        code: 400,
        message: err.to_string(),
    })?;

    let valid = check_default_constraints(&board.grid(), None).map_err(|err| ErrorResponse {
        code: 400,
        message: err.to_string(),
    })?;

    if !valid {
        return Err(ErrorResponse {
            code: 400,
            message: "grid violates Sudoku's row/column/box constraints".into(),
        });
    }

    Ok(())
}
