use std::{collections::HashSet, error::Error, hash::Hash};

/// Checks for default Sudoku constraints, i.e. all numbers on the same row, column, and
/// box are unique, generalized to any side whose square root is an integer. If `pos` is
/// `Some((i, j))`, the check is streamlined to just the row, column, and box that cell
/// belongs to.
pub fn check_default_constraints(
    grid: &[Vec<i32>],
    pos: Option<(usize, usize)>,
) -> Result<bool, Box<dyn Error>> {
    let side = grid.len();
    let box_size = (side as f64).sqrt().round() as usize;

    if box_size * box_size != side {
        return Err("grid side is not a perfect square".into());
    }

    match pos {
        Some((i, j)) => Ok(check_row(grid, i)
            && check_col(grid, j)
            && check_box(grid, box_size, i / box_size, j / box_size)),
        None => Ok((0..side).all(|i| check_row(grid, i))
            && (0..side).all(|j| check_col(grid, j))
            && (0..box_size)
                .all(|br| (0..box_size).all(|bc| check_box(grid, box_size, br, bc)))),
    }
}

fn check_row(grid: &[Vec<i32>], row_idx: usize) -> bool {
    has_unique_items(grid[row_idx].iter().filter(|&&x| x != -1))
}

fn check_col(grid: &[Vec<i32>], col_idx: usize) -> bool {
    has_unique_items(grid.iter().map(|row| row[col_idx]).filter(|&x| x != -1))
}

fn check_box(grid: &[Vec<i32>], box_size: usize, br_idx: usize, bc_idx: usize) -> bool {
    let square = grid
        .iter()
        .skip(br_idx * box_size)
        .take(box_size)
        .flat_map(|row| row.iter().skip(bc_idx * box_size).take(box_size))
        .filter(|&&x| x != -1);

    has_unique_items(square)
}

pub fn has_unique_items<T>(iter: T) -> bool
where
    T: IntoIterator,
    T::Item: Eq + Hash,
{
    let mut uniq = HashSet::new();
    iter.into_iter().all(move |x| uniq.insert(x))
}
