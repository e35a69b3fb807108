//! Cell placement on the board: free-cell enumeration, random sampling and
//! Minesweeper-style bomb hints.
//!
//! Occupancy is passed in as a predicate so callers can combine the snake,
//! food and bomb sets without building a temporary union.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::state::{Position, Snake};

/// Every unoccupied cell, in row-major order
pub fn free_cells<F>(width: usize, height: usize, is_occupied: F) -> Vec<Position>
where
    F: Fn(Position) -> bool,
{
    (0..height as i32)
        .flat_map(|y| (0..width as i32).map(move |x| Position::new(x, y)))
        .filter(|pos| !is_occupied(*pos))
        .collect()
}

/// Choose `min(n, free.len())` distinct cells uniformly at random
pub fn sample_n<R: Rng + ?Sized>(free: &[Position], n: usize, rng: &mut R) -> HashSet<Position> {
    free.choose_multiple(rng, n).copied().collect()
}

/// Number of bombs in the 3x3 block centred on `cell`.
///
/// The centre counts too, so a hint shown on a bomb cell includes it.
/// Off-board neighbours never hold bombs and contribute nothing.
pub fn adjacent_bomb_count(cell: Position, bombs: &HashSet<Position>) -> u8 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if bombs.contains(&cell.moved_by(dx, dy)) {
                count += 1;
            }
        }
    }
    count
}

/// Food for a new round: any cell not under the snake
pub fn generate_food<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    snake: &Snake,
    count: usize,
    rng: &mut R,
) -> HashSet<Position> {
    let free = free_cells(width, height, |pos| snake.contains(pos));
    sample_n(&free, count, rng)
}

/// Bombs for a new round: any cell not under the snake or food
pub fn generate_bombs<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    snake: &Snake,
    food: &HashSet<Position>,
    count: usize,
    rng: &mut R,
) -> HashSet<Position> {
    let free = free_cells(width, height, |pos| snake.contains(pos) || food.contains(&pos));
    sample_n(&free, count, rng)
}

/// Find a random free cell.
///
/// Probes up to `attempts` random cells first; if all are taken, falls back
/// to a full scan so a crowded board still finds its last free cell. Returns
/// `None` only when the board is full.
pub fn random_free_cell<R, F>(
    width: usize,
    height: usize,
    is_occupied: F,
    attempts: usize,
    rng: &mut R,
) -> Option<Position>
where
    R: Rng + ?Sized,
    F: Fn(Position) -> bool,
{
    if width == 0 || height == 0 {
        return None;
    }
    for _ in 0..attempts {
        let x = rng.gen_range(0..width) as i32;
        let y = rng.gen_range(0..height) as i32;
        let pos = Position::new(x, y);
        if !is_occupied(pos) {
            return Some(pos);
        }
    }
    free_cells(width, height, is_occupied).choose(rng).copied()
}
