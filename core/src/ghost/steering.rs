use rand::prelude::*;
use rand::rngs::SmallRng;
use smallvec::SmallVec;

use crate::*;

pub type Candidates = SmallVec<[Direction; 4]>;

/// Open directions from `pos` in [`Direction::ALL`] order, never reversing
/// `heading` unless that is the only way out. Doors count only when `door_open`.
pub fn candidate_directions(maze: &Maze, pos: GridPosition, heading: Direction, door_open: bool) -> Candidates {
    let reverse = heading.opposite();
    let mut candidates: Candidates = Direction::ALL
        .into_iter()
        .filter(|&direction| direction != reverse && maze.can_move_through(pos, direction, door_open))
        .collect();

    if candidates.is_empty() && maze.can_move_through(pos, reverse, door_open) {
        candidates.push(reverse);
    }
    candidates
}

/// Frightened ghosts wander at random; everyone else takes the candidate
/// whose next cell is closest to `target`, earlier directions winning ties.
pub fn choose_direction(
    maze: &Maze,
    pos: GridPosition,
    heading: Direction,
    door_open: bool,
    target: GridPosition,
    mode: GhostMode,
    rng: &mut SmallRng,
) -> Direction {
    let candidates = candidate_directions(maze, pos, heading, door_open);
    if candidates.is_empty() {
        return Direction::None;
    }

    if mode == GhostMode::Frightened {
        return candidates[rng.random_range(0..candidates.len())];
    }

    let mut best = candidates[0];
    let mut best_distance = i64::MAX;
    for &direction in &candidates {
        let distance = maze.neighbor(pos, direction).distance_sq(target);
        if distance < best_distance {
            best = direction;
            best_distance = distance;
        }
    }
    best
}
