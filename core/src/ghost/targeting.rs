use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::*;

/// Fixed reference cell the pincer ghost reflects its lead point through.
pub const PINCER_ANCHOR: GridPosition = GridPosition::new(11, 13);

pub const AMBUSH_LEAD: Coord = 4;
pub const PINCER_LEAD: Coord = 2;

/// What the ghosts know about the player when choosing targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pursuit {
    pub player: GridPosition,
    pub heading: Direction,
}

/// Target cell for a ghost of `kind` standing on `ghost`. Targets may lie
/// outside the maze; only their distance to candidate cells matters.
pub fn target_for(
    kind: GhostKind,
    mode: GhostMode,
    ghost: GridPosition,
    pursuit: &Pursuit,
    maze: &Maze,
    rng: &mut SmallRng,
) -> GridPosition {
    use GhostMode::*;
    match mode {
        Frightened => random_cell(maze, rng),
        Scatter => kind.scatter_corner(),
        Chase => chase_target(kind, ghost, pursuit),
    }
}

pub fn chase_target(kind: GhostKind, ghost: GridPosition, pursuit: &Pursuit) -> GridPosition {
    use GhostKind::*;
    let Pursuit { player, heading } = *pursuit;
    match kind {
        Blinky => player,
        Pinky => ambush_point(player, heading),
        Inky => {
            let pivot = lead(player, heading, PINCER_LEAD);
            pivot.offset(pivot.row - PINCER_ANCHOR.row, pivot.col - PINCER_ANCHOR.col)
        }
        Clyde | Sue => match kind.shy_radius() {
            Some(radius) if ghost.distance_sq(player) <= radius * radius => kind.scatter_corner(),
            _ => player,
        },
    }
}

/// Four cells ahead of the player. Facing up it also drifts four cells left,
/// reproducing the overflow bug of the 1980 arcade game.
fn ambush_point(player: GridPosition, heading: Direction) -> GridPosition {
    match heading {
        Direction::Up => player.offset(-AMBUSH_LEAD, -AMBUSH_LEAD),
        _ => lead(player, heading, AMBUSH_LEAD),
    }
}

const fn lead(player: GridPosition, heading: Direction, cells: Coord) -> GridPosition {
    let (d_row, d_col) = heading.delta();
    player.offset(d_row * cells, d_col * cells)
}

fn random_cell(maze: &Maze, rng: &mut SmallRng) -> GridPosition {
    GridPosition::new(rng.random_range(0..maze.rows()), rng.random_range(0..maze.cols()))
}
