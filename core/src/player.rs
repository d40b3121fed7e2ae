use serde::Serialize;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub motion: Motion,
    /// Buffered input, retried every time the player settles.
    pub next_direction: Direction,
    pub lives: u32,
    pub mouth_open: bool,
}

impl Player {
    pub const fn new(spawn: GridPosition, lives: u32) -> Self {
        Self {
            motion: Motion::settled(spawn, Direction::None),
            next_direction: Direction::None,
            lives,
            mouth_open: true,
        }
    }

    pub const fn position(&self) -> GridPosition {
        self.motion.position
    }

    pub const fn heading(&self) -> Direction {
        self.motion.direction
    }

    pub fn steer(&mut self, direction: Direction) {
        self.next_direction = direction;
    }

    /// Moves along the maze. Arriving on a cell flips the mouth; eating what
    /// lies there is left to the session.
    pub fn advance(&mut self, maze: &Maze, delta_ms: f64, cell_ms: f64) -> Step {
        let step = self.motion.advance(maze, delta_ms, cell_ms, self.next_direction);
        if let Step::Arrived(_) = step {
            self.mouth_open = !self.mouth_open;
        }
        step
    }

    /// Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub const fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }

    /// Back to `spawn` with no heading or buffered input. Lives are kept.
    pub fn reset_position(&mut self, spawn: GridPosition) {
        self.motion = Motion::settled(spawn, Direction::None);
        self.next_direction = Direction::None;
        self.mouth_open = true;
    }
}
