use serde::{Deserialize, Serialize};

use crate::*;

/// What a call to [`Motion::advance`] did.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Step {
    Idle,
    Started(Direction),
    InTransit,
    /// Settled into a new cell; arrival side effects belong to the caller.
    Arrived(GridPosition),
}

/// Cell-to-cell interpolated movement shared by the player and the ghosts.
///
/// While `is_moving` the entity sits between `position` and the neighbour in
/// `direction`, `move_progress` of the way along, always in `[0, 1)`. While
/// settled, `move_progress` is exactly zero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motion {
    pub position: GridPosition,
    pub direction: Direction,
    pub is_moving: bool,
    pub move_progress: f64,
}

impl Motion {
    pub const fn settled(position: GridPosition, direction: Direction) -> Self {
        Self {
            position,
            direction,
            is_moving: false,
            move_progress: 0.0,
        }
    }

    /// Advances one tick. A settled entity only tries to start moving; a
    /// moving one accrues `delta_ms / cell_ms` of progress and settles on the
    /// next (wrapped) cell once it reaches a whole cell.
    pub fn advance(&mut self, maze: &Maze, delta_ms: f64, cell_ms: f64, requested: Direction) -> Step {
        self.advance_through(maze, delta_ms, cell_ms, requested, false)
    }

    /// [`Motion::advance`] with the ghost-house door open when `door_open`.
    pub fn advance_through(
        &mut self,
        maze: &Maze,
        delta_ms: f64,
        cell_ms: f64,
        requested: Direction,
        door_open: bool,
    ) -> Step {
        if !self.is_moving {
            return self.try_start(maze, requested, door_open);
        }

        self.move_progress += delta_ms / cell_ms.max(1.0);
        if self.move_progress < 1.0 {
            return Step::InTransit;
        }

        let cell = maze.neighbor(self.position, self.direction);
        self.settle(cell);
        Step::Arrived(cell)
    }

    /// Starts towards `requested` if that neighbour is walkable, otherwise
    /// keeps going the current way if possible, otherwise stays put.
    pub fn try_start(&mut self, maze: &Maze, requested: Direction, door_open: bool) -> Step {
        let direction = if maze.can_move_through(self.position, requested, door_open) {
            requested
        } else if maze.can_move_through(self.position, self.direction, door_open) {
            self.direction
        } else {
            return Step::Idle;
        };

        self.direction = direction;
        self.is_moving = true;
        self.move_progress = 0.0;
        Step::Started(direction)
    }

    pub fn settle(&mut self, position: GridPosition) {
        self.position = position;
        self.is_moving = false;
        self.move_progress = 0.0;
    }

    /// The cell being entered, or the current cell when settled.
    pub fn transit_target(&self, maze: &Maze) -> GridPosition {
        if self.is_moving {
            maze.neighbor(self.position, self.direction)
        } else {
            self.position
        }
    }

    /// Interpolated `(row, col)` for drawing. Not wrapped, so an entity in the
    /// tunnel briefly reports a column just outside the grid.
    pub fn render_position(&self) -> (f64, f64) {
        let (d_row, d_col) = self.direction.delta();
        let t = if self.is_moving { self.move_progress } else { 0.0 };
        (
            self.position.row as f64 + d_row as f64 * t,
            self.position.col as f64 + d_col as f64 * t,
        )
    }
}
