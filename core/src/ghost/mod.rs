use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;
pub use steering::*;
pub use targeting::*;

mod steering;
mod targeting;

/// Ghost levels speed up by 5% per level, but never beyond twice the base pace.
pub const MIN_LEVEL_SPEED_MULTIPLIER: f64 = 0.5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GhostKind {
    /// Chases the player's cell directly.
    Blinky,
    /// Ambushes four cells ahead of the player.
    Pinky,
    /// Pincers the player by reflecting a lead point through a fixed anchor.
    Inky,
    /// Chases from afar, retreats to its corner when within eight cells.
    Clyde,
    /// Like Clyde with a five-cell radius.
    Sue,
}

impl GhostKind {
    pub const ALL: [GhostKind; 5] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
        GhostKind::Sue,
    ];

    /// Multiplier on the base cell time; larger is slower.
    pub const fn speed_factor(self) -> f64 {
        use GhostKind::*;
        match self {
            Blinky => 1.0,
            Pinky => 1.05,
            Inky => 1.1,
            Clyde => 1.15,
            Sue => 1.2,
        }
    }

    pub const fn scatter_corner(self) -> GridPosition {
        use GhostKind::*;
        match self {
            Blinky => GridPosition::new(0, 26),
            Pinky => GridPosition::new(0, 2),
            Inky => GridPosition::new(31, 27),
            Clyde => GridPosition::new(31, 0),
            Sue => GridPosition::new(15, 0),
        }
    }

    /// Spawn cell, also where the ghost reappears after being eaten.
    pub const fn home(self) -> GridPosition {
        use GhostKind::*;
        match self {
            Blinky => GridPosition::new(11, 13),
            Pinky => GridPosition::new(14, 13),
            Inky => GridPosition::new(14, 11),
            Clyde => GridPosition::new(14, 15),
            Sue => GridPosition::new(13, 13),
        }
    }

    pub const fn initial_direction(self) -> Direction {
        use GhostKind::*;
        match self {
            Blinky => Direction::Left,
            Pinky => Direction::Down,
            Inky | Clyde => Direction::Up,
            Sue => Direction::Right,
        }
    }

    pub const fn starts_in_house(self) -> bool {
        self.home().row > HOUSE_EXIT.row
    }

    /// Chase gives way to the scatter corner within this many cells.
    pub const fn shy_radius(self) -> Option<i64> {
        use GhostKind::*;
        match self {
            Clyde => Some(8),
            Sue => Some(5),
            Blinky | Pinky | Inky => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GhostMode {
    Chase,
    Scatter,
    Frightened,
}

impl GhostMode {
    /// Chase and scatter swap; frightened is left to the power timer.
    pub const fn toggled(self) -> Self {
        use GhostMode::*;
        match self {
            Chase => Scatter,
            Scatter => Chase,
            Frightened => Frightened,
        }
    }
}

pub fn level_speed_multiplier(level: u32) -> f64 {
    (1.0 - 0.05 * level as f64).max(MIN_LEVEL_SPEED_MULTIPLIER)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ghost {
    pub kind: GhostKind,
    pub motion: Motion,
    pub mode: GhostMode,
    /// Milliseconds needed to cross one cell.
    pub speed: f64,
    pub target_position: GridPosition,
    /// Set while the ghost makes its way out through the house door.
    pub leaving_house: bool,
}

impl Ghost {
    pub fn spawn(kind: GhostKind, level: u32, config: &GameConfig) -> Self {
        Self {
            kind,
            motion: Motion::settled(kind.home(), kind.initial_direction()),
            mode: GhostMode::Scatter,
            speed: Self::cruising_speed(kind, level, config),
            target_position: kind.scatter_corner(),
            leaving_house: kind.starts_in_house(),
        }
    }

    pub fn cruising_speed(kind: GhostKind, level: u32, config: &GameConfig) -> f64 {
        config.ghost_cell_ms * kind.speed_factor() * level_speed_multiplier(level)
    }

    pub fn is_frightened(&self) -> bool {
        self.mode == GhostMode::Frightened
    }

    pub fn frighten(&mut self, config: &GameConfig) {
        self.mode = GhostMode::Frightened;
        self.speed = config.frightened_cell_ms;
    }

    /// Ends fright: back to chasing at the kind's pace for this level.
    pub fn calm(&mut self, level: u32, config: &GameConfig) {
        if self.is_frightened() {
            self.mode = GhostMode::Chase;
            self.speed = Self::cruising_speed(self.kind, level, config);
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Sent home after being eaten. Only the level scales its pace here.
    pub fn respawn(&mut self, level: u32, config: &GameConfig) {
        self.motion = Motion::settled(self.kind.home(), self.motion.direction);
        self.leaving_house = self.kind.starts_in_house();
        self.mode = GhostMode::Chase;
        self.speed = config.ghost_cell_ms * level_speed_multiplier(level);
    }

    /// Back to the spawn cell in scatter mode, as after the player dies.
    pub fn return_to_spawn(&mut self) {
        self.motion = Motion::settled(self.kind.home(), self.kind.initial_direction());
        self.leaving_house = self.kind.starts_in_house();
        self.mode = GhostMode::Scatter;
    }

    /// Settled ghosts pick a new target and direction before moving on. Until
    /// it clears the door a ghost heads straight for [`HOUSE_EXIT`] whatever
    /// its mode.
    pub fn update(&mut self, maze: &Maze, pursuit: &Pursuit, rng: &mut SmallRng, delta_ms: f64) -> Step {
        let door_open = self.leaving_house;
        let requested = if self.motion.is_moving {
            Direction::None
        } else {
            let position = self.motion.position;
            let (target, mode) = if door_open {
                (HOUSE_EXIT, GhostMode::Chase)
            } else {
                (target_for(self.kind, self.mode, position, pursuit, maze, rng), self.mode)
            };
            self.target_position = target;
            choose_direction(maze, position, self.motion.direction, door_open, target, mode, rng)
        };

        let step = self.motion.advance_through(maze, delta_ms, self.speed, requested, door_open);
        if let Step::Arrived(cell) = step
            && cell.row <= HOUSE_EXIT.row
        {
            self.leaving_house = false;
        }
        step
    }
}
