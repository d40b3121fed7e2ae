use serde::{Deserialize, Serialize};

/// Single grid axis. Signed so that AI targets may point outside the maze.
pub type Coord = i32;

/// Integer grid cell `(row, col)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: Coord,
    pub col: Coord,
}

impl GridPosition {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    pub const fn offset(self, d_row: Coord, d_col: Coord) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    /// Applies the unit vector of `direction` without any wraparound.
    pub const fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.offset(d_row, d_col)
    }

    /// Squared Euclidean distance, which orders the same as the real distance.
    pub const fn distance_sq(self, other: Self) -> i64 {
        let d_row = (self.row - other.row) as i64;
        let d_col = (self.col - other.col) as i64;
        d_row * d_row + d_col * d_col
    }
}

impl From<(Coord, Coord)> for GridPosition {
    fn from((row, col): (Coord, Coord)) -> Self {
        Self::new(row, col)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// Movement directions in the order the ghost AI enumerates them.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub const fn delta(self) -> (Coord, Coord) {
        use Direction::*;
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
            None => (0, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        use Direction::*;
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
            None => None,
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// True for two real directions pointing exactly against each other.
    pub const fn is_opposite_of(self, other: Self) -> bool {
        !self.is_none() && !other.is_none() && self.opposite() as u8 == other as u8
    }
}
