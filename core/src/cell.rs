use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cell {
    Empty,
    Wall,
    Dot,
    PowerPellet,
    /// Ghost-house door. Ghosts only pass it on their way out.
    Door,
}

impl Cell {
    /// Open floor for everyone. Doors count as closed here.
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall | Self::Door)
    }

    pub const fn is_passable(self, door_open: bool) -> bool {
        match self {
            Self::Door => door_open,
            _ => self.is_walkable(),
        }
    }

    pub const fn is_edible(self) -> bool {
        matches!(self, Self::Dot | Self::PowerPellet)
    }

    /// Score awarded when the player eats this cell.
    pub const fn points(self) -> u32 {
        use Cell::*;
        match self {
            Dot => 10,
            PowerPellet => 50,
            Empty | Wall | Door => 0,
        }
    }

    pub const fn from_glyph(glyph: char) -> Option<Self> {
        use Cell::*;
        match glyph {
            '#' => Some(Wall),
            '.' => Some(Dot),
            'o' => Some(PowerPellet),
            '-' => Some(Door),
            ' ' => Some(Empty),
            _ => None,
        }
    }

    pub const fn glyph(self) -> char {
        use Cell::*;
        match self {
            Empty => ' ',
            Wall => '#',
            Dot => '.',
            PowerPellet => 'o',
            Door => '-',
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}

/// Missing cells (outside the grid) are never walkable.
pub fn is_walkable(cell: Option<Cell>) -> bool {
    cell.is_some_and(Cell::is_walkable)
}
