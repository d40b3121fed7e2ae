use alloc::string::String;
use alloc::vec::Vec;

use ndarray::Array2;
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::*;

pub const CLASSIC_ROWS: usize = 31;
pub const CLASSIC_COLS: usize = 28;

/// Where the player starts every life and every level.
pub const PLAYER_SPAWN: GridPosition = GridPosition::new(23, 13);

/// Cell just above the ghost-house door. Ghosts below this row are still
/// inside the house and head here first.
pub const HOUSE_EXIT: GridPosition = GridPosition::new(11, 13);

pub const CLASSIC_LAYOUT: [&str; CLASSIC_ROWS] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###--### ##.#     ",
    "######.## #      # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Grid of cells indexed `[row, col]`. The shape never changes after
/// construction; only edible cells turn into empty ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Maze {
    cells: Array2<Cell>,
}

impl Maze {
    /// Fresh copy of the built-in level with every dot restored.
    pub fn classic() -> Self {
        Self::parse(&CLASSIC_LAYOUT).expect("classic layout should be well-formed")
    }

    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(GameError::InvalidLayout("maze has no rows"));
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(GameError::InvalidLayout("maze has no columns"));
        }

        let mut cells = Vec::with_capacity(rows.len() * width);
        for row in rows {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(GameError::InvalidLayout("rows differ in width"));
            }
            for glyph in row.chars() {
                let cell = Cell::from_glyph(glyph).ok_or(GameError::InvalidLayout("unknown glyph"))?;
                cells.push(cell);
            }
        }

        let cells = Array2::from_shape_vec((rows.len(), width), cells)
            .map_err(|_| GameError::InvalidLayout("rows differ in width"))?;
        Ok(Self { cells })
    }

    pub fn rows(&self) -> Coord {
        self.cells.nrows() as Coord
    }

    pub fn cols(&self) -> Coord {
        self.cells.ncols() as Coord
    }

    pub fn in_bounds(&self, pos: GridPosition) -> bool {
        self.nd_index(pos).is_some()
    }

    pub fn get_cell(&self, pos: GridPosition) -> Option<Cell> {
        self.nd_index(pos).map(|index| self.cells[index])
    }

    pub fn is_walkable(&self, pos: GridPosition) -> bool {
        is_walkable(self.get_cell(pos))
    }

    /// Horizontal tunnel wraparound. Rows are left untouched.
    pub fn wrap(&self, pos: GridPosition) -> GridPosition {
        let cols = self.cols();
        let col = if pos.col < 0 {
            cols - 1
        } else if pos.col >= cols {
            0
        } else {
            pos.col
        };
        GridPosition::new(pos.row, col)
    }

    pub fn neighbor(&self, pos: GridPosition, direction: Direction) -> GridPosition {
        self.wrap(pos.step(direction))
    }

    pub fn can_move(&self, pos: GridPosition, direction: Direction) -> bool {
        self.can_move_through(pos, direction, false)
    }

    /// Like [`Maze::can_move`], but door cells count as open when `door_open`.
    pub fn can_move_through(&self, pos: GridPosition, direction: Direction, door_open: bool) -> bool {
        !direction.is_none()
            && self
                .get_cell(self.neighbor(pos, direction))
                .is_some_and(|cell| cell.is_passable(door_open))
    }

    pub fn count_dots(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_edible()).count()
    }

    /// Eats the dot or pellet at `pos`, returning what was there. A cell can
    /// only be eaten once.
    pub fn consume(&mut self, pos: GridPosition) -> Option<Cell> {
        let index = self.nd_index(pos)?;
        let cell = self.cells[index];
        if !cell.is_edible() {
            return None;
        }
        self.cells[index] = Cell::Empty;
        Some(cell)
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (GridPosition, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| (GridPosition::new(row as Coord, col as Coord), cell))
    }

    #[cfg(test)]
    pub(crate) fn set_cell(&mut self, pos: GridPosition, cell: Cell) -> Option<Cell> {
        let index = self.nd_index(pos)?;
        Some(core::mem::replace(&mut self.cells[index], cell))
    }

    fn nd_index(&self, pos: GridPosition) -> Option<[usize; 2]> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        (row < self.cells.nrows() && col < self.cells.ncols()).then_some([row, col])
    }
}

impl Default for Maze {
    fn default() -> Self {
        Self::classic()
    }
}

/// Renderers receive the grid as one glyph string per row.
impl Serialize for Maze {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.cells.nrows()))?;
        for row in self.cells.rows() {
            let line: String = row.iter().map(|cell| cell.glyph()).collect();
            seq.serialize_element(&line)?;
        }
        seq.end()
    }
}
