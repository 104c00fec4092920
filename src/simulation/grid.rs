//! Cell grid shared by the world, the vision system and renderers.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Content of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    /// Nothing there.
    #[default]
    Empty = 0,
    /// Impassable wall.
    Wall = 1,
    /// A food item.
    Food = 2,
    /// A creature.
    Creature = 3,
}

impl Cell {
    /// Numeric cell code (0 empty, 1 wall, 2 food, 3 creature).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Cell::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Wall),
            2 => Some(Cell::Food),
            3 => Some(Cell::Creature),
            _ => None,
        }
    }
}

/// Rectangular grid of cells indexed as `[row, column]`, i.e. `[y, x]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Creates an empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::from_elem((height, width), Cell::Empty),
        }
    }

    /// Creates an empty grid enclosed by walls on every border cell.
    pub fn walled(width: usize, height: usize) -> Self {
        let mut grid = Self::new(width, height);
        for x in 0..width {
            grid.cells[[0, x]] = Cell::Wall;
            grid.cells[[height - 1, x]] = Cell::Wall;
        }
        for y in 0..height {
            grid.cells[[y, 0]] = Cell::Wall;
            grid.cells[[y, width - 1]] = Cell::Wall;
        }
        grid
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// Returns the cell at integer coordinates, `None` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get([y, x]).copied()
    }

    /// Overwrites a cell. Out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut([y, x]) {
            *slot = cell;
        }
    }

    /// Cell containing a continuous position, `None` outside the grid.
    #[inline]
    pub fn cell_at(&self, x: f32, y: f32) -> Option<Cell> {
        self.index_of(x, y).and_then(|(cx, cy)| self.get(cx, cy))
    }

    /// Integer cell coordinates of a continuous position (truncation).
    #[inline]
    pub fn index_of(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let inside = x >= 0.0
            && y >= 0.0
            && x < self.width() as f32
            && y < self.height() as f32;
        inside.then(|| (x as usize, y as usize))
    }

    /// Whether `(x, y)` lies on the outer ring of cells.
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width() || y + 1 == self.height()
    }

    /// Read-only view of the raw cells.
    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// Cell codes as a plain `u8` matrix, the layout renderers consume.
    pub fn to_codes(&self) -> Array2<u8> {
        self.cells.mapv(Cell::code)
    }

    /// Copies every cell of `other` into `self`. Both grids must share a shape.
    pub(crate) fn copy_from(&mut self, other: &Grid) {
        self.cells.assign(&other.cells);
    }
}
