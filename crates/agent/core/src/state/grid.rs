use super::common::{Position, Symbol};
use super::error::StateError;

/// Terrain glyphs that appear in grid dumps alongside player symbols.
pub mod glyph {
    /// Unoccupied walkable cell.
    pub const EMPTY: char = '.';
    /// Flag of the lowercase faction.
    pub const FLAG_LOWER: char = 'x';
    /// Flag of the uppercase faction.
    pub const FLAG_UPPER: char = 'X';
    /// Energy recharge cell.
    pub const RECHARGE: char = '$';
}

/// The raw occupancy grid: one character per cell, exactly as last observed.
///
/// A full grid dump replaces the whole grid; status listings patch single
/// cells through [`OccupancyGrid::relocate`], which vacates the old cell and
/// claims the new one as a single step so a tracked symbol never occupies
/// two cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: u32,
    height: u32,
    cells: Vec<char>,
}

impl OccupancyGrid {
    /// Builds a grid from the rows of a dump. Rows must be rectangular.
    pub fn from_rows(rows: &[Vec<char>]) -> Result<Self, StateError> {
        let height = rows.len() as u32;
        let width = rows.first().ok_or(StateError::EmptyGrid)?.len() as u32;
        if width == 0 {
            return Err(StateError::EmptyGrid);
        }
        if rows.iter().any(|row| row.len() as u32 != width) {
            return Err(StateError::RaggedGrid);
        }

        Ok(Self {
            width,
            height,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    fn index(&self, position: Position) -> Result<usize, StateError> {
        if self.contains(position) {
            Ok(position.y as usize * self.width as usize + position.x as usize)
        } else {
            Err(StateError::OutOfBounds {
                x: position.x,
                y: position.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get(&self, position: Position) -> Option<char> {
        self.index(position).ok().map(|i| self.cells[i])
    }

    /// Moves `symbol` from its previous cell to `to` atomically: the target
    /// index is validated before the old cell is vacated, so a failed move
    /// leaves the grid untouched.
    pub fn relocate(
        &mut self,
        symbol: Symbol,
        from: Option<Position>,
        to: Position,
    ) -> Result<(), StateError> {
        let target = self.index(to)?;
        if let Some(previous) = from {
            if let Ok(source) = self.index(previous) {
                if self.cells[source] == symbol.0 {
                    self.cells[source] = glyph::EMPTY;
                }
            }
        }
        self.cells[target] = symbol.0;
        Ok(())
    }

    /// First cell holding `target`, scanning in row-major order.
    pub fn find(&self, target: char) -> Option<Position> {
        self.positions_of(target).next()
    }

    /// All cells holding `target`, in row-major order.
    pub fn positions_of(&self, target: char) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, ch)| {
            (*ch == target).then(|| {
                Position::new(
                    (i % self.width as usize) as i32,
                    (i / self.width as usize) as i32,
                )
            })
        })
    }

    /// Longest possible straight-line distance on this grid.
    pub fn diagonal(&self) -> f64 {
        Position::ORIGIN.euclidean(Position::new(self.width as i32 - 1, self.height as i32 - 1))
    }
}

/// Per-cell danger weights produced by the weighted-map generator.
///
/// A weight of exactly [`DangerGrid::SAFE`] marks a safe cell; larger
/// weights mean the cell is inside some opponent's effective reach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DangerGrid {
    width: u32,
    height: u32,
    weights: Vec<u32>,
}

impl DangerGrid {
    /// The weight denoting a safe cell.
    pub const SAFE: u32 = 1;

    pub fn uniform(width: u32, height: u32, weight: u32) -> Self {
        Self {
            width,
            height,
            weights: vec![weight; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, position: Position) -> Option<u32> {
        if position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
        {
            Some(self.weights[position.y as usize * self.width as usize + position.x as usize])
        } else {
            None
        }
    }

    pub fn set(&mut self, position: Position, weight: u32) -> Result<(), StateError> {
        if let Some(cell) = self.cell_index(position) {
            self.weights[cell] = weight;
            Ok(())
        } else {
            Err(StateError::OutOfBounds {
                x: position.x,
                y: position.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn is_safe(&self, position: Position) -> bool {
        self.get(position) == Some(Self::SAFE)
    }

    fn cell_index(&self, position: Position) -> Option<usize> {
        (position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }
}
