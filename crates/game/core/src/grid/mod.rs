//! Fixed-size board of cells with 4-directional adjacency.
//!
//! The grid owns terrain (movement cost, walkability, vision blocking) and
//! occupancy. Occupancy is maintained by commits and spawning; a cell's
//! occupant always points back to a unit standing on that cell.
mod search;

pub use search::{SearchArena, SearchState};

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::state::{Position, UnitId};

/// Board size in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Dense index of a cell, used by side arrays such as [`SearchArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardinalDirection {
    North,
    East,
    West,
    South,
}

impl CardinalDirection {
    /// Neighbor expansion order.
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::East,
        CardinalDirection::West,
        CardinalDirection::South,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, 1),
            CardinalDirection::South => (0, -1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
        }
    }
}

bitflags! {
    /// Terrain and presentation flags of a cell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        const WALKABLE      = 1 << 0;
        const BLOCKS_VISION = 1 << 1;
        /// Mirror of the vision system's fog state, for presentation.
        const VISIBLE       = 1 << 2;
        /// Mirror of the vision system's light state, for presentation.
        const ILLUMINATED   = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    /// Cost of entering the cell. Always at least 1.
    pub movement_cost: u32,
    pub flags: CellFlags,
    pub occupant: Option<UnitId>,
}

impl Cell {
    fn floor(position: Position) -> Self {
        Self {
            position,
            movement_cost: 1,
            flags: CellFlags::WALKABLE,
            occupant: None,
        }
    }

    pub fn is_walkable(&self) -> bool {
        self.flags.contains(CellFlags::WALKABLE)
    }

    pub fn blocks_vision(&self) -> bool {
        self.flags.contains(CellFlags::BLOCKS_VISION)
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Walkable and unoccupied.
    pub fn is_enterable(&self) -> bool {
        self.is_walkable() && !self.is_occupied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dimensions: GridDimensions,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an open board where every cell is walkable floor of cost 1.
    pub fn new(dimensions: GridDimensions) -> Self {
        let mut cells = Vec::with_capacity(dimensions.cell_count());
        for y in 0..dimensions.height as i32 {
            for x in 0..dimensions.width as i32 {
                cells.push(Cell::floor(Position::new(x, y)));
            }
        }
        Self { dimensions, cells }
    }

    pub fn open(width: u32, height: u32) -> Self {
        Self::new(GridDimensions::new(width, height))
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_id(&self, position: Position) -> Option<CellId> {
        if !self.contains(position) {
            return None;
        }
        Some(CellId(
            position.y as usize * self.dimensions.width as usize + position.x as usize,
        ))
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    pub fn cell_at(&self, position: Position) -> Option<&Cell> {
        self.cell_id(position).and_then(|id| self.cells.get(id.0))
    }

    fn cell_at_mut(&mut self, position: Position) -> Option<&mut Cell> {
        let id = self.cell_id(position)?;
        self.cells.get_mut(id.0)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// In-bounds orthogonal neighbors, in [`CardinalDirection::ALL`] order.
    pub fn neighbors(&self, position: Position) -> ArrayVec<Position, 4> {
        let mut neighbors = ArrayVec::new();
        if !self.contains(position) {
            return neighbors;
        }
        for direction in CardinalDirection::ALL {
            let (dx, dy) = direction.delta();
            let next = position.offset(dx, dy);
            if self.contains(next) {
                neighbors.push(next);
            }
        }
        neighbors
    }

    // ===== terrain =====

    /// Sets the cost of entering a cell; zero is raised to 1.
    pub fn set_movement_cost(&mut self, position: Position, cost: u32) -> bool {
        match self.cell_at_mut(position) {
            Some(cell) => {
                cell.movement_cost = cost.max(1);
                true
            }
            None => false,
        }
    }

    pub fn set_walkable(&mut self, position: Position, walkable: bool) -> bool {
        self.set_flag(position, CellFlags::WALKABLE, walkable)
    }

    pub fn set_blocks_vision(&mut self, position: Position, blocks: bool) -> bool {
        self.set_flag(position, CellFlags::BLOCKS_VISION, blocks)
    }

    /// Impassable, sight-blocking wall.
    pub fn set_wall(&mut self, position: Position) -> bool {
        self.set_walkable(position, false) && self.set_blocks_vision(position, true)
    }

    pub(crate) fn set_flag(&mut self, position: Position, flag: CellFlags, value: bool) -> bool {
        match self.cell_at_mut(position) {
            Some(cell) => {
                cell.flags.set(flag, value);
                true
            }
            None => false,
        }
    }

    pub fn blocks_vision(&self, position: Position) -> bool {
        self.cell_at(position).is_some_and(Cell::blocks_vision)
    }

    // ===== occupancy =====

    pub fn occupant(&self, position: Position) -> Option<UnitId> {
        self.cell_at(position).and_then(|cell| cell.occupant)
    }

    /// Places `unit` on an empty cell. Returns false if out of bounds or taken.
    pub fn place_occupant(&mut self, position: Position, unit: UnitId) -> bool {
        match self.cell_at_mut(position) {
            Some(cell) if cell.occupant.is_none() => {
                cell.occupant = Some(unit);
                true
            }
            _ => false,
        }
    }

    /// Clears the cell if `unit` stands on it. Returns false otherwise.
    pub fn remove_occupant(&mut self, position: Position, unit: UnitId) -> bool {
        match self.cell_at_mut(position) {
            Some(cell) if cell.occupant == Some(unit) => {
                cell.occupant = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_two_neighbors() {
        let grid = Grid::open(5, 5);
        let neighbors = grid.neighbors(Position::new(0, 0));
        assert_eq!(
            neighbors.as_slice(),
            &[Position::new(0, 1), Position::new(1, 0)]
        );
    }

    #[test]
    fn interior_neighbors_follow_expansion_order() {
        let grid = Grid::open(5, 5);
        let neighbors = grid.neighbors(Position::new(2, 2));
        assert_eq!(
            neighbors.as_slice(),
            &[
                Position::new(2, 3),
                Position::new(3, 2),
                Position::new(1, 2),
                Position::new(2, 1),
            ]
        );
    }

    #[test]
    fn out_of_bounds_queries_are_safe() {
        let mut grid = Grid::open(3, 3);
        let outside = Position::new(-1, 4);
        assert!(grid.cell_at(outside).is_none());
        assert!(grid.neighbors(outside).is_empty());
        assert!(!grid.set_movement_cost(outside, 2));
        assert!(!grid.place_occupant(outside, UnitId(0)));
        assert!(!grid.blocks_vision(outside));
    }

    #[test]
    fn occupancy_is_exclusive() {
        let mut grid = Grid::open(3, 3);
        let cell = Position::new(1, 1);
        assert!(grid.place_occupant(cell, UnitId(0)));
        assert!(!grid.place_occupant(cell, UnitId(1)));
        assert!(!grid.remove_occupant(cell, UnitId(1)));
        assert!(grid.remove_occupant(cell, UnitId(0)));
        assert_eq!(grid.occupant(cell), None);
    }

    #[test]
    fn zero_movement_cost_is_raised() {
        let mut grid = Grid::open(2, 2);
        grid.set_movement_cost(Position::new(1, 1), 0);
        assert_eq!(
            grid.cell_at(Position::new(1, 1)).map(|c| c.movement_cost),
            Some(1)
        );
    }

    #[test]
    fn wall_blocks_walking_and_sight() {
        let mut grid = Grid::open(3, 3);
        let wall = Position::new(1, 1);
        assert!(grid.set_wall(wall));
        let cell = grid.cell_at(wall).unwrap();
        assert!(!cell.is_walkable());
        assert!(cell.blocks_vision());
    }
}
