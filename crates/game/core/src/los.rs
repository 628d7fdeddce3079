//! Line of sight between cells.
//!
//! Lines are rasterized with integer Bresenham. The raster is always drawn
//! from the smaller endpoint (by `Position` ordering, x then y) to the larger
//! one, so `a` sees `b` exactly when `b` sees `a`. Only cells strictly between
//! the endpoints can block; the endpoints' own flags are ignored.

use crate::grid::Grid;
use crate::state::Position;

/// Cells on the Bresenham segment from `from` to `to`, both inclusive.
#[derive(Clone, Debug)]
pub struct BresenhamLine {
    current: Position,
    end: Position,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(from: Position, to: Position) -> Self {
        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();
        Self {
            current: from,
            end: to,
            dx,
            dy,
            sx: if from.x < to.x { 1 } else { -1 },
            sy: if from.y < to.y { 1 } else { -1 },
            err: dx - dy,
            done: false,
        }
    }

    /// Segment between `a` and `b` in canonical direction.
    pub fn canonical(a: Position, b: Position) -> Self {
        if a <= b { Self::new(a, b) } else { Self::new(b, a) }
    }
}

impl Iterator for BresenhamLine {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.done {
            return None;
        }
        let point = self.current;
        if point == self.end {
            self.done = true;
            return Some(point);
        }

        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.current.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.current.y += self.sy;
        }
        Some(point)
    }
}

/// Returns true if no cell strictly between `from` and `to` blocks vision.
///
/// Out-of-bounds endpoints never see anything. A cell always sees itself.
pub fn has_line_of_sight(grid: &Grid, from: Position, to: Position) -> bool {
    if !grid.contains(from) || !grid.contains(to) {
        return false;
    }
    BresenhamLine::canonical(from, to)
        .filter(|cell| *cell != from && *cell != to)
        .all(|cell| !grid.blocks_vision(cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_includes_both_endpoints() {
        let cells: Vec<_> = BresenhamLine::new(Position::new(0, 0), Position::new(3, 1)).collect();
        assert_eq!(cells.first(), Some(&Position::new(0, 0)));
        assert_eq!(cells.last(), Some(&Position::new(3, 1)));
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn wall_between_blocks_sight() {
        let mut grid = Grid::open(5, 5);
        grid.set_blocks_vision(Position::new(2, 0), true);
        assert!(!has_line_of_sight(&grid, Position::new(0, 0), Position::new(4, 0)));
        assert!(!has_line_of_sight(&grid, Position::new(4, 0), Position::new(0, 0)));
    }

    #[test]
    fn endpoint_flags_are_ignored() {
        let mut grid = Grid::open(5, 5);
        grid.set_blocks_vision(Position::new(0, 0), true);
        grid.set_blocks_vision(Position::new(3, 0), true);
        assert!(has_line_of_sight(&grid, Position::new(0, 0), Position::new(3, 0)));
    }

    #[test]
    fn adjacent_cells_always_see_each_other() {
        let mut grid = Grid::open(3, 3);
        for cell in [Position::new(1, 1), Position::new(2, 1), Position::new(2, 2)] {
            grid.set_blocks_vision(cell, true);
        }
        let center = Position::new(1, 1);
        for neighbor in [Position::new(2, 1), Position::new(2, 2), Position::new(1, 2)] {
            assert!(has_line_of_sight(&grid, center, neighbor));
            assert!(has_line_of_sight(&grid, neighbor, center));
        }
    }

    #[test]
    fn sight_is_symmetric_on_a_cluttered_board() {
        let mut grid = Grid::open(8, 8);
        for cell in [
            Position::new(2, 3),
            Position::new(4, 4),
            Position::new(5, 1),
            Position::new(1, 6),
            Position::new(6, 5),
        ] {
            grid.set_blocks_vision(cell, true);
        }

        for ax in 0..8 {
            for ay in 0..8 {
                for bx in 0..8 {
                    for by in 0..8 {
                        let a = Position::new(ax, ay);
                        let b = Position::new(bx, by);
                        assert_eq!(
                            has_line_of_sight(&grid, a, b),
                            has_line_of_sight(&grid, b, a),
                            "asymmetric sight between {a} and {b}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn blocked_iff_an_intermediate_cell_blocks() {
        let mut grid = Grid::open(6, 6);
        grid.set_blocks_vision(Position::new(2, 1), true);
        let a = Position::new(0, 0);
        let b = Position::new(5, 3);

        let blocked = BresenhamLine::canonical(a, b)
            .filter(|c| *c != a && *c != b)
            .any(|c| grid.blocks_vision(c));
        assert_eq!(has_line_of_sight(&grid, a, b), !blocked);
    }

    #[test]
    fn out_of_bounds_endpoint_has_no_sight() {
        let grid = Grid::open(3, 3);
        assert!(!has_line_of_sight(&grid, Position::new(0, 0), Position::new(5, 5)));
        assert!(has_line_of_sight(&grid, Position::new(1, 1), Position::new(1, 1)));
    }
}
