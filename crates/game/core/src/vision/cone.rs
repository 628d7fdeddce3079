use std::collections::BTreeSet;

use crate::grid::Grid;
use crate::los::has_line_of_sight;
use crate::state::{Facing, Position};

use super::LightMap;

/// Returns true if the offset `(dx, dy)` lies within 60° of `facing`.
///
/// Exact integer test: `cos θ ≥ 1/2` is `dot ≥ 0 && 4·dot² ≥ |f|²·|d|²`.
/// The zero offset and a zero facing always pass.
pub fn in_forward_arc(facing: Facing, dx: i32, dy: i32) -> bool {
    if (dx == 0 && dy == 0) || facing.is_zero() {
        return true;
    }
    let (fx, fy) = (i64::from(facing.dx), i64::from(facing.dy));
    let (dx, dy) = (i64::from(dx), i64::from(dy));
    let dot = fx * dx + fy * dy;
    if dot < 0 {
        return false;
    }
    4 * dot * dot >= (fx * fx + fy * fy) * (dx * dx + dy * dy)
}

/// Cells seen by a unit at `origin` looking along `facing`.
///
/// Cells out to `range` are seen in the dark; cells out to `2·range` only
/// when lit. Every cell must be inside the forward arc and in line of sight.
pub fn compute_cone(
    grid: &Grid,
    lights: &LightMap,
    origin: Position,
    facing: Facing,
    range: u32,
) -> BTreeSet<Position> {
    let mut cone = BTreeSet::new();
    if !grid.contains(origin) {
        return cone;
    }

    let reach = (range * 2) as i32;
    for dy in -reach..=reach {
        let span = reach - dy.abs();
        for dx in -span..=span {
            let cell = origin.offset(dx, dy);
            if !grid.contains(cell) || !in_forward_arc(facing, dx, dy) {
                continue;
            }
            if origin.manhattan(cell) > range && !lights.is_lit(cell) {
                continue;
            }
            if has_line_of_sight(grid, origin, cell) {
                cone.insert(cell);
            }
        }
    }
    cone
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDimensions;

    #[test]
    fn arc_is_sixty_degrees_each_side() {
        let north = Facing::NORTH;
        assert!(in_forward_arc(north, 0, 3));
        // atan(1/2) ≈ 26.6°
        assert!(in_forward_arc(north, 1, 2));
        // 45°
        assert!(in_forward_arc(north, 2, 2));
        // atan(2) ≈ 63.4°
        assert!(!in_forward_arc(north, 2, 1));
        assert!(!in_forward_arc(north, 1, 0));
        assert!(!in_forward_arc(north, 0, -1));
        assert!(in_forward_arc(north, 0, 0));
    }

    #[test]
    fn diagonal_facing_uses_raw_vector() {
        let facing = Facing::new(1, 1);
        assert!(in_forward_arc(facing, 1, 0));
        assert!(in_forward_arc(facing, 0, 5));
        assert!(!in_forward_arc(facing, -1, 2));
    }

    #[test]
    fn dark_cone_stops_at_range() {
        let grid = Grid::open(10, 10);
        let lights = LightMap::new(GridDimensions::new(10, 10));
        let cone = compute_cone(&grid, &lights, Position::new(5, 0), Facing::NORTH, 3);

        assert!(cone.contains(&Position::new(5, 0)));
        assert!(cone.contains(&Position::new(5, 3)));
        assert!(!cone.contains(&Position::new(5, 4)));
        assert!(cone.iter().all(|c| c.manhattan(Position::new(5, 0)) <= 3));
    }

    #[test]
    fn light_extends_the_cone_to_double_range() {
        let grid = Grid::open(10, 10);
        let mut lights = LightMap::new(GridDimensions::new(10, 10));
        lights.add(Some(Position::new(5, 6)), 0);
        lights.add(Some(Position::new(5, 8)), 0);

        let cone = compute_cone(&grid, &lights, Position::new(5, 0), Facing::NORTH, 3);
        assert!(cone.contains(&Position::new(5, 6)));
        assert!(!cone.contains(&Position::new(5, 8)));
    }

    #[test]
    fn walls_shadow_the_cone() {
        let mut grid = Grid::open(10, 10);
        grid.set_wall(Position::new(5, 2));
        let lights = LightMap::new(GridDimensions::new(10, 10));
        let cone = compute_cone(&grid, &lights, Position::new(5, 0), Facing::NORTH, 4);

        assert!(cone.contains(&Position::new(5, 2)));
        assert!(!cone.contains(&Position::new(5, 3)));
    }
}
