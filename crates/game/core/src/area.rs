//! Radius-bounded flood fill from an impact cell.
//!
//! Used both when resolving splash damage and when previewing it, so the two
//! always agree. Walls and occupants do not stop the fill.

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::state::Position;

/// Visits every cell within `radius` orthogonal steps of `center`, with its
/// step depth, in breadth-first order. The center is visited at depth 0.
pub fn visit_area(grid: &Grid, center: Position, radius: u32, mut visit: impl FnMut(Position, u32)) {
    let Some(center_id) = grid.cell_id(center) else {
        return;
    };

    let mut seen = vec![false; grid.cell_count()];
    seen[center_id.0] = true;
    let mut queue = VecDeque::from([(center, 0u32)]);

    while let Some((cell, depth)) = queue.pop_front() {
        visit(cell, depth);
        if depth == radius {
            continue;
        }
        for next in grid.neighbors(cell) {
            let Some(id) = grid.cell_id(next) else {
                continue;
            };
            if !seen[id.0] {
                seen[id.0] = true;
                queue.push_back((next, depth + 1));
            }
        }
    }
}

/// All in-bounds cells within `radius` orthogonal steps of `center`.
///
/// An out-of-bounds center yields an empty set.
pub fn enumerate_area(grid: &Grid, center: Position, radius: u32) -> Vec<Position> {
    let mut cells = Vec::new();
    visit_area(grid, center, radius, |cell, _| cells.push(cell));
    cells
}
