//! Read-only description of an attack before it is committed.

use crate::action::ActionDescriptor;
use crate::area::enumerate_area;
use crate::grid::Grid;
use crate::los::BresenhamLine;
use crate::search::AttackTarget;
use crate::state::{Position, Roster, UnitId};

/// What committing an attack target would do, for highlighting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackPreview {
    pub launch_path: Vec<Position>,
    pub launch: Position,
    pub target: Position,
    /// Sight line from the launch cell, endpoints included. Empty for actions
    /// that ignore line of sight.
    pub line: Vec<Position>,
    /// Cells the attack would affect.
    pub area: Vec<Position>,
    /// Living units standing in `area`.
    pub affected: Vec<UnitId>,
    pub cost: u32,
}

impl AttackPreview {
    pub fn new(grid: &Grid, roster: &Roster, action: &ActionDescriptor, target: &AttackTarget) -> Self {
        let line = if action.requires_line_of_sight {
            BresenhamLine::new(target.launch, target.cell).collect()
        } else {
            Vec::new()
        };
        let area = if action.area_radius > 0 {
            enumerate_area(grid, target.cell, action.area_radius)
        } else {
            vec![target.cell]
        };
        let affected = area
            .iter()
            .filter_map(|cell| grid.occupant(*cell))
            .filter(|unit| roster.living(*unit).is_some())
            .collect();

        Self {
            launch_path: target.launch_path.clone(),
            launch: target.launch,
            target: target.cell,
            line,
            area,
            affected,
            cost: target.cost,
        }
    }
}
