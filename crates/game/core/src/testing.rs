//! Scenario builders shared by unit tests.

use crate::config::GameConfig;
use crate::encounter::Encounter;
use crate::grid::Grid;
use crate::state::{Faction, Position, UnitState};
use crate::stats::Attributes;

pub fn player(config: &GameConfig, position: Position) -> UnitState {
    UnitState::new("player", Faction::Player, Attributes::default(), config).with_position(position)
}

pub fn enemy(config: &GameConfig, position: Position) -> UnitState {
    UnitState::new("enemy", Faction::Enemy, Attributes::default(), config).with_position(position)
}

/// Sets both the per-turn maximum and the current budget.
pub fn with_budget(mut unit: UnitState, points: u32) -> UnitState {
    unit.action_points.maximum = points;
    unit.action_points.current = points;
    unit
}

pub fn open_encounter(width: u32, height: u32) -> Encounter {
    let config = GameConfig::new().with_grid_size(width, height);
    Encounter::new(config, Grid::open(width, height))
}
