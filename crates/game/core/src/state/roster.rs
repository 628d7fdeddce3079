use crate::config::GameConfig;

use super::{Faction, UnitId, UnitState};

/// All units of an encounter in insertion order.
///
/// Ids are dense indices assigned on insertion, so lookups are direct.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    units: Vec<UnitState>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit and assigns its id. Returns `None` when the roster is full.
    pub fn insert(&mut self, mut unit: UnitState) -> Option<UnitId> {
        if self.units.len() >= GameConfig::MAX_UNITS {
            return None;
        }
        let id = UnitId(self.units.len() as u32);
        unit.id = id;
        self.units.push(unit);
        Some(id)
    }

    pub fn get(&self, id: UnitId) -> Option<&UnitState> {
        self.units.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.units.get_mut(id.0 as usize)
    }

    /// Living unit by id.
    pub fn living(&self, id: UnitId) -> Option<&UnitState> {
        self.get(id).filter(|unit| unit.is_alive())
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitState> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut UnitState> {
        self.units.iter_mut()
    }

    pub fn iter_living(&self) -> impl Iterator<Item = &UnitState> {
        self.units.iter().filter(|unit| unit.is_alive())
    }

    pub fn living_ids(&self) -> Vec<UnitId> {
        self.iter_living().map(|unit| unit.id).collect()
    }

    pub fn has_living(&self, faction: Faction) -> bool {
        self.iter_living().any(|unit| unit.faction == faction)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
