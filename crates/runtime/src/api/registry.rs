//! Provider registry mapping units to action providers.
//!
//! Lookup order: unit binding, then the provider registered for the unit's
//! faction.

use std::collections::HashMap;
use std::sync::Arc;

use tactics_core::{Faction, UnitId};

use super::{ActionProvider, Result, RuntimeError};

#[derive(Default)]
pub struct ProviderRegistry {
    /// Shared by every unit of the faction unless bound otherwise.
    factions: HashMap<Faction, Arc<dyn ActionProvider>>,
    /// Sparse per-unit overrides.
    units: HashMap<UnitId, Arc<dyn ActionProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the provider for a faction, replacing any previous one.
    pub fn register(&mut self, faction: Faction, provider: impl ActionProvider + 'static) {
        self.factions.insert(faction, Arc::new(provider));
    }

    /// Binds a unit to its own provider.
    pub fn bind_unit(&mut self, unit: UnitId, provider: Arc<dyn ActionProvider>) {
        self.units.insert(unit, provider);
    }

    pub fn unbind_unit(&mut self, unit: UnitId) {
        self.units.remove(&unit);
    }

    pub fn get(&self, unit: UnitId, faction: Faction) -> Result<Arc<dyn ActionProvider>> {
        self.units
            .get(&unit)
            .or_else(|| self.factions.get(&faction))
            .cloned()
            .ok_or(RuntimeError::ProviderNotSet { faction })
    }
}
