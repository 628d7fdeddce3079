//! Damage and healing applied to a single unit.
//!
//! These functions only touch the unit itself. Clearing a dead unit's
//! occupancy and light is the encounter's job.

use crate::config::GameConfig;
use crate::state::{StatusEffectKind, UnitId, UnitState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageKind {
    /// Reduced by armor, never below 1.
    Normal,
    /// Ignores armor.
    Pure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageOutcome {
    pub unit: UnitId,
    /// Health actually removed.
    pub amount: u32,
    pub killed: bool,
}

pub fn apply_damage(
    unit: &mut UnitState,
    amount: u32,
    kind: DamageKind,
    config: &GameConfig,
) -> DamageOutcome {
    let mut outcome = DamageOutcome {
        unit: unit.id,
        amount: 0,
        killed: false,
    };
    if !unit.is_alive() || amount == 0 {
        return outcome;
    }

    let mut dealt = match kind {
        DamageKind::Normal => amount.saturating_sub(unit.armor(config)).max(1),
        DamageKind::Pure => amount,
    };
    if dealt >= unit.health.current && unit.statuses.has(StatusEffectKind::CannotDie) {
        dealt = unit.health.current.saturating_sub(1);
    }

    outcome.amount = unit.health.drain(dealt);
    if unit.health.current == 0 {
        unit.alive = false;
        outcome.killed = true;
    }
    outcome
}

/// Heals a living unit up to its maximum. Returns the health restored.
pub fn apply_healing(unit: &mut UnitState, amount: u32) -> u32 {
    if !unit.is_alive() {
        return 0;
    }
    unit.health.restore(amount)
}
