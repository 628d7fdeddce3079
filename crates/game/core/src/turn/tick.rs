use crate::combat::{DamageKind, apply_damage, apply_healing};
use crate::config::GameConfig;
use crate::state::{HealthDelta, StatusEffectKind, UnitId, UnitState};

/// What happened to a unit at the start of its turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub unit: UnitId,
    /// Budget available for the turn after all effects.
    pub budget: u32,
    pub healed: u32,
    pub damage_taken: u32,
    /// Effects applied this tick, in application order.
    pub applied: Vec<StatusEffectKind>,
    /// Effects that ran out during this tick.
    pub expired: Vec<StatusEffectKind>,
    pub died: bool,
}

/// Refills the unit's budget and applies one round of every status effect in
/// registration order. Processing stops if an effect kills the unit.
pub fn start_of_turn(unit: &mut UnitState, config: &GameConfig) -> TickReport {
    let mut report = TickReport {
        unit: unit.id,
        ..TickReport::default()
    };
    if !unit.is_alive() {
        report.died = true;
        return report;
    }

    unit.action_points.refill();
    let mut budget = unit.action_points.current;

    let mut index = 0;
    while let Some(effect) = unit.statuses.at(index) {
        let (next_budget, delta) = effect.kind.round_mutation(budget, effect.power, config);
        budget = next_budget;
        match delta {
            HealthDelta::None => {}
            HealthDelta::Heal(amount) => report.healed += apply_healing(unit, amount),
            HealthDelta::Damage(amount) => {
                report.damage_taken += apply_damage(unit, amount, DamageKind::Normal, config).amount;
            }
            HealthDelta::PureDamage(amount) => {
                report.damage_taken += apply_damage(unit, amount, DamageKind::Pure, config).amount;
            }
        }
        report.applied.push(effect.kind);

        if !unit.is_alive() {
            report.died = true;
            break;
        }
        match unit.statuses.consume_round(index) {
            Some(kind) => report.expired.push(kind),
            None => index += 1,
        }
    }

    unit.action_points.current = if report.died { 0 } else { budget };
    report.budget = unit.action_points.current;
    report
}
