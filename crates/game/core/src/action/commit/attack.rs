use crate::action::{ActionDescriptor, CommitTransition};
use crate::area::enumerate_area;
use crate::combat::{DamageKind, apply_damage};
use crate::encounter::Encounter;
use crate::los::has_line_of_sight;
use crate::search::AttackTarget;
use crate::state::{Facing, StatusEffectKind, UnitId};

use super::{
    CommitError, CommitOutcome, acting_unit, charge, check_occupancy, ensure_budget,
    validate_path, walk_path,
};

/// Moves to the launch cell, then resolves the selected attack.
///
/// Area attacks hit every living occupant inside the radius regardless of
/// faction, the attacker included. Single-target attacks only hit hostile
/// occupants of the target cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackCommit {
    actor: UnitId,
    action: ActionDescriptor,
    target: AttackTarget,
}

impl AttackCommit {
    pub fn new(actor: UnitId, action: ActionDescriptor, target: AttackTarget) -> Self {
        Self {
            actor,
            action,
            target,
        }
    }

    pub fn action(&self) -> &ActionDescriptor {
        &self.action
    }

    pub fn target(&self) -> &AttackTarget {
        &self.target
    }
}

impl CommitTransition for AttackCommit {
    fn actor(&self) -> UnitId {
        self.actor
    }

    fn cost(&self) -> u32 {
        self.target
            .movement_cost
            .saturating_add(self.action.action_point_cost)
    }

    fn pre_validate(&self, encounter: &Encounter) -> Result<(), CommitError> {
        let unit = acting_unit(encounter, self.actor)?;
        if !self.action.is_targeted() {
            return Err(CommitError::WrongAction {
                kind: self.action.kind,
            });
        }
        let origin = unit.position.ok_or(CommitError::UnitDead(self.actor))?;

        let movement = validate_path(encounter, origin, &self.target.launch_path)?;
        let launch = self.target.launch_path.last().copied().unwrap_or(origin);
        if launch != self.target.launch || movement != self.target.movement_cost {
            return Err(CommitError::Unreachable {
                destination: self.target.launch,
            });
        }

        let cell = self.target.cell;
        let no_target = CommitError::NoTarget { target: cell };
        if !encounter.grid.contains(cell) || !self.action.in_range(launch, cell) {
            return Err(no_target);
        }
        if self.action.requires_line_of_sight && !has_line_of_sight(&encounter.grid, launch, cell) {
            return Err(no_target);
        }
        let occupant = encounter
            .grid
            .occupant(cell)
            .and_then(|id| encounter.roster.living(id));
        if self.action.targets_enemies_only {
            if !occupant.is_some_and(|target| target.is_hostile_to(unit)) {
                return Err(no_target);
            }
        } else if !self.action.can_target_empty_tiles && occupant.is_none() {
            return Err(no_target);
        }

        ensure_budget(unit, self.cost())
    }

    fn apply(&self, encounter: &mut Encounter) -> Result<CommitOutcome, CommitError> {
        walk_path(encounter, self.actor, &self.target.launch_path)?;

        let cell = self.target.cell;
        let faction = match encounter.roster.get_mut(self.actor) {
            Some(attacker) => {
                if let Some(facing) = Facing::towards(self.target.launch, cell) {
                    attacker.facing = facing;
                }
                attacker.faction
            }
            None => return Err(CommitError::UnitNotFound(self.actor)),
        };

        let area = self.action.area_radius > 0;
        let cells = if area {
            enumerate_area(&encounter.grid, cell, self.action.area_radius)
        } else {
            vec![cell]
        };

        let mut outcome = CommitOutcome::new(self.actor, self.action.kind);
        for position in cells {
            let Some(victim) = encounter.grid.occupant(position) else {
                continue;
            };
            let Some(state) = encounter.roster.get_mut(victim) else {
                continue;
            };
            if !state.is_alive() || (!area && !faction.is_hostile_to(state.faction)) {
                continue;
            }
            let hit = apply_damage(state, self.action.damage, DamageKind::Normal, &encounter.config);
            if hit.killed {
                outcome.deaths.push(victim);
            }
            outcome.hits.push(hit);
        }
        for dead in &outcome.deaths {
            encounter.bury(*dead);
        }

        outcome.spent = charge(encounter, self.actor, self.cost());
        if let Some(attacker) = encounter.roster.get_mut(self.actor) {
            attacker.statuses.remove(StatusEffectKind::Hidden);
            attacker.facing = attacker.facing.snap_cardinal();
        }
        outcome.path = self.target.launch_path.clone();
        outcome.target = Some(cell);
        Ok(outcome)
    }

    fn post_validate(&self, encounter: &Encounter) -> Result<(), CommitError> {
        check_occupancy(encounter, self.actor)?;
        let stale = encounter.roster.iter().find(|unit| {
            !unit.is_alive()
                && encounter
                    .grid
                    .cells()
                    .any(|cell| cell.occupant == Some(unit.id))
        });
        match stale {
            Some(unit) => Err(CommitError::OccupancyDesync {
                unit: unit.id,
                position: self.target.cell,
            }),
            None => Ok(()),
        }
    }
}
