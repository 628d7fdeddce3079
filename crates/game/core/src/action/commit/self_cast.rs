use crate::action::{ActionDescriptor, ActionKind, CommitTransition, SelfCastKind};
use crate::encounter::Encounter;
use crate::state::{StatusEffect, StatusEffectKind, UnitId};

use super::{CommitError, CommitOutcome, acting_unit, charge, ensure_budget};

/// Applies a self-targeted ability in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelfCastCommit {
    actor: UnitId,
    action: ActionDescriptor,
}

impl SelfCastCommit {
    pub fn new(actor: UnitId, action: ActionDescriptor) -> Self {
        Self { actor, action }
    }

    fn status(&self) -> Result<StatusEffectKind, CommitError> {
        match self.action.kind {
            ActionKind::SelfCast(SelfCastKind::Stealth) => Ok(StatusEffectKind::Hidden),
            ActionKind::SelfCast(SelfCastKind::Bulwark) => Ok(StatusEffectKind::Bulwark),
            kind => Err(CommitError::WrongAction { kind }),
        }
    }
}

impl CommitTransition for SelfCastCommit {
    fn actor(&self) -> UnitId {
        self.actor
    }

    fn cost(&self) -> u32 {
        self.action.action_point_cost
    }

    fn pre_validate(&self, encounter: &Encounter) -> Result<(), CommitError> {
        let unit = acting_unit(encounter, self.actor)?;
        self.status()?;
        ensure_budget(unit, self.cost())
    }

    fn apply(&self, encounter: &mut Encounter) -> Result<CommitOutcome, CommitError> {
        let status = self.status()?;
        let unit = encounter
            .roster
            .get_mut(self.actor)
            .ok_or(CommitError::UnitNotFound(self.actor))?;
        let applied = unit
            .statuses
            .add(StatusEffect::new(status, self.action.status_rounds));

        let mut outcome = CommitOutcome::new(self.actor, self.action.kind);
        outcome.spent = charge(encounter, self.actor, self.cost());
        outcome.status = applied.then_some(status);
        Ok(outcome)
    }
}
