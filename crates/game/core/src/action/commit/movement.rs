use crate::action::{ActionKind, CommitTransition};
use crate::encounter::Encounter;
use crate::search::MoveDestination;
use crate::state::{Position, UnitId};

use super::{
    CommitError, CommitOutcome, acting_unit, charge, check_occupancy, ensure_budget,
    validate_path, walk_path,
};

/// Walks a unit along a path found by the reachability search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveCommit {
    actor: UnitId,
    path: Vec<Position>,
    cost: u32,
}

impl MoveCommit {
    pub fn new(actor: UnitId, path: Vec<Position>, cost: u32) -> Self {
        Self { actor, path, cost }
    }

    pub fn to(actor: UnitId, destination: &MoveDestination) -> Self {
        Self::new(actor, destination.path.clone(), destination.cost)
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn destination(&self) -> Option<Position> {
        self.path.last().copied()
    }
}

impl CommitTransition for MoveCommit {
    fn actor(&self) -> UnitId {
        self.actor
    }

    fn cost(&self) -> u32 {
        self.cost
    }

    fn pre_validate(&self, encounter: &Encounter) -> Result<(), CommitError> {
        let unit = acting_unit(encounter, self.actor)?;
        let origin = unit.position.ok_or(CommitError::UnitDead(self.actor))?;
        let destination = self
            .destination()
            .ok_or(CommitError::Unreachable { destination: origin })?;

        // A stale path from an older search no longer matches the board.
        let cost = validate_path(encounter, origin, &self.path)?;
        if cost != self.cost {
            return Err(CommitError::Unreachable { destination });
        }
        ensure_budget(unit, cost)
    }

    fn apply(&self, encounter: &mut Encounter) -> Result<CommitOutcome, CommitError> {
        walk_path(encounter, self.actor, &self.path)?;

        let mut outcome = CommitOutcome::new(self.actor, ActionKind::Move);
        outcome.spent = charge(encounter, self.actor, self.cost);
        outcome.path = self.path.clone();
        outcome.target = self.destination();
        Ok(outcome)
    }

    fn post_validate(&self, encounter: &Encounter) -> Result<(), CommitError> {
        check_occupancy(encounter, self.actor)
    }
}
