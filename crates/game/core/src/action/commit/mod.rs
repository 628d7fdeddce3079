//! Atomic move, attack and self-cast commits.
//!
//! Each commit mutates the encounter at one instant; presentation may stretch
//! the result over time afterwards. Shared helpers validate and walk paths the
//! same way for moves and for attacks that move to a launch cell first.
mod attack;
mod movement;
mod self_cast;

pub use attack::AttackCommit;
pub use movement::MoveCommit;
pub use self_cast::SelfCastCommit;

use crate::combat::DamageOutcome;
use crate::encounter::Encounter;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Facing, Position, StatusEffectKind, UnitId, UnitState};
use crate::turn::TurnPhase;
use crate::vision::VisionReport;

use super::ActionKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {0} is dead")]
    UnitDead(UnitId),

    #[error("unit {unit} does not hold the turn")]
    NotUnitsTurn { unit: UnitId },

    #[error("the encounter is over")]
    GameOver,

    #[error("unit {unit} has no usable action selected")]
    NoActionSelected { unit: UnitId },

    #[error("{kind} cannot be committed this way")]
    WrongAction { kind: ActionKind },

    #[error("cell {destination} is not reachable this turn")]
    Unreachable { destination: Position },

    #[error("no valid target at {target}")]
    NoTarget { target: Position },

    #[error("path is blocked at {position}")]
    PathBlocked { position: Position },

    #[error("needs {required} action points but only {available} remain")]
    InsufficientActionPoints { required: u32, available: u32 },

    #[error("occupancy desync for unit {unit} at {position}")]
    OccupancyDesync { unit: UnitId, position: Position },
}

impl GameError for CommitError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unreachable { .. }
            | Self::NoTarget { .. }
            | Self::PathBlocked { .. }
            | Self::InsufficientActionPoints { .. } => ErrorSeverity::Recoverable,
            Self::UnitNotFound(_)
            | Self::UnitDead(_)
            | Self::NotUnitsTurn { .. }
            | Self::GameOver
            | Self::NoActionSelected { .. }
            | Self::WrongAction { .. } => ErrorSeverity::Validation,
            Self::OccupancyDesync { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "COMMIT_UNIT_NOT_FOUND",
            Self::UnitDead(_) => "COMMIT_UNIT_DEAD",
            Self::NotUnitsTurn { .. } => "COMMIT_NOT_UNITS_TURN",
            Self::GameOver => "COMMIT_GAME_OVER",
            Self::NoActionSelected { .. } => "COMMIT_NO_ACTION_SELECTED",
            Self::WrongAction { .. } => "COMMIT_WRONG_ACTION",
            Self::Unreachable { .. } => "COMMIT_UNREACHABLE",
            Self::NoTarget { .. } => "COMMIT_NO_TARGET",
            Self::PathBlocked { .. } => "COMMIT_PATH_BLOCKED",
            Self::InsufficientActionPoints { .. } => "COMMIT_INSUFFICIENT_ACTION_POINTS",
            Self::OccupancyDesync { .. } => "COMMIT_OCCUPANCY_DESYNC",
        }
    }
}

/// Everything a commit changed, for logging and playback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitOutcome {
    pub actor: UnitId,
    pub kind: ActionKind,
    /// Cells entered, in order.
    pub path: Vec<Position>,
    pub target: Option<Position>,
    pub spent: u32,
    pub hits: Vec<DamageOutcome>,
    pub deaths: Vec<UnitId>,
    pub status: Option<StatusEffectKind>,
    /// Fog-of-war pass run after the commit.
    pub vision: Option<VisionReport>,
}

impl CommitOutcome {
    pub(crate) fn new(actor: UnitId, kind: ActionKind) -> Self {
        Self {
            actor,
            kind,
            path: Vec::new(),
            target: None,
            spent: 0,
            hits: Vec::new(),
            deaths: Vec::new(),
            status: None,
            vision: None,
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// The actor if it is alive and holds an unresolved turn.
pub(crate) fn acting_unit(encounter: &Encounter, actor: UnitId) -> Result<&UnitState, CommitError> {
    let unit = encounter
        .roster
        .get(actor)
        .ok_or(CommitError::UnitNotFound(actor))?;
    if !unit.is_alive() {
        return Err(CommitError::UnitDead(actor));
    }
    match encounter.turns.phase() {
        TurnPhase::GameOver => Err(CommitError::GameOver),
        TurnPhase::UnitActive(current) if current == actor => Ok(unit),
        _ => Err(CommitError::NotUnitsTurn { unit: actor }),
    }
}

/// Checks that `path` walks orthogonally from `origin` through enterable
/// cells and returns its cost.
pub(crate) fn validate_path(
    encounter: &Encounter,
    origin: Position,
    path: &[Position],
) -> Result<u32, CommitError> {
    let mut previous = origin;
    let mut cost = 0u32;
    for step in path {
        if previous.manhattan(*step) != 1 {
            return Err(CommitError::Unreachable { destination: *step });
        }
        let cell = encounter
            .grid
            .cell_at(*step)
            .ok_or(CommitError::Unreachable { destination: *step })?;
        if !cell.is_enterable() {
            return Err(CommitError::PathBlocked { position: *step });
        }
        cost = cost.saturating_add(cell.movement_cost);
        previous = *step;
    }
    Ok(cost)
}

pub(crate) fn ensure_budget(unit: &UnitState, required: u32) -> Result<(), CommitError> {
    if required > unit.action_points.current {
        return Err(CommitError::InsufficientActionPoints {
            required,
            available: unit.action_points.current,
        });
    }
    Ok(())
}

/// Moves the actor to the end of `path`, facing along the last step. Its
/// light follows it.
pub(crate) fn walk_path(
    encounter: &mut Encounter,
    actor: UnitId,
    path: &[Position],
) -> Result<(), CommitError> {
    let Some(&destination) = path.last() else {
        return Ok(());
    };
    let unit = encounter
        .roster
        .get(actor)
        .ok_or(CommitError::UnitNotFound(actor))?;
    let origin = unit.position.ok_or(CommitError::UnitDead(actor))?;
    let light = unit.light;
    let previous = path
        .len()
        .checked_sub(2)
        .and_then(|index| path.get(index).copied())
        .unwrap_or(origin);

    if !encounter.grid.remove_occupant(origin, actor) {
        return Err(CommitError::OccupancyDesync {
            unit: actor,
            position: origin,
        });
    }
    if !encounter.grid.place_occupant(destination, actor) {
        // Rollback on failure
        encounter.grid.place_occupant(origin, actor);
        return Err(CommitError::OccupancyDesync {
            unit: actor,
            position: destination,
        });
    }

    if let Some(unit) = encounter.roster.get_mut(actor) {
        unit.position = Some(destination);
        if let Some(facing) = Facing::towards(previous, destination) {
            unit.facing = facing;
        }
    }
    if let Some(light) = light {
        encounter.vision.lights_mut().move_to(light, Some(destination));
    }
    Ok(())
}

pub(crate) fn charge(encounter: &mut Encounter, actor: UnitId, amount: u32) -> u32 {
    encounter
        .roster
        .get_mut(actor)
        .map_or(0, |unit| unit.action_points.drain(amount))
}

/// Post-condition shared by all commits: a living actor stands on a cell that
/// points back to it.
pub(crate) fn check_occupancy(encounter: &Encounter, actor: UnitId) -> Result<(), CommitError> {
    let unit = encounter
        .roster
        .get(actor)
        .ok_or(CommitError::UnitNotFound(actor))?;
    match unit.position {
        Some(position) if unit.is_alive() => {
            if encounter.grid.occupant(position) == Some(actor) {
                Ok(())
            } else {
                Err(CommitError::OccupancyDesync {
                    unit: actor,
                    position,
                })
            }
        }
        _ => Ok(()),
    }
}
