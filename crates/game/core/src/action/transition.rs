use crate::encounter::Encounter;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::UnitId;

use super::{CommitError, CommitOutcome};

/// Defines how a committed action mutates the encounter.
///
/// [`Encounter::commit`] runs the three hooks in order and stops at the first
/// error. Validation hooks must stay side-effect free, so a failed
/// `pre_validate` leaves the encounter untouched.
pub trait CommitTransition {
    fn actor(&self) -> UnitId;

    /// Total action points the commit spends.
    fn cost(&self) -> u32;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _encounter: &Encounter) -> Result<(), CommitError> {
        Ok(())
    }

    /// Applies the commit. Implementations may assume `pre_validate` passed.
    fn apply(&self, encounter: &mut Encounter) -> Result<CommitOutcome, CommitError>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _encounter: &Encounter) -> Result<(), CommitError> {
        Ok(())
    }
}

/// Identifies which stage of the commit pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// A rejected commit with the stage that rejected it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{} failed: {}", .phase.as_str(), .error)]
pub struct CommitFailure {
    pub phase: TransitionPhase,
    pub error: CommitError,
    pub context: ErrorContext,
}

impl CommitFailure {
    pub fn new(phase: TransitionPhase, error: CommitError, context: ErrorContext) -> Self {
        Self {
            phase,
            error,
            context,
        }
    }
}

impl GameError for CommitFailure {
    fn severity(&self) -> ErrorSeverity {
        // State was already mutated when post-validation fails.
        if self.phase == TransitionPhase::PostValidate {
            return ErrorSeverity::Internal;
        }
        self.error.severity()
    }

    fn context(&self) -> Option<&ErrorContext> {
        Some(&self.context)
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}
