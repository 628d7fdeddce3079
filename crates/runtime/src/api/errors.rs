//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from action providers and the encounter so clients can
//! bubble them up with consistent context.
use tactics_core::{CommitFailure, EncounterError, Faction};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no action provider registered for {faction} units")]
    ProviderNotSet { faction: Faction },

    #[error("action provider channel closed")]
    ActionProviderChannelClosed,

    #[error(transparent)]
    Encounter(#[from] EncounterError),

    /// A commit broke an encounter invariant. Ordinary rejections are
    /// reported as events instead.
    #[error("commit corrupted the encounter")]
    Commit(#[source] CommitFailure),

    #[error("session did not finish within {steps} steps")]
    StepLimit { steps: u64 },
}
