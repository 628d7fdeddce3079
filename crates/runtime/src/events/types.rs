//! Event types for different topics.

use tactics_core::{
    ActionKind, CommitOutcome, Faction, TickReport, TransitionPhase, UnitId, VisionReport,
};

/// Turn order changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// The unit was granted its turn and its start-of-turn effects ran.
    Granted {
        unit: UnitId,
        round: u32,
        tick: TickReport,
    },
    /// The unit's turn was aborted before it could act.
    Skipped { unit: UnitId },
    Ended { unit: UnitId },
    /// Terminal. `winner` is `None` when nobody is left standing.
    GameOver { winner: Option<Faction> },
}

/// State changes caused by commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatEvent {
    /// A commit mutated the encounter. Playback starts now.
    CommitApplied { outcome: Box<CommitOutcome> },

    /// A commit was refused; the encounter is unchanged.
    CommitRejected {
        unit: UnitId,
        phase: TransitionPhase,
        error: String,
    },

    /// The visual sequence of the unit's last commit is over.
    PlaybackFinished { unit: UnitId, kind: ActionKind },

    UnitDied { unit: UnitId },
}

/// Fog-of-war passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionEvent {
    pub report: VisionReport,
}
