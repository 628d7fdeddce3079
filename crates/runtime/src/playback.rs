//! Step-driven playback of committed actions.
//!
//! A commit mutates the encounter at one instant. Playback stretches the
//! result over session steps (walk along the path, then the attack or cast)
//! so the session can tell when the visual sequence is over.
use tactics_core::{ActionKind, CommitOutcome, UnitId};

use crate::config::SessionConfig;

/// Stage of the action being played back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActionPhase {
    #[default]
    Idle,
    /// Walking the committed path.
    Moving { remaining: u32 },
    /// Swing, shot or cast after arriving.
    Attacking { remaining: u32 },
}

#[derive(Clone, Debug, Default)]
pub struct Playback {
    current: Option<(UnitId, ActionKind)>,
    phase: ActionPhase,
    /// Attack steps queued behind the walk.
    queued: u32,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts playing `outcome`, replacing anything still running.
    pub fn start(&mut self, outcome: &CommitOutcome, config: &SessionConfig) {
        let walk = config
            .steps_per_tile
            .saturating_mul(u32::try_from(outcome.path.len()).unwrap_or(u32::MAX));
        let act = config.attack_steps(outcome.kind);

        self.current = Some((outcome.actor, outcome.kind));
        self.queued = act;
        self.phase = if walk > 0 {
            ActionPhase::Moving { remaining: walk }
        } else {
            ActionPhase::Attacking { remaining: act }
        };
    }

    /// Advances one step. Returns the finished action when playback ends.
    pub fn tick(&mut self) -> Option<(UnitId, ActionKind)> {
        match self.phase {
            ActionPhase::Idle => return None,
            ActionPhase::Moving { remaining } if remaining > 1 => {
                self.phase = ActionPhase::Moving {
                    remaining: remaining - 1,
                };
                return None;
            }
            ActionPhase::Moving { .. } if self.queued > 0 => {
                self.phase = ActionPhase::Attacking {
                    remaining: std::mem::take(&mut self.queued),
                };
                return None;
            }
            ActionPhase::Moving { .. } => {}
            ActionPhase::Attacking { remaining } if remaining > 1 => {
                self.phase = ActionPhase::Attacking {
                    remaining: remaining - 1,
                };
                return None;
            }
            ActionPhase::Attacking { .. } => {}
        }

        self.phase = ActionPhase::Idle;
        self.queued = 0;
        self.current.take()
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == ActionPhase::Idle
    }
}
