//! Turns session events into a readable battle log.
use std::collections::HashMap;

use tactics_core::{ActionKind, CommitOutcome, UnitId};
use tactics_runtime::{CombatEvent, Event, TurnEvent, VisionEvent};

pub struct BattleLog {
    names: HashMap<UnitId, String>,
}

impl BattleLog {
    pub fn new(names: HashMap<UnitId, String>) -> Self {
        Self { names }
    }

    fn name(&self, unit: UnitId) -> &str {
        self.names.get(&unit).map_or("someone", String::as_str)
    }

    /// One line per event worth showing; `None` for the rest.
    pub fn line(&self, event: &Event) -> Option<String> {
        match event {
            Event::Turn(TurnEvent::Granted { unit, round, tick }) => {
                let mut line = format!("[round {round}] {} acts with {} AP", self.name(*unit), tick.budget);
                if tick.damage_taken > 0 {
                    line.push_str(&format!(", takes {} from effects", tick.damage_taken));
                }
                if tick.healed > 0 {
                    line.push_str(&format!(", heals {}", tick.healed));
                }
                Some(line)
            }
            Event::Turn(TurnEvent::Skipped { unit }) => {
                Some(format!("  {} never gets to act", self.name(*unit)))
            }
            Event::Turn(TurnEvent::Ended { .. }) => None,
            Event::Turn(TurnEvent::GameOver { winner }) => Some(match winner {
                Some(faction) => format!("== {faction} side wins =="),
                None => "== nobody is left standing ==".to_string(),
            }),
            Event::Combat(CombatEvent::CommitApplied { outcome }) => Some(self.outcome(outcome)),
            Event::Combat(CombatEvent::CommitRejected { unit, error, .. }) => {
                Some(format!("  {} hesitates: {error}", self.name(*unit)))
            }
            Event::Combat(CombatEvent::UnitDied { unit }) => {
                Some(format!("  {} falls", self.name(*unit)))
            }
            Event::Combat(CombatEvent::PlaybackFinished { .. }) => None,
            Event::Vision(VisionEvent { report }) if report.stealth_changed() => {
                let names: Vec<&str> = report.revealed.iter().map(|id| self.name(*id)).collect();
                Some(format!("  light reveals {}", names.join(", ")))
            }
            Event::Vision(_) => None,
        }
    }

    fn outcome(&self, outcome: &CommitOutcome) -> String {
        let actor = self.name(outcome.actor);
        let mut line = match outcome.kind {
            ActionKind::Move => {
                let to = outcome.path.last().copied().unwrap_or_default();
                format!("  {actor} moves to ({}, {})", to.x, to.y)
            }
            ActionKind::SelfCast(kind) => format!("  {actor} casts {kind}"),
            kind => match outcome.target {
                Some(target) => format!("  {actor} uses {kind} on ({}, {})", target.x, target.y),
                None => format!("  {actor} uses {kind}"),
            },
        };
        for hit in &outcome.hits {
            line.push_str(&format!("; {} takes {}", self.name(hit.unit), hit.amount));
        }
        line.push_str(&format!(" [{} AP]", outcome.spent));
        line
    }
}
