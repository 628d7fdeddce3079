//! Step-driven turn pump.
//!
//! A [`Session`] owns the encounter and drives it one step at a time:
//! advance initiative, wait the begin-turn delay, grant the turn, ask the
//! unit's provider for orders, and play back every applied commit before the
//! unit may act again. Input only ever reaches the unit holding the turn.
use std::sync::Arc;

use tactics_core::{
    CommitFailure, CommitOutcome, Encounter, ErrorSeverity, Faction, GameError, TurnAdvance,
    UnitId, UnitState, VisionReport, VisionStatus,
};
use tracing::{debug, info, warn};

use crate::api::{
    ActionProvider, OpportunistProvider, Order, PassiveProvider, ProviderRegistry, Result,
    RuntimeError,
};
use crate::config::{AiPolicy, SessionConfig};
use crate::events::{CombatEvent, Event, EventBus, Topic, TurnEvent, VisionEvent};
use crate::playback::{ActionPhase, Playback};

/// Where the session stands after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    /// A faction was wiped out. `winner` is the surviving faction, if any.
    GameOver { winner: Option<Faction> },
    /// The next turn would have started past the configured round limit.
    RoundLimit { round: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pump {
    Advance,
    Delay { unit: UnitId, remaining: u32 },
    Awaiting(UnitId),
    Playing(UnitId),
    Done(SessionStatus),
}

pub struct Session {
    encounter: Encounter,
    providers: ProviderRegistry,
    /// Serves non-player units without a registered provider.
    fallback: Arc<dyn ActionProvider>,
    bus: EventBus,
    config: SessionConfig,
    pump: Pump,
    playback: Playback,
    rejections: u32,
    steps: u64,
}

impl Session {
    pub fn new(encounter: Encounter, providers: ProviderRegistry, config: SessionConfig) -> Self {
        let fallback: Arc<dyn ActionProvider> = match config.ai_policy {
            AiPolicy::Passive => Arc::new(PassiveProvider),
            AiPolicy::Opportunist => Arc::new(OpportunistProvider),
        };
        Self {
            encounter,
            providers,
            fallback,
            bus: EventBus::new(),
            config,
            pump: Pump::Advance,
            playback: Playback::new(),
            rejections: 0,
            steps: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn providers_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.providers
    }

    /// Playback stage of the last commit.
    pub fn action_phase(&self) -> ActionPhase {
        self.playback.phase()
    }

    /// Unit whose orders the session is waiting for.
    pub fn awaiting(&self) -> Option<UnitId> {
        match self.pump {
            Pump::Awaiting(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn status(&self) -> SessionStatus {
        match self.pump {
            Pump::Done(status) => status,
            _ => SessionStatus::Running,
        }
    }

    // ========================================================================
    // Driving
    // ========================================================================

    /// Starts the encounter if the caller has not already done so.
    pub fn start(&mut self) -> Result<()> {
        if self.encounter.is_started() {
            return Ok(());
        }
        let report = self.encounter.start()?;
        info!(
            target: "runtime::session",
            units = self.encounter.roster().len(),
            visible = report.visible_cells,
            "encounter started"
        );
        self.publish_vision(report);
        Ok(())
    }

    /// Runs one pump step.
    pub async fn step(&mut self) -> Result<SessionStatus> {
        self.steps += 1;
        match self.pump {
            Pump::Done(status) => return Ok(status),
            Pump::Advance => self.advance(),
            Pump::Delay { unit, remaining } if remaining > 0 => {
                self.pump = Pump::Delay {
                    unit,
                    remaining: remaining - 1,
                };
            }
            Pump::Delay { unit, .. } => self.grant(unit),
            Pump::Awaiting(unit) => self.await_order(unit).await?,
            Pump::Playing(unit) => self.play(unit),
        }
        Ok(self.status())
    }

    /// Steps until the encounter ends or the round limit is hit.
    pub async fn run(&mut self) -> Result<SessionStatus> {
        self.start()?;
        for _ in 0..self.config.max_steps {
            match self.step().await? {
                SessionStatus::Running => {}
                done => return Ok(done),
            }
        }
        Err(RuntimeError::StepLimit {
            steps: self.config.max_steps,
        })
    }

    fn advance(&mut self) {
        match self.encounter.advance_turn() {
            TurnAdvance::Next(unit) => {
                let round = self.encounter.turns().round();
                if round > self.config.max_rounds {
                    info!(target: "runtime::session", round, "round limit reached");
                    self.pump = Pump::Done(SessionStatus::RoundLimit { round });
                    return;
                }
                debug!(target: "runtime::session", unit = ?unit, round, "next unit selected");
                self.pump = Pump::Delay {
                    unit,
                    remaining: self.config.begin_turn_delay_steps,
                };
            }
            TurnAdvance::Blocked(unit) => {
                warn!(target: "runtime::session", unit = ?unit, "turn still held; resuming it");
                self.pump = Pump::Awaiting(unit);
            }
            TurnAdvance::GameOver => self.finish(),
        }
    }

    fn grant(&mut self, unit: UnitId) {
        let Some(start) = self.encounter.begin_turn(unit) else {
            warn!(target: "runtime::session", unit = ?unit, "turn grant refused");
            self.pump = Pump::Advance;
            return;
        };
        let round = self.encounter.turns().round();
        info!(
            target: "runtime::session",
            unit = ?unit,
            round,
            budget = start.tick.budget,
            healed = start.tick.healed,
            damage = start.tick.damage_taken,
            "turn granted"
        );
        let can_act = start.can_act();
        self.publish(Event::Turn(TurnEvent::Granted {
            unit,
            round,
            tick: start.tick,
        }));
        self.publish_vision(start.vision);

        if can_act {
            self.rejections = 0;
            self.pump = Pump::Awaiting(unit);
        } else {
            info!(target: "runtime::session", unit = ?unit, "unit died at start of turn");
            self.publish(Event::Combat(CombatEvent::UnitDied { unit }));
            self.publish(Event::Turn(TurnEvent::Skipped { unit }));
            self.pump = Pump::Advance;
        }
    }

    async fn await_order(&mut self, unit: UnitId) -> Result<()> {
        let Some(faction) = self.encounter.unit(unit).map(|state| state.faction) else {
            self.pump = Pump::Advance;
            return Ok(());
        };
        let provider = self.provider_for(unit, faction)?;
        let order = provider.provide_order(unit, &self.encounter).await?;
        debug!(target: "runtime::session", unit = ?unit, order = ?order, "order received");

        let result = match order {
            Order::EndTurn => {
                self.end_turn(unit);
                return Ok(());
            }
            Order::Select(key) => {
                if !self.encounter.select_action(unit, key) {
                    warn!(target: "runtime::session", unit = ?unit, key = ?key, "action not available");
                    self.note_rejection(unit);
                }
                return Ok(());
            }
            Order::Move(destination) => self.encounter.commit_move(unit, destination),
            Order::Attack(target) => self.encounter.commit_attack(unit, target),
            Order::SelfCast => self.encounter.commit_self_cast(unit),
        };

        match result {
            Ok(outcome) => self.applied(unit, outcome),
            Err(failure) => self.rejected(unit, failure)?,
        }
        Ok(())
    }

    fn provider_for(&self, unit: UnitId, faction: Faction) -> Result<Arc<dyn ActionProvider>> {
        match self.providers.get(unit, faction) {
            Ok(provider) => Ok(provider),
            Err(RuntimeError::ProviderNotSet { .. }) if faction != Faction::Player => {
                Ok(Arc::clone(&self.fallback))
            }
            Err(error) => Err(error),
        }
    }

    fn applied(&mut self, unit: UnitId, outcome: CommitOutcome) {
        info!(
            target: "runtime::session",
            unit = ?unit,
            kind = %outcome.kind,
            spent = outcome.spent,
            tiles = outcome.path.len(),
            hits = outcome.hits.len(),
            "commit applied"
        );
        let deaths = outcome.deaths.clone();
        let vision = outcome.vision.clone();

        self.encounter.begin_resolution(unit);
        self.playback.start(&outcome, &self.config);
        self.publish(Event::Combat(CombatEvent::CommitApplied {
            outcome: Box::new(outcome),
        }));
        for dead in deaths {
            info!(target: "runtime::session", unit = ?dead, killer = ?unit, "unit died");
            self.publish(Event::Combat(CombatEvent::UnitDied { unit: dead }));
        }
        if let Some(report) = vision {
            self.publish_vision(report);
        }
        self.pump = Pump::Playing(unit);
    }

    fn rejected(&mut self, unit: UnitId, failure: CommitFailure) -> Result<()> {
        if matches!(
            failure.severity(),
            ErrorSeverity::Internal | ErrorSeverity::Fatal
        ) {
            tracing::error!(
                target: "runtime::session",
                unit = ?unit,
                code = failure.error_code(),
                error = %failure,
                "commit broke the encounter"
            );
            return Err(RuntimeError::Commit(failure));
        }

        warn!(
            target: "runtime::session",
            unit = ?unit,
            phase = failure.phase.as_str(),
            code = failure.error_code(),
            error = %failure.error,
            "commit rejected"
        );
        self.publish(Event::Combat(CombatEvent::CommitRejected {
            unit,
            phase: failure.phase,
            error: failure.error.to_string(),
        }));
        self.note_rejection(unit);
        Ok(())
    }

    fn note_rejection(&mut self, unit: UnitId) {
        self.rejections += 1;
        if self.rejections >= self.config.max_rejections_per_turn {
            warn!(
                target: "runtime::session",
                unit = ?unit,
                rejections = self.rejections,
                "too many rejected orders; ending turn"
            );
            self.end_turn(unit);
        }
    }

    fn play(&mut self, unit: UnitId) {
        let Some((actor, kind)) = self.playback.tick() else {
            return;
        };
        self.encounter.finish_resolution(actor);
        debug!(target: "runtime::session", unit = ?actor, kind = %kind, "playback finished");
        self.publish(Event::Combat(CombatEvent::PlaybackFinished { unit: actor, kind }));

        let alive = self.encounter.unit(unit).is_some_and(UnitState::is_alive);
        if alive && !self.encounter.is_game_over() {
            self.pump = Pump::Awaiting(unit);
        } else {
            self.end_turn(unit);
        }
    }

    fn end_turn(&mut self, unit: UnitId) {
        if self.encounter.end_turn(unit) {
            debug!(target: "runtime::session", unit = ?unit, "turn ended");
            self.publish(Event::Turn(TurnEvent::Ended { unit }));
        }
        self.pump = Pump::Advance;
    }

    fn finish(&mut self) {
        let winner = self
            .encounter
            .roster()
            .iter_living()
            .next()
            .map(|state| state.faction);
        info!(
            target: "runtime::session",
            winner = ?winner,
            round = self.encounter.turns().round(),
            "game over"
        );
        self.publish(Event::Turn(TurnEvent::GameOver { winner }));
        self.pump = Pump::Done(SessionStatus::GameOver { winner });
    }

    fn publish_vision(&self, report: VisionReport) {
        match report.status {
            VisionStatus::Updated => {
                if report.stealth_changed() {
                    info!(target: "runtime::vision", revealed = ?report.revealed, "hidden units revealed");
                }
                self.publish(Event::Vision(VisionEvent { report }));
            }
            VisionStatus::Dropped => {
                debug!(target: "runtime::vision", "re-entrant vision request dropped");
            }
            VisionStatus::NotReady => {}
        }
    }

    fn publish(&self, event: Event) {
        self.bus.publish(event);
    }
}
