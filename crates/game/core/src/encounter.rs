//! The encounter: board, units, fog of war and turn order in one place.
//!
//! [`Encounter`] is the single owner of mutable combat state. Queries take
//! `&self` or reuse the cached search; every mutation goes through a method
//! here so occupancy, lights and cached results stay in sync.

use crate::action::{
    ActionDescriptor, ActionKey, ActionKind, AttackCommit, CommitError, CommitFailure,
    CommitOutcome, CommitTransition, MoveCommit, SelfCastCommit, TransitionPhase, acting_unit,
};
use crate::config::GameConfig;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::grid::{Grid, SearchArena};
use crate::preview::AttackPreview;
use crate::search::{self, Omniscient, Reachability, SearchQuery, TargetSight};
use crate::state::{
    EquipError, HandSlot, HandheldItem, Position, Roster, StatusEffect, StatusEffectKind, UnitId,
    UnitState,
};
use crate::turn::{TickReport, TurnAdvance, TurnController, TurnPhase, start_of_turn};
use crate::vision::{LightId, VisionReport, VisionSystem};
use crate::{area, los};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncounterError {
    #[error("the encounter has already started")]
    AlreadyStarted,

    #[error("unit {name} has no position")]
    Unplaced { name: String },

    #[error("cell {position} is outside the board")]
    OutOfBounds { position: Position },

    #[error("cell {position} is not walkable")]
    Blocked { position: Position },

    #[error("cell {position} is occupied by {occupant}")]
    Occupied { position: Position, occupant: UnitId },

    #[error("the roster is full")]
    RosterFull,

    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {unit} cannot equip: {source}")]
    Equip {
        unit: UnitId,
        #[source]
        source: EquipError,
    },
}

impl GameError for EncounterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Equip { .. } | Self::Occupied { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyStarted => "ENCOUNTER_ALREADY_STARTED",
            Self::Unplaced { .. } => "ENCOUNTER_UNPLACED",
            Self::OutOfBounds { .. } => "ENCOUNTER_OUT_OF_BOUNDS",
            Self::Blocked { .. } => "ENCOUNTER_BLOCKED",
            Self::Occupied { .. } => "ENCOUNTER_OCCUPIED",
            Self::RosterFull => "ENCOUNTER_ROSTER_FULL",
            Self::UnitNotFound(_) => "ENCOUNTER_UNIT_NOT_FOUND",
            Self::Equip { .. } => "ENCOUNTER_EQUIP",
        }
    }
}

/// Result of granting a unit its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnStart {
    pub unit: UnitId,
    pub tick: TickReport,
    pub vision: VisionReport,
}

impl TurnStart {
    /// False if a status effect killed the unit before it could act.
    pub fn can_act(&self) -> bool {
        !self.tick.died
    }
}

#[derive(Clone, Debug)]
struct CachedSearch {
    unit: UnitId,
    action: ActionDescriptor,
    result: Reachability,
}

#[derive(Clone, Debug)]
pub struct Encounter {
    pub(crate) config: GameConfig,
    pub(crate) grid: Grid,
    pub(crate) arena: SearchArena,
    pub(crate) roster: Roster,
    pub(crate) vision: VisionSystem,
    pub(crate) turns: TurnController,
    cached: Option<CachedSearch>,
    started: bool,
}

impl Encounter {
    pub fn new(config: GameConfig, grid: Grid) -> Self {
        let arena = SearchArena::new(&grid);
        Self {
            config,
            grid,
            arena,
            roster: Roster::new(),
            vision: VisionSystem::new(),
            turns: TurnController::new(Vec::new()),
            cached: None,
            started: false,
        }
    }

    /// Open board sized by the configuration.
    pub fn from_config(config: GameConfig) -> Self {
        let grid = Grid::open(config.grid_width, config.grid_height);
        Self::new(config, grid)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Terrain edits invalidate cached searches. Run
    /// [`update_vision`](Self::update_vision) after changing vision blockers.
    pub fn grid_mut(&mut self) -> &mut Grid {
        self.cached = None;
        &mut self.grid
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.roster.get(id)
    }

    pub fn vision(&self) -> &VisionSystem {
        &self.vision
    }

    pub fn turns(&self) -> &TurnController {
        &self.turns
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Adds a placed unit to the roster before the encounter starts.
    ///
    /// The unit's default action is selected and its held light attached.
    pub fn spawn(&mut self, mut unit: UnitState) -> Result<UnitId, EncounterError> {
        if self.started {
            return Err(EncounterError::AlreadyStarted);
        }
        let position = unit.position.ok_or_else(|| EncounterError::Unplaced {
            name: unit.name.clone(),
        })?;
        let cell = self
            .grid
            .cell_at(position)
            .ok_or(EncounterError::OutOfBounds { position })?;
        if !cell.is_walkable() {
            return Err(EncounterError::Blocked { position });
        }
        if let Some(occupant) = cell.occupant {
            return Err(EncounterError::Occupied { position, occupant });
        }

        unit.light = None;
        unit.loadout.select_default(&unit.equipment);
        let id = self.roster.insert(unit).ok_or(EncounterError::RosterFull)?;
        self.grid.place_occupant(position, id);
        self.sync_light(id);
        Ok(id)
    }

    /// Fixes the initiative order and runs the first vision pass.
    pub fn start(&mut self) -> Result<VisionReport, EncounterError> {
        if self.started {
            return Err(EncounterError::AlreadyStarted);
        }
        self.started = true;
        self.turns = TurnController::from_roster(&self.roster);
        self.arena.reset(&self.grid);
        self.vision.initialize(&self.grid);
        Ok(self.update_vision())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Legal moves and attack targets for `unit` with `action`.
    ///
    /// The result is cached per unit and action until the next mutation.
    /// Dead or unknown units get an empty result.
    pub fn compute_reachable(&mut self, unit: UnitId, action: Option<&ActionDescriptor>) -> Reachability {
        let Some(action) = action else {
            return Reachability::empty();
        };
        if let Some(cached) = &self.cached {
            if cached.unit == unit && cached.action == *action {
                return cached.result.clone();
            }
        }
        let Some(searcher) = self.roster.living(unit) else {
            return Reachability::empty();
        };

        let sight: &dyn TargetSight = if self.vision.is_ready() {
            &self.vision
        } else {
            &Omniscient
        };
        let result = search::compute_reachable(
            &self.grid,
            &mut self.arena,
            &self.roster,
            sight,
            SearchQuery::for_unit(searcher, Some(action)),
        );
        self.cached = Some(CachedSearch {
            unit,
            action: action.clone(),
            result: result.clone(),
        });
        result
    }

    /// Search for the unit's currently selected action.
    pub fn compute_reachable_selected(&mut self, unit: UnitId) -> Reachability {
        let action = self.roster.get(unit).and_then(UnitState::selected_action);
        self.compute_reachable(unit, action.as_ref())
    }

    /// Any cached search for the unit answers move destinations, except a
    /// ground attack search, which leaves its target tiles out of them.
    fn reachable_moves(&mut self, unit: UnitId) -> Reachability {
        match &self.cached {
            Some(cached) if cached.unit == unit && !cached.action.can_target_empty_tiles => {
                cached.result.clone()
            }
            _ => self.compute_reachable(unit, Some(&ActionDescriptor::move_only())),
        }
    }

    pub fn has_line_of_sight(&self, from: Position, to: Position) -> bool {
        los::has_line_of_sight(&self.grid, from, to)
    }

    pub fn enumerate_area(&self, center: Position, radius: u32) -> Vec<Position> {
        area::enumerate_area(&self.grid, center, radius)
    }

    pub fn is_tile_visible(&self, position: Position) -> bool {
        self.vision.is_tile_visible(position)
    }

    pub fn is_tile_illuminated(&self, position: Position) -> bool {
        self.vision.is_tile_illuminated(position)
    }

    /// Whether `observer` can currently detect `target`. Every living unit is
    /// detectable until the vision system is ready.
    pub fn can_see_unit(&self, observer: UnitId, target: UnitId) -> bool {
        let Some(target) = self.roster.living(target) else {
            return false;
        };
        if !self.vision.is_ready() {
            return true;
        }
        self.vision.can_see_unit(observer, target)
    }

    /// Previews a target from the unit's selected action.
    pub fn preview_attack(&mut self, unit: UnitId, target: Position) -> Option<AttackPreview> {
        let action = self.roster.get(unit)?.selected_action()?;
        let reach = self.compute_reachable(unit, Some(&action));
        let attack = reach.attack_at(target)?;
        Some(AttackPreview::new(&self.grid, &self.roster, &action, attack))
    }

    pub fn is_game_over(&self) -> bool {
        self.turns.is_game_over() || TurnController::check_game_over(&self.roster)
    }

    pub fn current_unit(&self) -> Option<UnitId> {
        self.turns.current_unit()
    }

    // ========================================================================
    // Fog of war and lights
    // ========================================================================

    /// Runs a vision pass. Requests made while a pass is running are dropped.
    pub fn update_vision(&mut self) -> VisionReport {
        let report = self.vision.update_vision(&mut self.grid, &mut self.roster);
        if report.is_updated() {
            self.cached = None;
        }
        report
    }

    pub fn add_light(&mut self, center: Position, range: u32) -> LightId {
        let id = self.vision.lights_mut().add(Some(center), range);
        self.update_vision();
        id
    }

    pub fn move_light(&mut self, light: LightId, center: Option<Position>) -> bool {
        let moved = self.vision.lights_mut().move_to(light, center);
        if moved {
            self.update_vision();
        }
        moved
    }

    pub fn set_light_active(&mut self, light: LightId, active: bool) -> bool {
        let changed = self.vision.lights_mut().set_active(light, active);
        if changed {
            self.update_vision();
        }
        changed
    }

    pub fn remove_light(&mut self, light: LightId) -> bool {
        let removed = self.vision.lights_mut().remove(light);
        if removed {
            self.update_vision();
        }
        removed
    }

    /// Creates, resizes or drops the light carried by the unit's equipment.
    fn sync_light(&mut self, unit: UnitId) {
        let Some(state) = self.roster.get_mut(unit) else {
            return;
        };
        let range = if state.is_alive() {
            state.equipment.light_range()
        } else {
            None
        };
        let lights = self.vision.lights_mut();
        match (state.light, range) {
            (Some(id), Some(range)) => {
                lights.set_range(id, range);
                lights.move_to(id, state.position);
            }
            (Some(id), None) => {
                lights.remove(id);
                state.light = None;
            }
            (None, Some(range)) => state.light = Some(lights.add(state.position, range)),
            (None, None) => {}
        }
    }

    // ========================================================================
    // Turns
    // ========================================================================

    /// Moves initiative to the next living unit. Clears cached searches.
    pub fn advance_turn(&mut self) -> TurnAdvance {
        self.cached = None;
        self.turns.advance(&self.roster)
    }

    /// Grants the selected unit its turn and applies its start-of-turn tick.
    ///
    /// Returns `None` if the unit is not the one selected by
    /// [`advance_turn`](Self::advance_turn) or a turn is already held. A unit
    /// killed by its tick is removed and its turn ends immediately.
    pub fn begin_turn(&mut self, unit: UnitId) -> Option<TurnStart> {
        if self.roster.living(unit).is_none() || !self.turns.grant(unit) {
            return None;
        }
        self.cached = None;

        let state = self.roster.get_mut(unit)?;
        let tick = start_of_turn(state, &self.config);
        if tick.died {
            self.bury(unit);
            self.turns.end_turn(unit);
        }
        let vision = self.update_vision();
        Some(TurnStart { unit, tick, vision })
    }

    /// Ends the unit's turn. Refused while its action is resolving.
    pub fn end_turn(&mut self, unit: UnitId) -> bool {
        let ended = self.turns.end_turn(unit);
        if ended {
            self.cached = None;
        }
        ended
    }

    /// Marks the unit's last commit as still playing out.
    pub fn begin_resolution(&mut self, unit: UnitId) -> bool {
        self.turns.begin_resolution(unit)
    }

    pub fn finish_resolution(&mut self, unit: UnitId) -> bool {
        self.turns.finish_resolution(unit)
    }

    // ========================================================================
    // Commits
    // ========================================================================

    /// Runs `transition` through pre-validation, application and
    /// post-validation, then refreshes fog of war.
    pub fn commit<T: CommitTransition>(&mut self, transition: &T) -> Result<CommitOutcome, CommitFailure> {
        let actor = transition.actor();
        transition
            .pre_validate(self)
            .map_err(|error| self.failure(TransitionPhase::PreValidate, actor, error))?;
        let mut outcome = transition
            .apply(self)
            .map_err(|error| self.failure(TransitionPhase::Apply, actor, error))?;
        self.cached = None;
        transition
            .post_validate(self)
            .map_err(|error| self.failure(TransitionPhase::PostValidate, actor, error))?;

        outcome.vision = Some(self.update_vision());
        Ok(outcome)
    }

    /// Moves the unit to `destination` along the cheapest path.
    pub fn commit_move(&mut self, unit: UnitId, destination: Position) -> Result<CommitOutcome, CommitFailure> {
        self.ensure_acting(unit)?;
        let reach = self.reachable_moves(unit);
        let Some(found) = reach.move_to(destination) else {
            return Err(self.failure(
                TransitionPhase::PreValidate,
                unit,
                CommitError::Unreachable { destination },
            ));
        };
        self.commit(&MoveCommit::to(unit, found))
    }

    /// Attacks `target` with the selected action, walking to the launch cell
    /// chosen by the search first.
    pub fn commit_attack(&mut self, unit: UnitId, target: Position) -> Result<CommitOutcome, CommitFailure> {
        let action = self.selected_targeted_action(unit)?;
        let reach = self.compute_reachable(unit, Some(&action));
        let Some(found) = reach.attack_at(target).cloned() else {
            return Err(self.failure(
                TransitionPhase::PreValidate,
                unit,
                CommitError::NoTarget { target },
            ));
        };
        self.commit(&AttackCommit::new(unit, action, found))
    }

    /// Casts the selected self-targeted ability.
    pub fn commit_self_cast(&mut self, unit: UnitId) -> Result<CommitOutcome, CommitFailure> {
        self.ensure_acting(unit)?;
        let action = self
            .roster
            .get(unit)
            .and_then(UnitState::selected_action)
            .ok_or_else(|| {
                self.failure(
                    TransitionPhase::PreValidate,
                    unit,
                    CommitError::NoActionSelected { unit },
                )
            })?;
        self.commit(&SelfCastCommit::new(unit, action))
    }

    fn selected_targeted_action(&self, unit: UnitId) -> Result<ActionDescriptor, CommitFailure> {
        self.ensure_acting(unit)?;
        let reject = |error| self.failure(TransitionPhase::PreValidate, unit, error);
        let action = self
            .roster
            .get(unit)
            .and_then(UnitState::selected_action)
            .ok_or_else(|| reject(CommitError::NoActionSelected { unit }))?;
        if !action.is_targeted() {
            return Err(reject(CommitError::WrongAction { kind: action.kind }));
        }
        Ok(action)
    }

    fn ensure_acting(&self, unit: UnitId) -> Result<(), CommitFailure> {
        acting_unit(self, unit)
            .map(|_| ())
            .map_err(|error| self.failure(TransitionPhase::PreValidate, unit, error))
    }

    fn failure(&self, phase: TransitionPhase, unit: UnitId, error: CommitError) -> CommitFailure {
        let mut context = ErrorContext::new(self.turns.round()).with_unit(unit);
        if let Some(position) = self.roster.get(unit).and_then(|state| state.position) {
            context = context.with_position(position);
        }
        CommitFailure::new(phase, error, context)
    }

    /// Removes a dead unit from the board: its cell and light are released.
    pub(crate) fn bury(&mut self, unit: UnitId) {
        let Some(state) = self.roster.get_mut(unit) else {
            return;
        };
        state.alive = false;
        state.action_points.current = 0;
        let position = state.position.take();
        let light = state.light.take();

        if let Some(position) = position {
            self.grid.remove_occupant(position, unit);
        }
        if let Some(light) = light {
            self.vision.lights_mut().remove(light);
        }
        self.cached = None;
    }

    // ========================================================================
    // Loadout, equipment and statuses
    // ========================================================================

    /// Selects an action. Returns false if the key is not available.
    pub fn select_action(&mut self, unit: UnitId, key: ActionKey) -> bool {
        let Some(state) = self.roster.get_mut(unit) else {
            return false;
        };
        let selected = state.loadout.select(key, &state.equipment);
        if selected {
            self.cached = None;
        }
        selected
    }

    /// Teaches an itemless action such as a self-cast.
    pub fn learn_action(&mut self, unit: UnitId, kind: ActionKind) -> Result<bool, EncounterError> {
        let state = self
            .roster
            .get_mut(unit)
            .ok_or(EncounterError::UnitNotFound(unit))?;
        Ok(state.loadout.learn(kind))
    }

    /// Puts `item` in `slot`, returning the item it replaced. Falls back to the
    /// default selection if the current one becomes unavailable.
    pub fn equip(
        &mut self,
        unit: UnitId,
        slot: HandSlot,
        item: HandheldItem,
    ) -> Result<Option<HandheldItem>, EncounterError> {
        let state = self
            .roster
            .get_mut(unit)
            .ok_or(EncounterError::UnitNotFound(unit))?;
        let previous = state
            .equipment
            .equip(slot, item)
            .map_err(|source| EncounterError::Equip { unit, source })?;
        state.loadout.revalidate(&state.equipment);
        self.after_equipment_change(unit);
        Ok(previous)
    }

    pub fn unequip(&mut self, unit: UnitId, slot: HandSlot) -> Result<Option<HandheldItem>, EncounterError> {
        let state = self
            .roster
            .get_mut(unit)
            .ok_or(EncounterError::UnitNotFound(unit))?;
        let removed = state.equipment.unequip(slot);
        state.loadout.revalidate(&state.equipment);
        self.after_equipment_change(unit);
        Ok(removed)
    }

    fn after_equipment_change(&mut self, unit: UnitId) {
        self.sync_light(unit);
        self.cached = None;
        if self.vision.is_ready() {
            self.update_vision();
        }
    }

    /// Adds or refreshes a status effect. Returns false if the unit has no
    /// free effect slot.
    pub fn apply_status(&mut self, unit: UnitId, effect: StatusEffect) -> Result<bool, EncounterError> {
        let state = self
            .roster
            .get_mut(unit)
            .ok_or(EncounterError::UnitNotFound(unit))?;
        let added = state.statuses.add(effect);
        self.after_status_change(effect.kind);
        Ok(added)
    }

    pub fn remove_status(&mut self, unit: UnitId, kind: StatusEffectKind) -> Result<bool, EncounterError> {
        let state = self
            .roster
            .get_mut(unit)
            .ok_or(EncounterError::UnitNotFound(unit))?;
        let removed = state.statuses.remove(kind);
        if removed {
            self.after_status_change(kind);
        }
        Ok(removed)
    }

    fn after_status_change(&mut self, kind: StatusEffectKind) {
        self.cached = None;
        if kind == StatusEffectKind::Hidden {
            self.update_vision();
        }
    }

    /// Phase of the unit in the turn machine, for presentation.
    pub fn turn_phase(&self) -> TurnPhase {
        self.turns.phase()
    }
}
