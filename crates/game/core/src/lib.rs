//! Deterministic rules for grid tactical combat.
//!
//! `tactics-core` owns the board, line of sight, reachability search, area
//! enumeration, fog of war and turn order. It has no notion of time: every
//! commit mutates state at one instant, and the runtime decides how long the
//! result takes to play out. All state mutation flows through
//! [`encounter::Encounter`].
pub mod action;
pub mod area;
pub mod combat;
pub mod config;
pub mod encounter;
pub mod error;
pub mod grid;
pub mod los;
pub mod preview;
pub mod search;
pub mod state;
pub mod stats;
pub mod turn;
pub mod vision;

#[cfg(test)]
mod testing;

pub use action::{
    ActionDescriptor, ActionKey, ActionKind, AttackCommit, CommitError, CommitFailure,
    CommitOutcome, CommitTransition, Loadout, MoveCommit, SelfCastCommit, SelfCastKind,
    TargetType, TransitionPhase,
};
pub use area::{enumerate_area, visit_area};
pub use combat::{DamageKind, DamageOutcome, apply_damage, apply_healing};
pub use config::GameConfig;
pub use encounter::{Encounter, EncounterError, TurnStart};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use grid::{CardinalDirection, Cell, CellFlags, CellId, Grid, GridDimensions, SearchArena};
pub use los::{BresenhamLine, has_line_of_sight};
pub use preview::AttackPreview;
pub use search::{
    AttackTarget, MoveDestination, Omniscient, Reachability, SearchQuery, TargetSight,
    compute_reachable,
};
pub use state::{
    EquipError, Equipment, Facing, Faction, HandSlot, HandheldItem, HealthDelta, Position,
    ResourceMeter, Roster, StatusEffect, StatusEffectKind, StatusEffects, UnitId, UnitState,
    WeaponClass,
};
pub use stats::Attributes;
pub use turn::{TickReport, TurnAdvance, TurnController, TurnPhase, start_of_turn};
pub use vision::{
    IlluminationSource, LightId, LightMap, VisionPhase, VisionReport, VisionStatus, VisionSystem,
};
