//! Unit-level state: identities, positions, meters, statuses and equipment.
mod common;
mod equipment;
mod roster;
mod status;
mod unit;

pub use common::{Facing, Position, ResourceMeter, UnitId};
pub use equipment::{EquipError, Equipment, HandSlot, HandheldItem, WeaponClass};
pub use roster::Roster;
pub use status::{HealthDelta, StatusEffect, StatusEffectKind, StatusEffects};
pub use unit::{Faction, UnitState};
