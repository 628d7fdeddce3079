use crate::action::{ActionDescriptor, Loadout};
use crate::config::GameConfig;
use crate::stats::Attributes;
use crate::vision::LightId;

use super::{
    Equipment, Facing, Position, ResourceMeter, StatusEffect, StatusEffectKind, StatusEffects,
    UnitId,
};

/// Side a unit fights for.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    /// Player-controlled units; their vision cones drive the fog of war.
    Player,
    /// AI-controlled units.
    Enemy,
}

impl Faction {
    pub const ALL: [Faction; 2] = [Faction::Player, Faction::Enemy];

    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}

/// Complete mutable state of a unit taking part in an encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitState {
    pub id: UnitId,
    pub name: String,
    pub faction: Faction,
    /// `None` once the unit is dead or before it is placed.
    pub position: Option<Position>,
    pub facing: Facing,
    pub attributes: Attributes,
    pub health: ResourceMeter,
    pub action_points: ResourceMeter,
    pub vision_range: u32,
    pub alive: bool,
    pub statuses: StatusEffects,
    pub equipment: Equipment,
    pub loadout: Loadout,
    /// Illumination source owned by the unit's equipment.
    pub light: Option<LightId>,
}

impl UnitState {
    /// Creates a unit with full health and budget derived from `attributes`.
    ///
    /// The id is assigned when the unit joins a roster.
    pub fn new(
        name: impl Into<String>,
        faction: Faction,
        attributes: Attributes,
        config: &GameConfig,
    ) -> Self {
        Self {
            id: UnitId::default(),
            name: name.into(),
            faction,
            position: None,
            facing: Facing::default(),
            attributes,
            health: ResourceMeter::full(attributes.max_health()),
            action_points: ResourceMeter::full(attributes.action_points(config)),
            vision_range: attributes.vision_range(config),
            alive: true,
            statuses: StatusEffects::empty(),
            equipment: Equipment::empty(),
            loadout: Loadout::default(),
            light: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_status(mut self, effect: StatusEffect) -> Self {
        self.statuses.add(effect);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_hidden(&self) -> bool {
        self.statuses.has(StatusEffectKind::Hidden)
    }

    pub fn is_hostile_to(&self, other: &UnitState) -> bool {
        self.faction.is_hostile_to(other.faction)
    }

    /// Damage reduction from held items and bulwark.
    pub fn armor(&self, config: &GameConfig) -> u32 {
        let bulwark = if self.statuses.has(StatusEffectKind::Bulwark) {
            config.bulwark_armor
        } else {
            0
        };
        self.equipment.armor_bonus() + bulwark
    }

    /// Descriptor of the currently selected action, if it is still available.
    pub fn selected_action(&self) -> Option<ActionDescriptor> {
        self.loadout.descriptor(self.loadout.selected(), &self.equipment)
    }
}
