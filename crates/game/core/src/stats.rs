//! Unit attributes and the values derived from them.

use crate::config::GameConfig;

/// Primary attributes of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    pub level: u32,
    pub strength: u32,
    pub agility: u32,
    pub intellect: u32,
    pub endurance: u32,
    pub perception: u32,
    pub willpower: u32,
}

impl Attributes {
    pub const fn new(level: u32) -> Self {
        Self {
            level,
            strength: 5,
            agility: 5,
            intellect: 5,
            endurance: 5,
            perception: 5,
            willpower: 5,
        }
    }

    /// `10·level + 5·endurance + strength`.
    pub fn max_health(&self) -> u32 {
        10 * self.level + 5 * self.endurance + self.strength
    }

    /// Per-turn action points: base plus agility.
    pub fn action_points(&self, config: &GameConfig) -> u32 {
        config.base_action_points + self.agility
    }

    /// Base vision range: base plus half the perception.
    pub fn vision_range(&self, config: &GameConfig) -> u32 {
        config.base_vision_range + self.perception / 2
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new(1)
    }
}
