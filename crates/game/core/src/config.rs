/// Combat rule constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Board width in cells.
    pub grid_width: u32,
    /// Board height in cells.
    pub grid_height: u32,

    /// Action points every unit receives before its agility bonus.
    pub base_action_points: u32,
    /// Vision range every unit receives before its perception bonus.
    pub base_vision_range: u32,

    pub regeneration_heal: u32,
    pub poison_damage: u32,
    pub burning_damage: u32,
    pub mobility_bonus: u32,
    pub slow_penalty: u32,
    /// Budget a slowed unit keeps when the penalty would take it lower.
    pub slow_floor: u32,
    pub bulwark_armor: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_UNITS: usize = 64;
    pub const MAX_STATUS_EFFECTS: usize = 15;
    pub const MAX_LEARNED_ACTIONS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GRID_SIZE: u32 = 20;
    pub const DEFAULT_ACTION_POINTS: u32 = 50;
    pub const DEFAULT_VISION_RANGE: u32 = 5;

    pub fn new() -> Self {
        Self {
            grid_width: Self::DEFAULT_GRID_SIZE,
            grid_height: Self::DEFAULT_GRID_SIZE,
            base_action_points: Self::DEFAULT_ACTION_POINTS,
            base_vision_range: Self::DEFAULT_VISION_RANGE,
            regeneration_heal: 5,
            poison_damage: 5,
            burning_damage: 10,
            mobility_bonus: 2,
            slow_penalty: 4,
            slow_floor: 2,
            bulwark_armor: 3,
        }
    }

    pub fn with_grid_size(mut self, width: u32, height: u32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    pub fn with_base_action_points(mut self, points: u32) -> Self {
        self.base_action_points = points;
        self
    }

    pub fn with_base_vision_range(mut self, range: u32) -> Self {
        self.base_vision_range = range;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
