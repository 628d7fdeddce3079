//! Closed set of action kinds.

use std::fmt;

/// Self-targeted abilities.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SelfCastKind {
    /// Become hidden until revealed by light or attacking.
    Stealth,
    /// Raise armor for a few rounds.
    Bulwark,
}

/// Types of actions a unit can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Move,
    /// Unarmed strike against an adjacent enemy.
    MeleeAttack,
    /// Strike with a held weapon.
    WeaponAttack,
    RangedAttack,
    /// Area attack aimed at a cell rather than a unit.
    GroundAttack,
    SelfCast(SelfCastKind),
}

impl ActionKind {
    pub const fn is_attack(self) -> bool {
        matches!(
            self,
            Self::MeleeAttack | Self::WeaponAttack | Self::RangedAttack | Self::GroundAttack
        )
    }

    /// Strikes reach over obstacles; shots and thrown attacks do not.
    pub const fn requires_line_of_sight(self) -> bool {
        matches!(self, Self::RangedAttack | Self::GroundAttack)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => f.write_str("move"),
            Self::MeleeAttack => f.write_str("melee_attack"),
            Self::WeaponAttack => f.write_str("weapon_attack"),
            Self::RangedAttack => f.write_str("ranged_attack"),
            Self::GroundAttack => f.write_str("ground_attack"),
            Self::SelfCast(kind) => write!(f, "self_cast:{kind}"),
        }
    }
}

/// How an action picks its target, for presentation and input routing.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetType {
    None,
    Melee,
    Ranged,
    GroundTile,
    SelfOnly,
}
