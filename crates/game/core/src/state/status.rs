//! Status effect system for units.
//!
//! Effects are counted in rounds. Each effect is applied once at the start of
//! its bearer's turn, in the order it was registered, and then loses one
//! round. An effect whose round count reaches zero is removed right after its
//! last application.

use arrayvec::ArrayVec;

use crate::config::GameConfig;

/// Types of status effects.
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
pub enum StatusEffectKind {
    // ========================================================================
    // Recovery & buffs
    // ========================================================================
    /// Heals every round.
    Regeneration,
    Rage,
    /// Health never drops below 1 while active.
    CannotDie,
    Empower,
    /// +budget every round while the unit can act.
    Mobility,
    /// Armor bonus while active.
    Bulwark,
    /// Untargetable by enemies unless standing in light.
    Hidden,

    // ========================================================================
    // Disabling effects (budget forced to zero)
    // ========================================================================
    Knockdown,
    Petrified,
    Frozen,

    // ========================================================================
    // Damage over time & debuffs
    // ========================================================================
    /// Pure damage every round; ignores armor.
    Poisoned,
    /// Damage every round; armor applies.
    Burning,
    Slowed,
    Blinded,
    Perfidy,
}

/// Change to a unit's health produced by one round of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthDelta {
    None,
    Heal(u32),
    Damage(u32),
    PureDamage(u32),
}

impl StatusEffectKind {
    /// Applies one round of this effect to a freshly refilled action budget.
    ///
    /// `power` overrides the configured magnitude of the effect when present.
    pub fn round_mutation(
        self,
        budget: u32,
        power: Option<u32>,
        config: &GameConfig,
    ) -> (u32, HealthDelta) {
        match self {
            Self::Regeneration => (
                budget,
                HealthDelta::Heal(power.unwrap_or(config.regeneration_heal)),
            ),
            Self::Poisoned => (
                budget,
                HealthDelta::PureDamage(power.unwrap_or(config.poison_damage)),
            ),
            Self::Burning => (
                budget,
                HealthDelta::Damage(power.unwrap_or(config.burning_damage)),
            ),
            Self::Knockdown | Self::Petrified | Self::Frozen => (0, HealthDelta::None),
            Self::Slowed => {
                let penalty = power.unwrap_or(config.slow_penalty);
                let slowed = if budget > config.slow_floor + penalty {
                    budget - penalty
                } else if budget > 0 {
                    config.slow_floor
                } else {
                    budget
                };
                (slowed, HealthDelta::None)
            }
            Self::Mobility => {
                let bonus = power.unwrap_or(config.mobility_bonus);
                let boosted = if budget > 0 { budget + bonus } else { budget };
                (boosted, HealthDelta::None)
            }
            Self::Rage
            | Self::CannotDie
            | Self::Empower
            | Self::Bulwark
            | Self::Hidden
            | Self::Blinded
            | Self::Perfidy => (budget, HealthDelta::None),
        }
    }
}

/// A single status effect with its remaining duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub rounds_remaining: u32,
    /// Optional magnitude overriding the configured default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: Option<u32>,
}

impl StatusEffect {
    pub fn new(kind: StatusEffectKind, rounds: u32) -> Self {
        Self {
            kind,
            rounds_remaining: rounds,
            power: None,
        }
    }

    pub fn with_power(mut self, power: u32) -> Self {
        self.power = Some(power);
        self
    }
}

/// Active status effects on a unit, in registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Adds an effect.
    ///
    /// If the kind is already present, it keeps its registration slot and its
    /// duration extends to the longer of the two; a new power replaces the old.
    /// Returns true if the kind was not present before.
    pub fn add(&mut self, effect: StatusEffect) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.rounds_remaining = existing.rounds_remaining.max(effect.rounds_remaining);
            if effect.power.is_some() {
                existing.power = effect.power;
            }
            return false;
        }

        if effect.rounds_remaining == 0 {
            return false;
        }

        // One slot per kind, so the capacity covers every kind.
        self.effects.push(effect);
        true
    }

    /// Removes an effect immediately. Returns true if it was present.
    pub fn remove(&mut self, kind: StatusEffectKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        before != self.effects.len()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Consumes one round of the effect at `index`, removing it when exhausted.
    ///
    /// Returns the kind of the removed effect.
    pub(crate) fn consume_round(&mut self, index: usize) -> Option<StatusEffectKind> {
        let effect = self.effects.get_mut(index)?;
        effect.rounds_remaining = effect.rounds_remaining.saturating_sub(1);
        if effect.rounds_remaining == 0 {
            Some(self.effects.remove(index).kind)
        } else {
            None
        }
    }

    pub(crate) fn at(&self, index: usize) -> Option<StatusEffect> {
        self.effects.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_adding_refreshes_without_reordering() {
        let mut effects = StatusEffects::empty();
        assert!(effects.add(StatusEffect::new(StatusEffectKind::Poisoned, 2)));
        assert!(effects.add(StatusEffect::new(StatusEffectKind::Hidden, 3)));
        assert!(!effects.add(StatusEffect::new(StatusEffectKind::Poisoned, 5)));

        let kinds: Vec<_> = effects.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![StatusEffectKind::Poisoned, StatusEffectKind::Hidden]
        );
        assert_eq!(
            effects.get(StatusEffectKind::Poisoned).map(|e| e.rounds_remaining),
            Some(5)
        );
    }

    #[test]
    fn zero_round_effect_is_ignored() {
        let mut effects = StatusEffects::empty();
        assert!(!effects.add(StatusEffect::new(StatusEffectKind::Frozen, 0)));
        assert!(effects.is_empty());
    }

    #[test]
    fn slowed_never_drops_an_active_unit_below_floor() {
        let config = GameConfig::new();
        let slowed = StatusEffectKind::Slowed;
        assert_eq!(slowed.round_mutation(10, None, &config).0, 6);
        assert_eq!(slowed.round_mutation(6, None, &config).0, 2);
        assert_eq!(slowed.round_mutation(1, None, &config).0, 2);
        assert_eq!(slowed.round_mutation(0, None, &config).0, 0);
    }

    #[test]
    fn mobility_only_helps_units_that_can_act() {
        let config = GameConfig::new();
        assert_eq!(
            StatusEffectKind::Mobility.round_mutation(5, None, &config).0,
            7
        );
        assert_eq!(
            StatusEffectKind::Mobility.round_mutation(0, None, &config).0,
            0
        );
    }

    #[test]
    fn power_overrides_configured_magnitude() {
        let config = GameConfig::new();
        assert_eq!(
            StatusEffectKind::Burning.round_mutation(4, Some(3), &config),
            (4, HealthDelta::Damage(3))
        );
        assert_eq!(
            StatusEffectKind::Regeneration.round_mutation(4, None, &config),
            (4, HealthDelta::Heal(5))
        );
    }

    #[test]
    fn parses_kind_names_case_insensitively() {
        let kind: StatusEffectKind = "cannot_die".parse().unwrap();
        assert_eq!(kind, StatusEffectKind::CannotDie);
        assert_eq!(StatusEffectKind::Hidden.as_ref(), "hidden");
    }
}
