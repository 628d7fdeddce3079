//! Handheld equipment carried in a unit's two hands.

use crate::action::ActionKind;

/// Hand an item is held in.
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
pub enum HandSlot {
    RightHand,
    LeftHand,
}

impl HandSlot {
    pub const ALL: [HandSlot; 2] = [HandSlot::RightHand, HandSlot::LeftHand];

    pub const fn other(self) -> Self {
        match self {
            Self::RightHand => Self::LeftHand,
            Self::LeftHand => Self::RightHand,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponClass {
    #[default]
    OneHanded,
    /// Occupies both hands.
    TwoHanded,
    Shield,
}

/// An item that can be held and that configures the attack it grants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandheldItem {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub class: WeaponClass,
    pub damage: u32,
    pub min_range: u32,
    pub max_range: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub splash_radius: u32,
    pub action_point_cost: u32,
    /// Attack granted while the item is held.
    pub action: ActionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor_bonus: u32,
    /// Manhattan radius lit around the bearer, if the item is a light.
    #[cfg_attr(feature = "serde", serde(default))]
    pub illumination_range: Option<u32>,
}

impl HandheldItem {
    /// A one-handed melee weapon with range 1.
    pub fn new(name: impl Into<String>, damage: u32, action_point_cost: u32) -> Self {
        Self {
            name: name.into(),
            class: WeaponClass::OneHanded,
            damage,
            min_range: 1,
            max_range: 1,
            splash_radius: 0,
            action_point_cost,
            action: ActionKind::WeaponAttack,
            armor_bonus: 0,
            illumination_range: None,
        }
    }

    pub fn with_class(mut self, class: WeaponClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_range(mut self, min_range: u32, max_range: u32) -> Self {
        self.min_range = min_range;
        self.max_range = max_range.max(min_range);
        self
    }

    pub fn with_action(mut self, action: ActionKind) -> Self {
        self.action = action;
        self
    }

    pub fn with_splash(mut self, radius: u32) -> Self {
        self.splash_radius = radius;
        self
    }

    pub fn with_armor(mut self, armor: u32) -> Self {
        self.armor_bonus = armor;
        self
    }

    pub fn with_light(mut self, range: u32) -> Self {
        self.illumination_range = Some(range);
        self
    }

    /// Returns true if both items can be held at the same time.
    pub fn can_pair_with(&self, other: &HandheldItem) -> bool {
        self.class != WeaponClass::TwoHanded
            && other.class != WeaponClass::TwoHanded
            && !(self.class == WeaponClass::Shield && other.class == WeaponClass::Shield)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EquipError {
    #[error("{item} cannot be held while {slot} grips {held}; a two-handed item needs both hands")]
    HandsOccupied {
        item: String,
        slot: HandSlot,
        held: String,
    },

    #[error("{item} cannot be held together with {held}")]
    Incompatible { item: String, held: String },
}

/// Items held in both hands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Equipment {
    right_hand: Option<HandheldItem>,
    left_hand: Option<HandheldItem>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn item(&self, slot: HandSlot) -> Option<&HandheldItem> {
        match slot {
            HandSlot::RightHand => self.right_hand.as_ref(),
            HandSlot::LeftHand => self.left_hand.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: HandSlot) -> &mut Option<HandheldItem> {
        match slot {
            HandSlot::RightHand => &mut self.right_hand,
            HandSlot::LeftHand => &mut self.left_hand,
        }
    }

    /// Places `item` in `slot`, returning the item it replaced.
    ///
    /// The item in the other hand must be compatible; it is never dropped
    /// implicitly.
    pub fn equip(
        &mut self,
        slot: HandSlot,
        item: HandheldItem,
    ) -> Result<Option<HandheldItem>, EquipError> {
        if let Some(held) = self.item(slot.other()) {
            if item.class == WeaponClass::TwoHanded || held.class == WeaponClass::TwoHanded {
                return Err(EquipError::HandsOccupied {
                    item: item.name,
                    slot: slot.other(),
                    held: held.name.clone(),
                });
            }
            if !item.can_pair_with(held) {
                return Err(EquipError::Incompatible {
                    item: item.name,
                    held: held.name.clone(),
                });
            }
        }

        Ok(self.slot_mut(slot).replace(item))
    }

    pub fn unequip(&mut self, slot: HandSlot) -> Option<HandheldItem> {
        self.slot_mut(slot).take()
    }

    /// Held items with their slots, right hand first.
    pub fn iter(&self) -> impl Iterator<Item = (HandSlot, &HandheldItem)> {
        HandSlot::ALL
            .into_iter()
            .filter_map(|slot| self.item(slot).map(|item| (slot, item)))
    }

    pub fn armor_bonus(&self) -> u32 {
        self.iter().map(|(_, item)| item.armor_bonus).sum()
    }

    /// Widest light radius among held items.
    pub fn light_range(&self) -> Option<u32> {
        self.iter()
            .filter_map(|(_, item)| item.illumination_range)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shield() -> HandheldItem {
        HandheldItem::new("Steel Shield", 1, 8)
            .with_class(WeaponClass::Shield)
            .with_armor(2)
    }

    fn pike() -> HandheldItem {
        HandheldItem::new("Reach Pike", 10, 15)
            .with_class(WeaponClass::TwoHanded)
            .with_range(2, 2)
    }

    #[test]
    fn equip_returns_replaced_item() {
        let mut equipment = Equipment::empty();
        let dagger = HandheldItem::new("Iron Dagger", 2, 4);
        let cutlass = HandheldItem::new("Cutlass", 5, 10);

        assert_eq!(equipment.equip(HandSlot::RightHand, dagger.clone()), Ok(None));
        assert_eq!(
            equipment.equip(HandSlot::RightHand, cutlass),
            Ok(Some(dagger))
        );
    }

    #[test]
    fn two_handed_rejects_occupied_other_hand() {
        let mut equipment = Equipment::empty();
        equipment.equip(HandSlot::LeftHand, shield()).unwrap();

        let err = equipment.equip(HandSlot::RightHand, pike()).unwrap_err();
        assert!(matches!(err, EquipError::HandsOccupied { slot: HandSlot::LeftHand, .. }));
    }

    #[test]
    fn two_shields_are_incompatible() {
        let mut equipment = Equipment::empty();
        equipment.equip(HandSlot::LeftHand, shield()).unwrap();

        let err = equipment.equip(HandSlot::RightHand, shield()).unwrap_err();
        assert!(matches!(err, EquipError::Incompatible { .. }));
    }

    #[test]
    fn armor_and_light_aggregate_over_hands() {
        let mut equipment = Equipment::empty();
        equipment.equip(HandSlot::LeftHand, shield()).unwrap();
        equipment
            .equip(
                HandSlot::RightHand,
                HandheldItem::new("Torch", 2, 10).with_light(3),
            )
            .unwrap();

        assert_eq!(equipment.armor_bonus(), 2);
        assert_eq!(equipment.light_range(), Some(3));
    }
}
