//! Which actions a unit can select and which one is selected.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::{Equipment, HandSlot};

use super::{ActionDescriptor, ActionKind};

/// Identifies a selectable action: its kind and the hand whose item
/// configures it, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionKey {
    pub kind: ActionKind,
    pub hand: Option<HandSlot>,
}

impl ActionKey {
    pub const MOVE: Self = Self::innate(ActionKind::Move);
    pub const PUNCH: Self = Self::innate(ActionKind::MeleeAttack);

    /// An action that needs no item.
    pub const fn innate(kind: ActionKind) -> Self {
        Self { kind, hand: None }
    }

    pub const fn held(kind: ActionKind, hand: HandSlot) -> Self {
        Self {
            kind,
            hand: Some(hand),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loadout {
    learned: ArrayVec<ActionKind, { GameConfig::MAX_LEARNED_ACTIONS }>,
    selected: ActionKey,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            learned: ArrayVec::new(),
            selected: ActionKey::PUNCH,
        }
    }
}

impl Loadout {
    pub fn selected(&self) -> ActionKey {
        self.selected
    }

    pub fn learned(&self) -> &[ActionKind] {
        &self.learned
    }

    /// Teaches an itemless action. Returns false if already known or full.
    pub fn learn(&mut self, kind: ActionKind) -> bool {
        if self.learned.contains(&kind) || self.learned.is_full() {
            return false;
        }
        self.learned.push(kind);
        true
    }

    /// Every key the unit can select with its current equipment.
    pub fn available(&self, equipment: &Equipment) -> Vec<ActionKey> {
        let mut keys = vec![ActionKey::MOVE];
        for (slot, item) in equipment.iter() {
            if item.action.is_attack() {
                keys.push(ActionKey::held(item.action, slot));
            }
        }
        keys.push(ActionKey::PUNCH);
        for kind in &self.learned {
            let key = ActionKey::innate(*kind);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn is_available(&self, key: ActionKey, equipment: &Equipment) -> bool {
        self.descriptor(key, equipment).is_some()
    }

    /// Resolves a key into a descriptor. `None` if the key is not available.
    pub fn descriptor(&self, key: ActionKey, equipment: &Equipment) -> Option<ActionDescriptor> {
        match key.hand {
            Some(slot) => equipment
                .item(slot)
                .filter(|item| item.action == key.kind)
                .and_then(ActionDescriptor::from_item),
            None => {
                let innate = matches!(key.kind, ActionKind::Move | ActionKind::MeleeAttack);
                if innate || self.learned.contains(&key.kind) {
                    ActionDescriptor::preset(key.kind)
                } else {
                    None
                }
            }
        }
    }

    /// Default selection: right-hand attack, then left-hand attack, then punch.
    pub fn default_key(equipment: &Equipment) -> ActionKey {
        equipment
            .iter()
            .find(|(_, item)| item.action.is_attack())
            .map(|(slot, item)| ActionKey::held(item.action, slot))
            .unwrap_or(ActionKey::PUNCH)
    }

    pub fn select_default(&mut self, equipment: &Equipment) {
        self.selected = Self::default_key(equipment);
    }

    /// Selects `key` if it is available. Returns false otherwise.
    pub fn select(&mut self, key: ActionKey, equipment: &Equipment) -> bool {
        if !self.is_available(key, equipment) {
            return false;
        }
        self.selected = key;
        true
    }

    /// Falls back to the default selection if equipment changes made the
    /// current one unavailable. Returns true if the selection changed.
    pub fn revalidate(&mut self, equipment: &Equipment) -> bool {
        if self.is_available(self.selected, equipment) {
            return false;
        }
        self.select_default(equipment);
        true
    }
}
