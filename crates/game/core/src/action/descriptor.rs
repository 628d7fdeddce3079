use crate::state::{HandheldItem, Position};

use super::{ActionKind, SelfCastKind, TargetType};

/// Targeting and cost parameters of a selectable action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub kind: ActionKind,
    pub name: String,
    /// Inclusive Manhattan range.
    pub min_range: u32,
    pub max_range: u32,
    pub requires_line_of_sight: bool,
    /// Only cells holding a living, hostile, detectable unit are targets.
    pub targets_enemies_only: bool,
    /// Every in-range cell is a target, occupied or not.
    pub can_target_empty_tiles: bool,
    /// Splash radius around the target; 0 hits the target cell only.
    pub area_radius: u32,
    /// Flat cost on use, on top of any movement.
    pub action_point_cost: u32,
    pub damage: u32,
    /// Rounds of the status a self-cast applies.
    pub status_rounds: u32,
}

impl ActionDescriptor {
    pub const SELF_CAST_ROUNDS: u32 = 3;

    fn base(kind: ActionKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
            min_range: 0,
            max_range: 0,
            requires_line_of_sight: false,
            targets_enemies_only: false,
            can_target_empty_tiles: false,
            area_radius: 0,
            action_point_cost: 0,
            damage: 0,
            status_rounds: 0,
        }
    }

    pub fn move_only() -> Self {
        Self::base(ActionKind::Move, "Move")
    }

    /// Unarmed strike.
    pub fn punch() -> Self {
        Self::melee(5, 10)
    }

    pub fn melee(damage: u32, action_point_cost: u32) -> Self {
        Self {
            min_range: 1,
            max_range: 1,
            targets_enemies_only: true,
            action_point_cost,
            damage,
            ..Self::base(ActionKind::MeleeAttack, "Punch")
        }
    }

    pub fn ranged(min_range: u32, max_range: u32, damage: u32, action_point_cost: u32) -> Self {
        Self {
            min_range,
            max_range: max_range.max(min_range),
            requires_line_of_sight: true,
            targets_enemies_only: true,
            action_point_cost,
            damage,
            ..Self::base(ActionKind::RangedAttack, "Shoot")
        }
    }

    pub fn ground(
        min_range: u32,
        max_range: u32,
        area_radius: u32,
        damage: u32,
        action_point_cost: u32,
    ) -> Self {
        Self {
            min_range,
            max_range: max_range.max(min_range),
            requires_line_of_sight: true,
            can_target_empty_tiles: true,
            area_radius,
            action_point_cost,
            damage,
            ..Self::base(ActionKind::GroundAttack, "Blast")
        }
    }

    pub fn fireball() -> Self {
        Self {
            name: "Fireball".to_owned(),
            ..Self::ground(3, 6, 2, 12, 20)
        }
    }

    pub fn self_cast(kind: SelfCastKind) -> Self {
        let name = match kind {
            SelfCastKind::Stealth => "Stealth",
            SelfCastKind::Bulwark => "Bulwark",
        };
        Self {
            action_point_cost: 10,
            status_rounds: Self::SELF_CAST_ROUNDS,
            ..Self::base(ActionKind::SelfCast(kind), name)
        }
    }

    /// Preset for a kind that needs no item. Weapon and ranged attacks only
    /// exist through a held item.
    pub fn preset(kind: ActionKind) -> Option<Self> {
        match kind {
            ActionKind::Move => Some(Self::move_only()),
            ActionKind::MeleeAttack => Some(Self::punch()),
            ActionKind::GroundAttack => Some(Self::fireball()),
            ActionKind::SelfCast(cast) => Some(Self::self_cast(cast)),
            ActionKind::WeaponAttack | ActionKind::RangedAttack => None,
        }
    }

    /// Attack configured from a held item. `None` if the item grants no attack.
    pub fn from_item(item: &HandheldItem) -> Option<Self> {
        if !item.action.is_attack() {
            return None;
        }
        let ground = item.action == ActionKind::GroundAttack;
        Some(Self {
            name: item.name.clone(),
            min_range: item.min_range,
            max_range: item.max_range.max(item.min_range),
            requires_line_of_sight: item.action.requires_line_of_sight(),
            targets_enemies_only: !ground,
            can_target_empty_tiles: ground,
            area_radius: item.splash_radius,
            action_point_cost: item.action_point_cost,
            damage: item.damage,
            ..Self::base(item.action, &item.name)
        })
    }

    pub fn target_type(&self) -> TargetType {
        match self.kind {
            ActionKind::Move => TargetType::None,
            ActionKind::SelfCast(_) => TargetType::SelfOnly,
            _ if self.can_target_empty_tiles => TargetType::GroundTile,
            _ if self.max_range <= 1 => TargetType::Melee,
            _ => TargetType::Ranged,
        }
    }

    /// True if the action selects target cells during a search.
    pub fn is_targeted(&self) -> bool {
        self.targets_enemies_only || self.can_target_empty_tiles
    }

    pub fn in_range(&self, from: Position, to: Position) -> bool {
        let distance = from.manhattan(to);
        distance >= self.min_range && distance <= self.max_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WeaponClass;

    #[test]
    fn musket_configures_a_ranged_attack() {
        let musket = HandheldItem::new("Long Musket", 12, 30)
            .with_class(WeaponClass::TwoHanded)
            .with_range(2, 10)
            .with_action(ActionKind::RangedAttack);

        let descriptor = ActionDescriptor::from_item(&musket).unwrap();
        assert_eq!(descriptor.kind, ActionKind::RangedAttack);
        assert_eq!(descriptor.target_type(), TargetType::Ranged);
        assert!(descriptor.targets_enemies_only);
        assert!(!descriptor.can_target_empty_tiles);
        assert_eq!((descriptor.min_range, descriptor.max_range), (2, 10));
        assert_eq!(descriptor.action_point_cost, 30);
        assert_eq!(descriptor.name, "Long Musket");
    }

    #[test]
    fn grenade_configures_a_ground_attack() {
        let grenade = HandheldItem::new("Frag Grenade", 12, 20)
            .with_range(2, 8)
            .with_splash(2)
            .with_action(ActionKind::GroundAttack);

        let descriptor = ActionDescriptor::from_item(&grenade).unwrap();
        assert_eq!(descriptor.target_type(), TargetType::GroundTile);
        assert!(descriptor.can_target_empty_tiles);
        assert_eq!(descriptor.area_radius, 2);
    }

    #[test]
    fn items_without_attacks_configure_nothing() {
        let lantern = HandheldItem::new("Lantern", 0, 0)
            .with_action(ActionKind::Move)
            .with_light(4);
        assert!(ActionDescriptor::from_item(&lantern).is_none());
    }

    #[test]
    fn presets_cover_itemless_kinds() {
        assert_eq!(
            ActionDescriptor::preset(ActionKind::MeleeAttack).map(|d| d.target_type()),
            Some(TargetType::Melee)
        );
        assert!(ActionDescriptor::preset(ActionKind::RangedAttack).is_none());

        let fireball = ActionDescriptor::preset(ActionKind::GroundAttack).unwrap();
        assert_eq!((fireball.min_range, fireball.max_range), (3, 6));
        assert_eq!(fireball.area_radius, 2);
        assert_eq!(fireball.damage, 12);
        assert_eq!(fireball.action_point_cost, 20);

        let stealth = ActionDescriptor::preset(ActionKind::SelfCast(SelfCastKind::Stealth)).unwrap();
        assert_eq!(stealth.target_type(), TargetType::SelfOnly);
        assert_eq!(stealth.status_rounds, 3);
    }

    #[test]
    fn only_shots_and_throws_need_line_of_sight() {
        assert!(!ActionDescriptor::punch().requires_line_of_sight);
        assert!(ActionDescriptor::fireball().requires_line_of_sight);

        let pike = HandheldItem::new("Reach Pike", 10, 15)
            .with_class(WeaponClass::TwoHanded)
            .with_range(2, 2)
            .with_action(ActionKind::WeaponAttack);
        let musket = HandheldItem::new("Long Musket", 14, 25)
            .with_range(2, 6)
            .with_action(ActionKind::RangedAttack);
        assert!(!ActionDescriptor::from_item(&pike).unwrap().requires_line_of_sight);
        assert!(ActionDescriptor::from_item(&musket).unwrap().requires_line_of_sight);
    }

    #[test]
    fn range_is_inclusive() {
        let pike = ActionDescriptor::ranged(2, 2, 10, 15);
        let origin = Position::new(0, 0);
        assert!(!pike.in_range(origin, Position::new(1, 0)));
        assert!(pike.in_range(origin, Position::new(1, 1)));
        assert!(!pike.in_range(origin, Position::new(2, 1)));
    }
}
