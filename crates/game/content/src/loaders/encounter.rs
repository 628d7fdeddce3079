//! Encounter layout loader.
//!
//! An encounter file describes the board (size, walls, smoke, rough ground,
//! fixed lights) and the units placed on it. Held items are referenced by
//! name and resolved against an [`ItemCatalog`].

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tactics_core::{
    ActionKind, Attributes, Encounter, Facing, Faction, GameConfig, Grid, HandSlot, Position,
    StatusEffect, UnitState,
};

use crate::loaders::{ItemCatalog, LoadResult, read_file};

/// Encounter structure for RON files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSpec {
    pub width: u32,
    pub height: u32,
    /// Impassable cells that block sight.
    #[serde(default)]
    pub walls: Vec<(i32, i32)>,
    /// Walkable cells that block sight.
    #[serde(default)]
    pub smoke: Vec<(i32, i32)>,
    /// `(x, y, cost)` movement cost overrides.
    #[serde(default)]
    pub rough: Vec<(i32, i32, u32)>,
    #[serde(default)]
    pub lights: Vec<LightSpec>,
    pub units: Vec<UnitSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSpec {
    pub position: (i32, i32),
    pub range: u32,
}

/// Initial facing, restricted to the four cardinal directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacingSpec {
    #[default]
    North,
    South,
    East,
    West,
}

impl From<FacingSpec> for Facing {
    fn from(spec: FacingSpec) -> Self {
        match spec {
            FacingSpec::North => Facing::NORTH,
            FacingSpec::South => Facing::SOUTH,
            FacingSpec::East => Facing::EAST,
            FacingSpec::West => Facing::WEST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub faction: Faction,
    pub position: (i32, i32),
    #[serde(default)]
    pub facing: FacingSpec,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub right_hand: Option<String>,
    #[serde(default)]
    pub left_hand: Option<String>,
    /// Special actions known besides punch and held-item attacks.
    #[serde(default)]
    pub learned: Vec<ActionKind>,
    #[serde(default)]
    pub statuses: Vec<StatusEffect>,
}

/// Loader for encounters from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load and build an encounter from a RON file.
    ///
    /// The board size in the file overrides the one in `config`.
    pub fn load(path: &Path, config: &GameConfig, catalog: &ItemCatalog) -> LoadResult<Encounter> {
        let content = read_file(path)?;
        let spec = Self::parse(&content)?;
        Self::build(&spec, config, catalog)
            .with_context(|| format!("Failed to build encounter {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<EncounterSpec> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))
    }

    /// Builds an unstarted encounter with every unit spawned.
    pub fn build(
        spec: &EncounterSpec,
        config: &GameConfig,
        catalog: &ItemCatalog,
    ) -> LoadResult<Encounter> {
        if spec.width == 0 || spec.height == 0 {
            anyhow::bail!("encounter board must not be empty");
        }
        let config = config.clone().with_grid_size(spec.width, spec.height);
        let mut grid = Grid::open(spec.width, spec.height);

        for &(x, y) in &spec.walls {
            ensure_in_bounds(grid.set_wall(Position::new(x, y)), "wall", x, y)?;
        }
        for &(x, y) in &spec.smoke {
            ensure_in_bounds(
                grid.set_blocks_vision(Position::new(x, y), true),
                "smoke",
                x,
                y,
            )?;
        }
        for &(x, y, cost) in &spec.rough {
            ensure_in_bounds(
                grid.set_movement_cost(Position::new(x, y), cost),
                "rough ground",
                x,
                y,
            )?;
        }

        let mut encounter = Encounter::new(config, grid);
        for light in &spec.lights {
            let (x, y) = light.position;
            let center = Position::new(x, y);
            ensure_in_bounds(encounter.grid().contains(center), "light", x, y)?;
            encounter.add_light(center, light.range);
        }

        for unit in &spec.units {
            let state = Self::unit(unit, encounter.config(), catalog)
                .with_context(|| format!("Invalid unit '{}'", unit.name))?;
            encounter
                .spawn(state)
                .with_context(|| format!("Failed to place unit '{}'", unit.name))?;
        }
        Ok(encounter)
    }

    fn unit(spec: &UnitSpec, config: &GameConfig, catalog: &ItemCatalog) -> LoadResult<UnitState> {
        let (x, y) = spec.position;
        let mut unit = UnitState::new(spec.name.clone(), spec.faction, spec.attributes, config)
            .with_position(Position::new(x, y))
            .with_facing(spec.facing.into());

        let hands = [
            (HandSlot::RightHand, &spec.right_hand),
            (HandSlot::LeftHand, &spec.left_hand),
        ];
        for (slot, name) in hands {
            let Some(name) = name else {
                continue;
            };
            let item = catalog
                .get(name)
                .with_context(|| format!("unknown item '{name}'"))?;
            unit.equipment.equip(slot, item.clone())?;
        }

        for &kind in &spec.learned {
            if !unit.loadout.learn(kind) {
                anyhow::bail!("cannot learn {kind}: already known or too many actions");
            }
        }
        for &effect in &spec.statuses {
            unit = unit.with_status(effect);
        }
        Ok(unit)
    }
}

fn ensure_in_bounds(placed: bool, what: &str, x: i32, y: i32) -> LoadResult<()> {
    if !placed {
        anyhow::bail!("{what} at ({x}, {y}) is outside the board");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{ActionKey, StatusEffectKind};

    fn catalog() -> ItemCatalog {
        ItemCatalog {
            items: vec![
                tactics_core::HandheldItem::new("Cutlass", 9, 15),
                tactics_core::HandheldItem::new("Torch", 3, 10).with_light(2),
            ],
        }
    }

    const DUEL: &str = r#"(
        width: 6,
        height: 4,
        walls: [(2, 1)],
        smoke: [(3, 3)],
        rough: [(1, 0, 3)],
        lights: [(position: (5, 3), range: 1)],
        units: [
            (
                name: "Rook",
                faction: Player,
                position: (0, 0),
                facing: East,
                right_hand: Some("cutlass"),
                left_hand: Some("Torch"),
                learned: [SelfCast(Stealth)],
            ),
            (
                name: "Brute",
                faction: Enemy,
                position: (5, 0),
                statuses: [(kind: Bulwark, rounds_remaining: 2)],
            ),
        ],
    )"#;

    #[test]
    fn builds_board_and_units() {
        let spec = EncounterLoader::parse(DUEL).unwrap();
        let encounter = EncounterLoader::build(&spec, &GameConfig::new(), &catalog()).unwrap();

        let grid = encounter.grid();
        assert_eq!(encounter.config().grid_width, 6);
        assert!(!grid.cell_at(Position::new(2, 1)).unwrap().is_walkable());
        assert!(grid.blocks_vision(Position::new(3, 3)));
        assert!(grid.cell_at(Position::new(3, 3)).unwrap().is_walkable());
        assert_eq!(grid.cell_at(Position::new(1, 0)).unwrap().movement_cost, 3);

        let rook = encounter.roster().iter().find(|u| u.name == "Rook").unwrap();
        assert_eq!(rook.facing, Facing::EAST);
        assert_eq!(
            rook.loadout.selected(),
            ActionKey::held(ActionKind::WeaponAttack, HandSlot::RightHand)
        );
        assert!(rook.light.is_some());
        assert_eq!(
            rook.loadout.learned(),
            &[ActionKind::SelfCast(tactics_core::SelfCastKind::Stealth)]
        );

        let brute = encounter.roster().iter().find(|u| u.name == "Brute").unwrap();
        assert!(brute.statuses.has(StatusEffectKind::Bulwark));
        assert_eq!(grid.occupant(Position::new(5, 0)), Some(brute.id));
    }

    #[test]
    fn unknown_items_are_reported_with_the_unit() {
        let spec = EncounterLoader::parse(
            r#"(width: 3, height: 3, units: [
                (name: "Ghost", faction: Player, position: (0, 0), right_hand: Some("Lance")),
            ])"#,
        )
        .unwrap();
        let error = EncounterLoader::build(&spec, &GameConfig::new(), &catalog()).unwrap_err();
        let chain = format!("{error:#}");
        assert!(chain.contains("Ghost"));
        assert!(chain.contains("Lance"));
    }

    #[test]
    fn overlapping_units_are_rejected() {
        let spec = EncounterLoader::parse(
            r#"(width: 3, height: 3, units: [
                (name: "A", faction: Player, position: (1, 1)),
                (name: "B", faction: Enemy, position: (1, 1)),
            ])"#,
        )
        .unwrap();
        assert!(EncounterLoader::build(&spec, &GameConfig::new(), &catalog()).is_err());
    }

    #[test]
    fn walls_outside_the_board_are_rejected() {
        let spec = EncounterLoader::parse(r#"(width: 3, height: 3, walls: [(3, 0)], units: [])"#)
            .unwrap();
        assert!(EncounterLoader::build(&spec, &GameConfig::new(), &catalog()).is_err());
    }
}
