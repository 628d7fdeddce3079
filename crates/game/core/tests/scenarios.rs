use std::collections::BTreeSet;

use tactics_core::{
    ActionDescriptor, ActionKey, ActionKind, Attributes, Encounter, Facing, Faction, GameConfig, Grid,
    HandSlot, HandheldItem, Omniscient, Position, Roster, SearchArena, SearchQuery, StatusEffect,
    StatusEffectKind, TurnAdvance, UnitId, UnitState, compute_reachable,
};

fn unit(config: &GameConfig, faction: Faction, x: i32, y: i32) -> UnitState {
    UnitState::new("unit", faction, Attributes::default(), config).with_position(Position::new(x, y))
}

fn budgeted(mut unit: UnitState, points: u32) -> UnitState {
    unit.action_points.maximum = points;
    unit.action_points.current = points;
    unit
}

fn encounter(width: u32, height: u32) -> Encounter {
    let config = GameConfig::new().with_grid_size(width, height);
    Encounter::from_config(config)
}

/// Starts the encounter and grants the first unit in initiative its turn.
fn first_turn(encounter: &mut Encounter) -> UnitId {
    encounter.start().unwrap();
    let TurnAdvance::Next(unit) = encounter.advance_turn() else {
        panic!("expected a unit to act");
    };
    assert!(encounter.begin_turn(unit).unwrap().can_act());
    unit
}

#[test]
fn corner_of_open_board_with_budget_three() {
    let config = GameConfig::new().with_grid_size(5, 5);
    let grid = Grid::open(5, 5);
    let mut arena = SearchArena::new(&grid);
    let mut roster = Roster::new();
    let id = roster
        .insert(budgeted(unit(&config, Faction::Player, 0, 0), 3))
        .unwrap();
    let searcher = roster.get(id).unwrap();
    let action = ActionDescriptor::move_only();

    let reach = compute_reachable(
        &grid,
        &mut arena,
        &roster,
        &Omniscient,
        SearchQuery::for_unit(searcher, Some(&action)),
    );

    let cells: BTreeSet<_> = reach.move_cells().collect();
    let expected: BTreeSet<_> = (0..5)
        .flat_map(|x| (0..5).map(move |y| Position::new(x, y)))
        .filter(|p| (1..=3).contains(&p.manhattan(Position::new(0, 0))))
        .collect();
    assert_eq!(cells, expected);
    assert!(reach.moves.iter().all(|m| m.cost == m.path.len() as u32));
    assert!(reach.attacks.is_empty());
}

#[test]
fn melee_reach_counts_movement_plus_flat_cost() {
    let config = GameConfig::new().with_grid_size(5, 5);
    let grid = Grid::open(5, 5);
    let mut arena = SearchArena::new(&grid);
    let mut roster = Roster::new();
    let hero = roster
        .insert(budgeted(unit(&config, Faction::Player, 0, 0), 12))
        .unwrap();
    roster.insert(unit(&config, Faction::Enemy, 3, 0)).unwrap();
    roster.insert(unit(&config, Faction::Enemy, 0, 4)).unwrap();
    let punch = ActionDescriptor::punch();

    let reach = compute_reachable(
        &grid,
        &mut arena,
        &roster,
        &Omniscient,
        SearchQuery::for_unit(roster.get(hero).unwrap(), Some(&punch)),
    );

    // (3,0): walk 2 + punch 10 = 12. (0,4): walk 3 + punch 10 = 13.
    let target = reach.attack_at(Position::new(3, 0)).unwrap();
    assert_eq!(target.launch, Position::new(2, 0));
    assert_eq!(target.cost, 12);
    assert!(reach.attack_at(Position::new(0, 4)).is_none());
    assert!(reach.move_to(Position::new(3, 0)).is_none());
}

#[test]
fn ground_attack_hits_everyone_in_the_blast_and_spares_the_rest() {
    let mut encounter = encounter(8, 8);
    let config = encounter.config().clone();
    let hero = encounter
        .spawn(unit(&config, Faction::Player, 0, 0).with_facing(Facing::EAST))
        .unwrap();
    let first = encounter.spawn(unit(&config, Faction::Enemy, 4, 0)).unwrap();
    let second = encounter.spawn(unit(&config, Faction::Enemy, 4, 1)).unwrap();
    let friend = encounter.spawn(unit(&config, Faction::Player, 4, 3)).unwrap();

    let grenade = HandheldItem::new("Frag Grenade", 8, 20)
        .with_action(ActionKind::GroundAttack)
        .with_range(1, 4)
        .with_splash(1);
    encounter.equip(hero, HandSlot::RightHand, grenade).unwrap();
    assert!(encounter.select_action(
        hero,
        ActionKey::held(ActionKind::GroundAttack, HandSlot::RightHand)
    ));
    assert_eq!(first_turn(&mut encounter), hero);

    let outcome = encounter.commit_attack(hero, Position::new(4, 0)).unwrap();
    let hit: BTreeSet<_> = outcome.hits.iter().map(|h| h.unit).collect();
    assert_eq!(hit, BTreeSet::from([first, second]));
    assert!(outcome.path.is_empty());
    assert_eq!(outcome.spent, 20);

    let full = Attributes::default().max_health();
    assert_eq!(encounter.unit(first).unwrap().health.current, full - 8);
    assert_eq!(encounter.unit(second).unwrap().health.current, full - 8);
    assert_eq!(encounter.unit(friend).unwrap().health.current, full);
}

#[test]
fn ground_action_keeps_target_tiles_out_of_move_destinations() {
    let mut encounter = encounter(9, 9);
    let config = encounter.config().clone();
    let hero = encounter
        .spawn(budgeted(unit(&config, Faction::Player, 0, 0), 22))
        .unwrap();
    encounter.spawn(unit(&config, Faction::Enemy, 8, 8)).unwrap();
    let grenade = HandheldItem::new("Frag Grenade", 8, 20)
        .with_action(ActionKind::GroundAttack)
        .with_range(1, 4)
        .with_splash(1);
    encounter.equip(hero, HandSlot::RightHand, grenade).unwrap();
    assert!(encounter.select_action(
        hero,
        ActionKey::held(ActionKind::GroundAttack, HandSlot::RightHand)
    ));
    assert_eq!(first_turn(&mut encounter), hero);

    let reach = encounter.compute_reachable_selected(hero);
    let moves: BTreeSet<_> = reach.move_cells().collect();
    let targets: BTreeSet<_> = reach.attack_cells().collect();
    assert!(!moves.is_empty());
    assert!(!targets.is_empty());
    assert!(moves.is_disjoint(&targets));
}

#[test]
fn preview_highlights_exactly_what_the_blast_resolves() {
    let mut encounter = encounter(8, 8);
    let config = encounter.config().clone();
    let hero = encounter
        .spawn(unit(&config, Faction::Player, 0, 0).with_facing(Facing::EAST))
        .unwrap();
    let first = encounter.spawn(unit(&config, Faction::Enemy, 4, 0)).unwrap();
    let second = encounter.spawn(unit(&config, Faction::Enemy, 4, 1)).unwrap();

    let grenade = HandheldItem::new("Frag Grenade", 8, 20)
        .with_action(ActionKind::GroundAttack)
        .with_range(1, 4)
        .with_splash(1);
    encounter.equip(hero, HandSlot::RightHand, grenade).unwrap();
    assert!(encounter.select_action(
        hero,
        ActionKey::held(ActionKind::GroundAttack, HandSlot::RightHand)
    ));
    assert_eq!(first_turn(&mut encounter), hero);

    let preview = encounter.preview_attack(hero, Position::new(4, 0)).unwrap();
    assert_eq!(preview.launch, Position::new(0, 0));
    assert!(preview.launch_path.is_empty());
    assert_eq!(preview.cost, 20);
    assert_eq!(preview.area, encounter.enumerate_area(Position::new(4, 0), 1));
    let affected: BTreeSet<_> = preview.affected.iter().copied().collect();
    assert_eq!(affected, BTreeSet::from([first, second]));

    let outcome = encounter.commit_attack(hero, Position::new(4, 0)).unwrap();
    let hit: BTreeSet<_> = outcome.hits.iter().map(|h| h.unit).collect();
    assert_eq!(hit, affected);
}

#[test]
fn hidden_enemy_is_revealed_by_light() {
    let mut encounter = encounter(6, 6);
    let config = encounter.config().clone();
    let hero = encounter
        .spawn(unit(&config, Faction::Player, 0, 0).with_facing(Facing::EAST))
        .unwrap();
    let lurker = encounter
        .spawn(
            unit(&config, Faction::Enemy, 2, 0)
                .with_status(StatusEffect::new(StatusEffectKind::Hidden, 5)),
        )
        .unwrap();
    first_turn(&mut encounter);

    assert!(encounter.is_tile_visible(Position::new(2, 0)));
    assert!(!encounter.can_see_unit(hero, lurker));
    let reach = encounter.compute_reachable_selected(hero);
    assert!(reach.attack_at(Position::new(2, 0)).is_none());

    encounter.add_light(Position::new(2, 1), 1);
    assert!(encounter.is_tile_illuminated(Position::new(2, 0)));
    assert!(!encounter.unit(lurker).unwrap().is_hidden());
    assert!(encounter.can_see_unit(hero, lurker));
    let reach = encounter.compute_reachable_selected(hero);
    assert!(reach.attack_at(Position::new(2, 0)).is_some());
}

#[test]
fn initiative_is_round_robin_and_skips_the_dead() {
    let mut encounter = encounter(6, 6);
    let config = encounter.config().clone();
    let ids: Vec<_> = [
        unit(&config, Faction::Player, 0, 0),
        unit(&config, Faction::Enemy, 5, 5),
        unit(&config, Faction::Player, 0, 5),
        unit(&config, Faction::Enemy, 5, 0),
    ]
    .into_iter()
    .map(|u| encounter.spawn(u).unwrap())
    .collect();
    encounter.start().unwrap();

    let mut order = Vec::new();
    for turn in 0..6 {
        if turn == 2 {
            encounter
                .apply_status(ids[2], StatusEffect::new(StatusEffectKind::Poisoned, 1).with_power(1_000))
                .unwrap();
        }
        let TurnAdvance::Next(current) = encounter.advance_turn() else {
            panic!("expected a unit to act");
        };
        let start = encounter.begin_turn(current).unwrap();
        order.push((current, start.can_act()));
        if start.can_act() {
            assert!(encounter.end_turn(current));
        }
    }

    assert_eq!(
        order,
        vec![
            (ids[0], true),
            (ids[1], true),
            (ids[2], false),
            (ids[3], true),
            (ids[0], true),
            (ids[1], true),
        ]
    );
    assert!(!encounter.is_game_over());
}

#[test]
fn regeneration_heals_on_three_consecutive_turns() {
    let mut encounter = encounter(4, 4);
    let config = encounter.config().clone();
    let mut patient = unit(&config, Faction::Player, 0, 0)
        .with_status(StatusEffect::new(StatusEffectKind::Regeneration, 3));
    patient.health.current = 10;
    let patient = encounter.spawn(patient).unwrap();
    encounter.spawn(unit(&config, Faction::Enemy, 3, 3)).unwrap();
    encounter.start().unwrap();

    let mut healed = Vec::new();
    for _ in 0..8 {
        let TurnAdvance::Next(current) = encounter.advance_turn() else {
            panic!("expected a unit to act");
        };
        let start = encounter.begin_turn(current).unwrap();
        if current == patient {
            healed.push(start.tick.healed);
        }
        assert!(encounter.end_turn(current));
    }

    assert_eq!(healed, vec![5, 5, 5, 0]);
    assert_eq!(encounter.unit(patient).unwrap().health.current, 25);
    assert!(
        !encounter
            .unit(patient)
            .unwrap()
            .statuses
            .has(StatusEffectKind::Regeneration)
    );
}

#[test]
fn line_of_sight_is_blocked_only_by_cells_in_between() {
    let mut encounter = encounter(5, 5);
    encounter.grid_mut().set_wall(Position::new(2, 0));

    assert!(!encounter.has_line_of_sight(Position::new(0, 0), Position::new(4, 0)));
    assert!(!encounter.has_line_of_sight(Position::new(4, 0), Position::new(0, 0)));
    assert!(encounter.has_line_of_sight(Position::new(1, 0), Position::new(2, 0)));
    assert!(encounter.has_line_of_sight(Position::new(0, 1), Position::new(4, 1)));
}

#[test]
fn area_grows_monotonically_with_radius() {
    let encounter = encounter(7, 7);
    let center = Position::new(3, 3);

    assert_eq!(encounter.enumerate_area(center, 0), vec![center]);
    let mut previous: BTreeSet<Position> = BTreeSet::new();
    for radius in 0..=6 {
        let area: BTreeSet<_> = encounter.enumerate_area(center, radius).into_iter().collect();
        assert!(area.is_superset(&previous));
        previous = area;
    }
    assert_eq!(previous.len(), 7 * 7);
}

#[test]
fn vision_update_is_idempotent() {
    let mut encounter = encounter(8, 8);
    let config = encounter.config().clone();
    encounter
        .spawn(unit(&config, Faction::Player, 1, 1).with_facing(Facing::EAST))
        .unwrap();
    encounter.spawn(unit(&config, Faction::Enemy, 6, 6)).unwrap();
    encounter.grid_mut().set_wall(Position::new(3, 1));
    let first = encounter.start().unwrap();

    let visible = |encounter: &Encounter| -> Vec<bool> {
        encounter
            .grid()
            .cells()
            .map(|cell| encounter.is_tile_visible(cell.position))
            .collect()
    };
    let before = visible(&encounter);
    let second = encounter.update_vision();

    assert_eq!(first, second);
    assert_eq!(before, visible(&encounter));
}
