use wastelands_core::{CellCoord, Command, CueKind, Event, GearKind, TileId};
use wastelands_world::{
    self as world, query, scaffolding, DropEntry, DropKind, FoodTemplate, World, WorldConfig,
};

fn scaffold_world(seed: u64) -> World {
    let mut instance = World::with_config(WorldConfig {
        seed,
        ..WorldConfig::default()
    });
    scaffolding::empty_board(&mut instance, 10, 8);
    instance
}

fn attack(world: &mut World, cell: CellCoord) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::SelectOwnCell, &mut events);
    events.clear();
    world::apply(world, Command::ConfirmAttack { cell }, &mut events);
    events
}

#[test]
fn a_fresh_wall_needs_exactly_three_blows() {
    let mut world = scaffold_world(1);
    scaffolding::set_player_cell(&mut world, CellCoord::new(2, 1));
    let wall = CellCoord::new(3, 1);
    let _ = scaffolding::place_wall(&mut world, wall, 3, 0.0, 5.0);
    assert!(query::board_view(&world).is_passable(CellCoord::new(4, 1)));

    let events = attack(&mut world, wall);
    assert!(events.contains(&Event::CueRequested {
        cue: CueKind::Attack,
    }));
    assert!(events.contains(&Event::CellDamaged {
        cell: wall,
        remaining: 2,
    }));
    assert!(query::board_view(&world).is_breakable(wall));

    let events = attack(&mut world, wall);
    assert!(events.contains(&Event::CellDamaged {
        cell: wall,
        remaining: 1,
    }));
    assert!(query::board_view(&world).is_breakable(wall));

    let events = attack(&mut world, wall);
    assert!(events.contains(&Event::CellDamaged {
        cell: wall,
        remaining: 0,
    }));
    assert!(events.contains(&Event::WallCrumbled { cell: wall }));

    let view = query::board_view(&world);
    assert!(view.is_passable(wall));
    assert!(!view.is_breakable(wall));
    assert_eq!(view.occupant(wall), None);
}

#[test]
fn wall_stages_regress_with_every_non_lethal_hit() {
    let mut world = scaffold_world(2);
    scaffolding::set_player_cell(&mut world, CellCoord::new(2, 1));
    let wall = CellCoord::new(3, 1);
    let _ = scaffolding::place_wall(&mut world, wall, 3, 0.0, 5.0);
    assert_eq!(query::cell_tile(&world, wall), Some(TileId::WallStage(2)));

    let events = attack(&mut world, wall);
    assert!(events.contains(&Event::TileChanged {
        cell: wall,
        tile: Some(TileId::WallStage(1)),
    }));
    assert_eq!(query::cell_tile(&world, wall), Some(TileId::WallStage(1)));

    let events = attack(&mut world, wall);
    assert!(events.contains(&Event::TileChanged {
        cell: wall,
        tile: Some(TileId::WallStage(0)),
    }));

    let events = attack(&mut world, wall);
    // The third blow restores the ground tile the wall was built over.
    assert!(matches!(
        query::cell_tile(&world, wall),
        Some(TileId::Ground(_))
    ));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TileChanged { tile: Some(TileId::Ground(_)), .. })));
}

#[test]
fn certain_wall_drops_always_materialize() {
    let mut world = scaffold_world(3);
    scaffolding::set_player_cell(&mut world, CellCoord::new(2, 1));
    let wall = CellCoord::new(3, 1);
    let _ = scaffolding::place_wall(&mut world, wall, 1, 1.0, 7.0);

    let events = attack(&mut world, wall);
    assert!(events.contains(&Event::DropSpawned { cell: wall }));

    let view = query::board_view(&world);
    assert!(view.is_passable(wall));
    assert!(!view.is_breakable(wall));
    assert!(view.occupant(wall).is_some(), "the drop occupies the cell");
}

#[test]
fn impossible_wall_drops_never_materialize() {
    let mut world = scaffold_world(4);
    scaffolding::set_player_cell(&mut world, CellCoord::new(2, 1));
    let wall = CellCoord::new(3, 1);
    let _ = scaffolding::place_wall(&mut world, wall, 1, 0.0, 7.0);

    let events = attack(&mut world, wall);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::DropSpawned { .. })));
    assert_eq!(query::board_view(&world).occupant(wall), None);
}

#[test]
fn wounded_enemies_survive_with_fewer_hit_points() {
    let mut world = scaffold_world(5);
    let cell = CellCoord::new(2, 1);
    let enemy = scaffolding::place_enemy(&mut world, cell, 3, Vec::new());

    let events = attack(&mut world, cell);
    assert!(events.contains(&Event::CellDamaged { cell, remaining: 2 }));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::EnemyDefeated { .. })));

    let snapshots = query::enemies(&world);
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].id, enemy);
    assert_eq!(snapshots[0].hit_points, 2);
}

#[test]
fn certain_drop_table_heads_always_win() {
    let mut world = scaffold_world(6);
    let cell = CellCoord::new(2, 1);
    let enemy = scaffolding::place_enemy(
        &mut world,
        cell,
        1,
        vec![DropEntry {
            item: DropKind::Gear(GearKind::Boots),
            chance: 1.0,
        }],
    );

    let events = attack(&mut world, cell);
    assert!(events.contains(&Event::EnemyDefeated { enemy, cell }));
    assert!(events.contains(&Event::DropSpawned { cell }));

    // Collect the drop to observe which entry materialized.
    let mut events = Vec::new();
    world::apply(&mut world, Command::SelectOwnCell, &mut events);
    events.clear();
    world::apply(&mut world, Command::ConfirmMove { cell }, &mut events);
    assert!(events.contains(&Event::GearCollected {
        cell,
        gear: GearKind::Boots,
    }));
}

#[test]
fn failed_head_entries_fall_through_in_declared_order() {
    let mut world = scaffold_world(7);
    let cell = CellCoord::new(2, 1);
    let _ = scaffolding::place_enemy(
        &mut world,
        cell,
        1,
        vec![
            DropEntry {
                item: DropKind::Gear(GearKind::Boots),
                chance: 0.0,
            },
            DropEntry {
                item: DropKind::Gear(GearKind::Helmet),
                chance: 1.0,
            },
        ],
    );

    let events = attack(&mut world, cell);
    assert!(events.contains(&Event::DropSpawned { cell }));

    let mut events = Vec::new();
    world::apply(&mut world, Command::SelectOwnCell, &mut events);
    events.clear();
    world::apply(&mut world, Command::ConfirmMove { cell }, &mut events);
    assert!(events.contains(&Event::GearCollected {
        cell,
        gear: GearKind::Helmet,
    }));
    let player = query::player(&world);
    assert!(player.has_helmet);
    assert!(!player.has_boots);
}

#[test]
fn at_most_one_drop_table_entry_materializes() {
    let mut world = scaffold_world(8);
    let cell = CellCoord::new(2, 1);
    let _ = scaffolding::place_enemy(
        &mut world,
        cell,
        1,
        vec![
            DropEntry {
                item: DropKind::Food(FoodTemplate { nutrition: 5.0 }),
                chance: 1.0,
            },
            DropEntry {
                item: DropKind::Food(FoodTemplate { nutrition: 10.0 }),
                chance: 1.0,
            },
        ],
    );

    let events = attack(&mut world, cell);
    let drops = events
        .iter()
        .filter(|event| matches!(event, Event::DropSpawned { .. }))
        .count();
    assert_eq!(drops, 1);
}

#[test]
fn attacks_outside_the_option_set_are_silently_ignored() {
    let mut world = scaffold_world(9);
    let far_wall = CellCoord::new(6, 5);
    let _ = scaffolding::place_wall(&mut world, far_wall, 3, 0.0, 5.0);

    let mut events = Vec::new();
    world::apply(&mut world, Command::SelectOwnCell, &mut events);
    events.clear();
    world::apply(
        &mut world,
        Command::ConfirmAttack { cell: far_wall },
        &mut events,
    );

    assert!(events.is_empty());
    assert!(query::board_view(&world).is_breakable(far_wall));
    assert_eq!(query::run(&world).turn, 0);
}

#[test]
fn defeated_enemies_stop_acting_on_later_turns() {
    let mut world = scaffold_world(10);
    let cell = CellCoord::new(2, 1);
    let _ = scaffolding::place_enemy(&mut world, cell, 1, Vec::new());

    let events = attack(&mut world, cell);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyDefeated { .. })));
    // The kill happens before the tick, so the dead enemy must not strike.
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::EnemyStruck { .. })));

    let mut events = Vec::new();
    world::apply(&mut world, Command::EndTurn, &mut events);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::EnemyStruck { .. } | Event::EnemyMoved { .. })));
    assert!(query::enemies(&world).is_empty());
}
