//! Combat resolution: damage dispatch, destruction, and loot rolls.
//!
//! Damage always lands on a cell's occupant and is worth one hit point. The
//! attack cue precedes the state change so presentation adapters can face
//! and animate the attacker before the board updates underneath them.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use wastelands_core::{CellCoord, CueKind, EntityId, Event, TileId};

use crate::board::{occupy, Board};
use crate::entities::{DropEntry, DropKind, EntityArena, EntityKind, FoodTemplate, GEAR_HEALTH_BONUS};

/// Outcome of decrementing an occupant's hit points, captured before any
/// board mutation so the arena borrow can end first.
enum Resolution {
    WallHit {
        remaining: u32,
        stage: u8,
    },
    WallDown {
        original_tile: Option<TileId>,
        drop: FoodTemplate,
        drop_chance: f32,
    },
    EnemyHit {
        remaining: u32,
    },
    EnemyDown {
        drops: Vec<DropEntry>,
    },
    Shrugged,
}

/// Applies one point of damage to the occupant of `cell`.
pub(crate) fn damage(
    board: &mut Board,
    entities: &mut EntityArena,
    rng: &mut ChaCha8Rng,
    id: EntityId,
    cell: CellCoord,
    out_events: &mut Vec<Event>,
) {
    let Some(entity) = entities.get_mut(id) else {
        return;
    };
    if !entity.alive {
        return;
    }

    out_events.push(Event::CueRequested {
        cue: CueKind::Attack,
    });

    let resolution = match &mut entity.kind {
        EntityKind::Wall {
            hit_points,
            stage,
            original_tile,
            drop,
            drop_chance,
        } => {
            *hit_points = hit_points.saturating_sub(1);
            if *hit_points == 0 {
                Resolution::WallDown {
                    original_tile: *original_tile,
                    drop: *drop,
                    drop_chance: *drop_chance,
                }
            } else {
                *stage = stage.saturating_sub(1);
                Resolution::WallHit {
                    remaining: *hit_points,
                    stage: *stage,
                }
            }
        }
        EntityKind::Enemy { hit_points, drops } => {
            *hit_points = hit_points.saturating_sub(1);
            if *hit_points == 0 {
                Resolution::EnemyDown {
                    drops: drops.clone(),
                }
            } else {
                Resolution::EnemyHit {
                    remaining: *hit_points,
                }
            }
        }
        EntityKind::Food { .. } | EntityKind::Gear { .. } | EntityKind::Exit => {
            Resolution::Shrugged
        }
    };

    match resolution {
        Resolution::WallHit { remaining, stage } => {
            out_events.push(Event::CellDamaged { cell, remaining });
            board.set_tile(cell, Some(TileId::WallStage(stage)));
            out_events.push(Event::TileChanged {
                cell,
                tile: Some(TileId::WallStage(stage)),
            });
        }
        Resolution::WallDown {
            original_tile,
            drop,
            drop_chance,
        } => {
            out_events.push(Event::CellDamaged { cell, remaining: 0 });
            board.set_tile(cell, original_tile);
            out_events.push(Event::TileChanged {
                cell,
                tile: original_tile,
            });
            destroy_occupant(board, entities, id, cell);
            out_events.push(Event::WallCrumbled { cell });
            if rng.gen::<f32>() < drop_chance {
                spawn_drop(board, entities, cell, DropKind::Food(drop), out_events);
            }
        }
        Resolution::EnemyHit { remaining } => {
            out_events.push(Event::CellDamaged { cell, remaining });
        }
        Resolution::EnemyDown { drops } => {
            out_events.push(Event::CellDamaged { cell, remaining: 0 });
            destroy_occupant(board, entities, id, cell);
            out_events.push(Event::EnemyDefeated { enemy: id, cell });
            for entry in drops {
                if rng.gen::<f32>() < entry.chance {
                    spawn_drop(board, entities, cell, entry.item, out_events);
                    break;
                }
            }
        }
        Resolution::Shrugged => {}
    }
}

/// Kills the occupant and returns its cell to open ground.
fn destroy_occupant(board: &mut Board, entities: &mut EntityArena, id: EntityId, cell: CellCoord) {
    entities.kill(id);
    let state = board.state_mut(cell);
    state.passable = true;
    state.breakable = false;
    state.occupant = None;
}

/// Places a rolled pickup onto the cell its source vacated.
fn spawn_drop(
    board: &mut Board,
    entities: &mut EntityArena,
    cell: CellCoord,
    item: DropKind,
    out_events: &mut Vec<Event>,
) {
    let kind = match item {
        DropKind::Food(template) => EntityKind::Food {
            nutrition: template.nutrition,
        },
        DropKind::Gear(gear) => EntityKind::Gear {
            kind: gear,
            health_bonus: GEAR_HEALTH_BONUS,
        },
    };
    let id = entities.spawn(cell, kind);
    occupy(board, cell, id, true, false);
    out_events.push(Event::DropSpawned { cell });
}
