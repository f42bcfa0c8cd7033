//! Cell entities, their placement templates, and the arena that owns them.
//!
//! Entities live in an arena keyed by stable [`EntityId`]; destruction marks
//! a slot dead instead of removing it, so identifiers handed out to events
//! and the turn loop stay valid for the lifetime of a level and a dead enemy
//! can never be dispatched again.

use wastelands_core::{CellCoord, EntityId, GearKind, TileId};

/// Hunger ceiling increase granted by every collected piece of gear.
pub(crate) const GEAR_HEALTH_BONUS: f32 = 10.0;

/// Template for a food pickup placed during generation or dropped by a
/// destroyed occupant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodTemplate {
    /// Hunger restored when the player eats the pickup.
    pub nutrition: f32,
}

/// Template for a breakable wall placed during generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallTemplate {
    /// Hit points a fresh wall starts with.
    pub hit_points: u32,
    /// Food spawned when the crumbling wall's drop roll succeeds.
    pub drop: FoodTemplate,
    /// Probability in `[0, 1)` that the wall drops its food.
    pub drop_chance: f32,
}

/// Template for an enemy placed during generation.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyTemplate {
    /// Hit points a fresh enemy starts with.
    pub hit_points: u32,
    /// Drop table evaluated in declared order on defeat; the first entry
    /// whose roll succeeds wins and the rest are never retried.
    pub drops: Vec<DropEntry>,
}

/// Pickup spawned by a successful drop roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DropKind {
    /// A food pickup.
    Food(FoodTemplate),
    /// A piece of gear granting a player ability.
    Gear(GearKind),
}

/// One entry of an enemy drop table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropEntry {
    /// Pickup produced when the roll succeeds.
    pub item: DropKind,
    /// Probability in `[0, 1)` drawn independently for this entry.
    pub chance: f32,
}

/// Half-open count range `[min, max)` drawn uniformly per generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnCount {
    /// Inclusive lower bound.
    pub min: u32,
    /// Exclusive upper bound; ranges with `max <= min` resolve to `min`.
    pub max: u32,
}

/// Placement tuning consulted by level generation.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementConfig {
    /// How many breakable walls a level receives.
    pub wall_count: SpawnCount,
    /// How many food pickups a level receives.
    pub food_count: SpawnCount,
    /// Ceiling on the per-level enemy count; a level spawns
    /// `min(level, max_enemies)` enemies.
    pub max_enemies: u32,
    /// Wall templates drawn uniformly per placement.
    pub walls: Vec<WallTemplate>,
    /// Food templates drawn uniformly per placement.
    pub foods: Vec<FoodTemplate>,
    /// Enemy templates drawn uniformly per placement.
    pub enemies: Vec<EnemyTemplate>,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            wall_count: SpawnCount { min: 11, max: 25 },
            food_count: SpawnCount { min: 5, max: 14 },
            max_enemies: 10,
            walls: vec![
                WallTemplate {
                    hit_points: 3,
                    drop: FoodTemplate { nutrition: 5.0 },
                    drop_chance: 0.6,
                },
                WallTemplate {
                    hit_points: 3,
                    drop: FoodTemplate { nutrition: 10.0 },
                    drop_chance: 0.25,
                },
            ],
            foods: vec![
                FoodTemplate { nutrition: 5.0 },
                FoodTemplate { nutrition: 10.0 },
            ],
            enemies: vec![
                EnemyTemplate {
                    hit_points: 1,
                    drops: vec![DropEntry {
                        item: DropKind::Food(FoodTemplate { nutrition: 5.0 }),
                        chance: 0.5,
                    }],
                },
                EnemyTemplate {
                    hit_points: 3,
                    drops: vec![
                        DropEntry {
                            item: DropKind::Gear(GearKind::Boots),
                            chance: 0.15,
                        },
                        DropEntry {
                            item: DropKind::Gear(GearKind::Helmet),
                            chance: 0.15,
                        },
                        DropEntry {
                            item: DropKind::Food(FoodTemplate { nutrition: 10.0 }),
                            chance: 0.4,
                        },
                    ],
                },
            ],
        }
    }
}

/// Variant-specific state of a cell entity.
#[derive(Clone, Debug)]
pub(crate) enum EntityKind {
    /// Breakable wall; crumbles at zero hit points and may drop food.
    Wall {
        hit_points: u32,
        stage: u8,
        original_tile: Option<TileId>,
        drop: FoodTemplate,
        drop_chance: f32,
    },
    /// Hostile unit acting once per tick.
    Enemy { hit_points: u32, drops: Vec<DropEntry> },
    /// Consumable pickup restoring hunger.
    Food { nutrition: f32 },
    /// Gear pickup granting an ability and raising the hunger ceiling.
    Gear { kind: GearKind, health_bonus: f32 },
    /// Level exit; entering it completes the level.
    Exit,
}

/// A cell entity bound to one board cell.
#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) cell: CellCoord,
    pub(crate) alive: bool,
    pub(crate) kind: EntityKind,
}

/// Arena owning every entity of the current level.
#[derive(Debug, Default)]
pub(crate) struct EntityArena {
    slots: Vec<Entity>,
}

impl EntityArena {
    /// Drops every entity; called when the board is cleared.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    /// Creates a live entity on the given cell and returns its identifier.
    pub(crate) fn spawn(&mut self, cell: CellCoord, kind: EntityKind) -> EntityId {
        let value = u32::try_from(self.slots.len()).expect("entity arena exceeded u32 capacity");
        let id = EntityId::new(value);
        self.slots.push(Entity {
            id,
            cell,
            alive: true,
            kind,
        });
        id
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.get() as usize)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.get() as usize)
    }

    /// Marks the entity dead; its slot and identifier remain allocated.
    pub(crate) fn kill(&mut self, id: EntityId) {
        if let Some(entity) = self.get_mut(id) {
            entity.alive = false;
        }
    }

    /// Identifiers of all live enemies in ascending spawn order.
    pub(crate) fn live_enemy_ids(&self) -> Vec<EntityId> {
        self.slots
            .iter()
            .filter(|entity| entity.alive && matches!(entity.kind, EntityKind::Enemy { .. }))
            .map(|entity| entity.id)
            .collect()
    }

    /// Iterator over every live entity in ascending spawn order.
    pub(crate) fn iter_live(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().filter(|entity| entity.alive)
    }
}
