#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Wastelands.
//!
//! The world owns the board, the entity arena, the player, and the run
//! counters. Adapters mutate it exclusively through [`apply`] and read it
//! back through [`query`]; pure systems supply movement validation and enemy
//! decisions over read-only views. One turn elapses per confirmed move,
//! confirmed attack, or explicit end-turn command.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wastelands_core::{
    CellCoord, Command, CueKind, EntityId, Event, GearKind, GenerateError, MoveOptions,
};
use wastelands_system_enemy_ai::Decision;

mod board;
mod combat;
mod entities;

pub use entities::{
    DropEntry, DropKind, EnemyTemplate, FoodTemplate, PlacementConfig, SpawnCount, WallTemplate,
};

/// Seed used when the embedding adapter does not provide one.
const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;
/// Hunger the player starts and restarts with; also the starting ceiling.
const STARTING_HUNGER: f32 = 100.0;
/// Hunger drained by every elapsed turn.
const TURN_HUNGER_COST: f32 = 5.0;
/// Hunger drained by a single enemy strike.
const ENEMY_STRIKE_COST: f32 = 3.0;
/// Boards narrower or shorter than this cannot fit the border plus distinct
/// start and exit cells.
const MIN_BOARD_EXTENT: i32 = 4;
/// Cell the player spawns on in every generated level.
const PLAYER_START: CellCoord = CellCoord::new(1, 1);

/// Construction parameters for a [`World`].
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Seed feeding the world's random stream; identical seeds and command
    /// sequences replay identically.
    pub seed: u64,
    /// Placement tuning consulted by level generation.
    pub placement: PlacementConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            placement: PlacementConfig::default(),
        }
    }
}

/// The mutable singleton tracked across levels.
#[derive(Debug)]
struct Player {
    cell: CellCoord,
    has_boots: bool,
    has_helmet: bool,
    game_over: bool,
}

impl Player {
    fn new() -> Self {
        Self {
            cell: PLAYER_START,
            has_boots: false,
            has_helmet: false,
            game_over: false,
        }
    }
}

/// Turn counter advanced exactly once per confirmed player action.
#[derive(Debug, Default)]
struct TurnScheduler {
    turn_count: u64,
}

impl TurnScheduler {
    fn reset(&mut self) {
        self.turn_count = 0;
    }

    fn advance(&mut self) -> u64 {
        self.turn_count = self.turn_count.saturating_add(1);
        self.turn_count
    }

    const fn turn(&self) -> u64 {
        self.turn_count
    }
}

/// Run-wide counters: hunger, its ceiling, and the level index.
#[derive(Debug)]
struct RunState {
    hunger: f32,
    max_hunger: f32,
    level: u32,
}

impl RunState {
    fn new() -> Self {
        Self {
            hunger: STARTING_HUNGER,
            max_hunger: STARTING_HUNGER,
            level: 1,
        }
    }
}

/// Represents the authoritative Wastelands world state.
#[derive(Debug)]
pub struct World {
    board: board::Board,
    entities: entities::EntityArena,
    player: Player,
    scheduler: TurnScheduler,
    run: RunState,
    options: Option<MoveOptions>,
    placement: PlacementConfig,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world with default tuning and seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a new world from explicit construction parameters.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            board: board::Board::default(),
            entities: entities::EntityArena::default(),
            player: Player::new(),
            scheduler: TurnScheduler::default(),
            run: RunState::new(),
            options: None,
            placement: config.placement,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    fn generate_level(&mut self, columns: i32, rows: i32, out_events: &mut Vec<Event>) {
        if columns < MIN_BOARD_EXTENT || rows < MIN_BOARD_EXTENT {
            let reason = GenerateError::BoardTooSmall { columns, rows };
            log::warn!("rejected level generation: {reason}");
            out_events.push(Event::GenerateRejected {
                columns,
                rows,
                reason,
            });
            return;
        }

        self.options = None;
        self.board.clear(&mut self.entities);
        board::generate(
            &mut self.board,
            &mut self.entities,
            &mut self.rng,
            columns,
            rows,
            self.run.level,
            &self.placement,
        );
        self.player.cell = PLAYER_START;
        self.scheduler.reset();
        log::info!(
            "generated level {} on a {columns}x{rows} board",
            self.run.level
        );
        out_events.push(Event::LevelGenerated {
            columns,
            rows,
            level: self.run.level,
        });
    }

    fn select_own_cell(&mut self, out_events: &mut Vec<Event>) {
        let options = wastelands_system_movement::available_moves(
            self.board.view(),
            self.player.cell,
            self.player.has_boots,
        );
        self.options = Some(options.clone());
        out_events.push(Event::MoveOptionsComputed { options });
    }

    fn confirm_move(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(options) = self.options.take() else {
            return;
        };
        if !options.allows_move(cell) {
            self.options = Some(options);
            return;
        }

        let from = self.player.cell;
        self.player.cell = cell;
        out_events.push(Event::PlayerMoved { from, to: cell });
        out_events.push(Event::CueRequested {
            cue: CueKind::Move,
        });

        if let Some(id) = self.board.state(cell).occupant {
            if self.enter_occupied_cell(id, cell, out_events) {
                // Reaching the exit ends the turn with the level.
                return;
            }
        }

        self.tick(out_events);
    }

    /// Lets the destination occupant react to the player's arrival. Returns
    /// `true` when the reaction completed the level.
    fn enter_occupied_cell(
        &mut self,
        id: EntityId,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> bool {
        enum Reaction {
            Eat(f32),
            Collect(GearKind, f32),
            Depart,
            Pass,
        }

        let reaction = match self.entities.get(id).map(|entity| &entity.kind) {
            Some(entities::EntityKind::Food { nutrition }) => Reaction::Eat(*nutrition),
            Some(entities::EntityKind::Gear { kind, health_bonus }) => {
                Reaction::Collect(*kind, *health_bonus)
            }
            Some(entities::EntityKind::Exit) => Reaction::Depart,
            _ => Reaction::Pass,
        };

        match reaction {
            Reaction::Eat(nutrition) => {
                self.consume_occupant(id, cell);
                self.run.hunger += nutrition;
                out_events.push(Event::FoodEaten { cell, nutrition });
                out_events.push(self.hunger_event());
                false
            }
            Reaction::Collect(gear, health_bonus) => {
                self.consume_occupant(id, cell);
                match gear {
                    GearKind::Boots => self.player.has_boots = true,
                    GearKind::Helmet => self.player.has_helmet = true,
                }
                self.run.max_hunger += health_bonus;
                out_events.push(Event::GearCollected { cell, gear });
                out_events.push(self.hunger_event());
                false
            }
            Reaction::Depart => {
                out_events.push(Event::CueRequested {
                    cue: CueKind::Exit,
                });
                out_events.push(Event::LevelCompleted {
                    level: self.run.level,
                });
                self.run.level = self.run.level.saturating_add(1);
                true
            }
            Reaction::Pass => false,
        }
    }

    /// Removes a consumed pickup; its cell stays passable and unbreakable.
    fn consume_occupant(&mut self, id: EntityId, cell: CellCoord) {
        self.entities.kill(id);
        self.board.state_mut(cell).occupant = None;
    }

    fn confirm_attack(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(options) = self.options.take() else {
            return;
        };
        if !options.allows_attack(cell) {
            self.options = Some(options);
            return;
        }

        if let Some(id) = self.board.state(cell).occupant {
            let may_enter = match self.entities.get(id).map(|entity| &entity.kind) {
                Some(entities::EntityKind::Wall { .. } | entities::EntityKind::Enemy { .. }) => {
                    self.board.state(cell).passable
                }
                _ => true,
            };
            if !may_enter {
                combat::damage(
                    &mut self.board,
                    &mut self.entities,
                    &mut self.rng,
                    id,
                    cell,
                    out_events,
                );
            }
        }

        self.tick(out_events);
    }

    /// Advances one full turn: hunger decay, then every live enemy in
    /// ascending id order, then the counter.
    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.run.hunger -= TURN_HUNGER_COST;
        out_events.push(self.hunger_event());
        self.check_game_over(out_events);

        for id in self.entities.live_enemy_ids() {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            if !entity.alive {
                continue;
            }
            let enemy_cell = entity.cell;
            debug_assert_eq!(
                self.board.state(enemy_cell).occupant,
                Some(id),
                "enemy cell disagrees with board occupancy"
            );

            let decision = wastelands_system_enemy_ai::decide(
                enemy_cell,
                self.player.cell,
                self.board.view(),
            );
            match decision {
                Decision::Attack => {
                    self.run.hunger -= ENEMY_STRIKE_COST;
                    out_events.push(Event::CueRequested {
                        cue: CueKind::Attack,
                    });
                    out_events.push(Event::EnemyStruck {
                        enemy: id,
                        cell: enemy_cell,
                    });
                    out_events.push(Event::CueRequested { cue: CueKind::Hit });
                    out_events.push(self.hunger_event());
                }
                Decision::Step(target) => {
                    let source = self.board.state_mut(enemy_cell);
                    source.passable = true;
                    source.breakable = false;
                    source.occupant = None;
                    let destination = self.board.state_mut(target);
                    destination.passable = false;
                    destination.breakable = true;
                    destination.occupant = Some(id);
                    if let Some(entity) = self.entities.get_mut(id) {
                        entity.cell = target;
                    }
                    out_events.push(Event::EnemyMoved {
                        enemy: id,
                        from: enemy_cell,
                        to: target,
                    });
                }
                Decision::Hold => {}
            }
        }
        self.check_game_over(out_events);

        let turn = self.scheduler.advance();
        log::debug!("turn {turn} complete");
        out_events.push(Event::TurnEnded { turn });
        // Options computed before the board moved underneath them are stale.
        self.options = None;
    }

    fn check_game_over(&mut self, out_events: &mut Vec<Event>) {
        if !self.player.game_over && self.run.hunger <= 0.0 {
            self.player.game_over = true;
            log::info!("player starved on level {}", self.run.level);
            out_events.push(Event::GameOver {
                levels_survived: self.run.level,
            });
        }
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.run = RunState::new();
        self.player = Player::new();
        self.options = None;
        out_events.push(self.hunger_event());

        let (columns, rows) = (self.board.columns(), self.board.rows());
        if self.board.is_generated() {
            self.generate_level(columns, rows, out_events);
        }
    }

    fn hunger_event(&self) -> Event {
        Event::HungerChanged {
            hunger: self.run.hunger,
            max_hunger: self.run.max_hunger,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// While the game-over flag is set every command except [`Command::Restart`]
/// is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.player.game_over && command != Command::Restart {
        return;
    }

    match command {
        Command::GenerateLevel { columns, rows } => {
            world.generate_level(columns, rows, out_events);
        }
        Command::SelectOwnCell => world.select_own_cell(out_events),
        Command::ConfirmMove { cell } => world.confirm_move(cell, out_events),
        Command::ConfirmAttack { cell } => world.confirm_attack(cell, out_events),
        Command::EndTurn => world.tick(out_events),
        Command::Restart => world.restart(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use wastelands_core::{
        BoardView, CellCoord, EnemySnapshot, EntityId, MoveOptions, PlayerSnapshot, RunSnapshot,
        TileId,
    };

    use super::{entities::EntityKind, World};

    /// Exposes a read-only view of the dense board cell array.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView<'_> {
        world.board.view()
    }

    /// Dimensions of the current board as `(columns, rows)`; `(0, 0)` before
    /// the first generation.
    #[must_use]
    pub fn dimensions(world: &World) -> (i32, i32) {
        (world.board.columns(), world.board.rows())
    }

    /// Reports whether the cell may be stood on.
    ///
    /// Out-of-bounds queries are expected from speculative UI probing; they
    /// warn and return `false` instead of failing.
    #[must_use]
    pub fn is_passable(world: &World, cell: CellCoord) -> bool {
        let view = world.board.view();
        if !view.in_bounds(cell) {
            log::warn!("cell {cell:?} is out of bounds");
            return false;
        }
        view.is_passable(cell)
    }

    /// Reports whether the cell's occupant can be attacked; warns and
    /// returns `false` out of bounds.
    #[must_use]
    pub fn is_breakable(world: &World, cell: CellCoord) -> bool {
        let view = world.board.view();
        if !view.in_bounds(cell) {
            log::warn!("cell {cell:?} is out of bounds");
            return false;
        }
        view.is_breakable(cell)
    }

    /// Tile currently bound to the cell; `None` when cleared or out of
    /// bounds.
    #[must_use]
    pub fn cell_tile(world: &World, cell: CellCoord) -> Option<TileId> {
        world.board.tile(cell)
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell,
            has_boots: world.player.has_boots,
            has_helmet: world.player.has_helmet,
            game_over: world.player.game_over,
        }
    }

    /// Captures the run-wide counters.
    #[must_use]
    pub fn run(world: &World) -> RunSnapshot {
        RunSnapshot {
            hunger: world.run.hunger,
            max_hunger: world.run.max_hunger,
            level: world.run.level,
            turn: world.scheduler.turn(),
        }
    }

    /// Captures every live enemy in ascending id order.
    #[must_use]
    pub fn enemies(world: &World) -> Vec<EnemySnapshot> {
        world
            .entities
            .iter_live()
            .filter_map(|entity| match &entity.kind {
                EntityKind::Enemy { hit_points, .. } => Some(EnemySnapshot {
                    id: entity.id,
                    cell: entity.cell,
                    hit_points: *hit_points,
                }),
                _ => None,
            })
            .collect()
    }

    /// Identifiers and cells of every live entity, in ascending id order.
    ///
    /// Exists for diagnostics and invariant checks; gameplay reads go
    /// through the board view instead.
    #[must_use]
    pub fn entity_cells(world: &World) -> Vec<(EntityId, CellCoord)> {
        world
            .entities
            .iter_live()
            .map(|entity| (entity.id, entity.cell))
            .collect()
    }

    /// The options computed by the most recent select, if still current.
    #[must_use]
    pub fn move_options(world: &World) -> Option<&MoveOptions> {
        world.options.as_ref()
    }

    /// Cells still eligible for random placement.
    #[must_use]
    pub fn spawn_pool(world: &World) -> &[CellCoord] {
        world.board.spawn_pool()
    }
}

/// Deterministic board construction for integration tests.
///
/// Mirrors what generation does cell by cell, but with every placement
/// chosen by the test instead of the random stream.
#[cfg(feature = "board_scaffolding")]
pub mod scaffolding {
    use wastelands_core::{CellCoord, EntityId, GearKind, TileId};

    use super::{
        board::occupy,
        entities::{DropEntry, EntityKind, FoodTemplate, GEAR_HEALTH_BONUS},
        World,
    };

    /// Replaces the current board with an empty bordered layout and puts the
    /// player on the start cell.
    pub fn empty_board(world: &mut World, columns: i32, rows: i32) {
        world.board.clear(&mut world.entities);
        world.board.reset(columns, rows, &mut world.rng);
        world.board.remove_from_pool(super::PLAYER_START);
        world.player.cell = super::PLAYER_START;
        world.scheduler.reset();
        world.options = None;
    }

    /// Places a breakable wall and returns its identifier.
    pub fn place_wall(
        world: &mut World,
        cell: CellCoord,
        hit_points: u32,
        drop_chance: f32,
        nutrition: f32,
    ) -> EntityId {
        let stage = u8::try_from(hit_points.saturating_sub(1)).unwrap_or(u8::MAX);
        let original_tile = world.board.tile(cell);
        let id = world.entities.spawn(
            cell,
            EntityKind::Wall {
                hit_points,
                stage,
                original_tile,
                drop: FoodTemplate { nutrition },
                drop_chance,
            },
        );
        occupy(&mut world.board, cell, id, false, true);
        world.board.set_tile(cell, Some(TileId::WallStage(stage)));
        id
    }

    /// Places an enemy with an explicit drop table and returns its
    /// identifier.
    pub fn place_enemy(
        world: &mut World,
        cell: CellCoord,
        hit_points: u32,
        drops: Vec<DropEntry>,
    ) -> EntityId {
        let id = world
            .entities
            .spawn(cell, EntityKind::Enemy { hit_points, drops });
        occupy(&mut world.board, cell, id, false, true);
        id
    }

    /// Places a food pickup and returns its identifier.
    pub fn place_food(world: &mut World, cell: CellCoord, nutrition: f32) -> EntityId {
        let id = world.entities.spawn(cell, EntityKind::Food { nutrition });
        occupy(&mut world.board, cell, id, true, false);
        id
    }

    /// Places a gear pickup and returns its identifier.
    pub fn place_gear(world: &mut World, cell: CellCoord, gear: GearKind) -> EntityId {
        let id = world.entities.spawn(
            cell,
            EntityKind::Gear {
                kind: gear,
                health_bonus: GEAR_HEALTH_BONUS,
            },
        );
        occupy(&mut world.board, cell, id, true, false);
        id
    }

    /// Places the level exit and returns its identifier.
    pub fn place_exit(world: &mut World, cell: CellCoord) -> EntityId {
        let id = world.entities.spawn(cell, EntityKind::Exit);
        occupy(&mut world.board, cell, id, true, false);
        world.board.set_tile(cell, Some(TileId::Exit));
        id
    }

    /// Teleports the player onto the given cell.
    pub fn set_player_cell(world: &mut World, cell: CellCoord) {
        world.player.cell = cell;
    }

    /// Overrides the player's remaining hunger.
    pub fn set_hunger(world: &mut World, hunger: f32) {
        world.run.hunger = hunger;
    }

    /// Grants or revokes the boots ability.
    pub fn set_boots(world: &mut World, has_boots: bool) {
        world.player.has_boots = has_boots;
    }
}
