#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wastelands engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intents, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for adapters and
//! systems to react to deterministically. Systems never mutate the world;
//! they compute over read-only views such as [`BoardView`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the Wastelands.";

/// Location of a single board cell expressed as signed column and row indices.
///
/// Coordinates are signed so that speculative queries outside the board and
/// offset arithmetic near the border stay representable; the world answers
/// out-of-bounds queries with `false` rather than refusing them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the cell reached by applying the provided offset.
    #[must_use]
    pub const fn step(self, offset: CellOffset) -> CellCoord {
        CellCoord::new(self.column + offset.dx(), self.row + offset.dy())
    }

    /// Computes the signed offset leading from this cell to `other`.
    #[must_use]
    pub const fn offset_to(self, other: CellCoord) -> CellOffset {
        CellOffset::new(other.column - self.column, other.row - self.row)
    }
}

/// Signed step vector between two board cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellOffset {
    dx: i32,
    dy: i32,
}

impl CellOffset {
    /// Creates a new offset with explicit components.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component of the offset.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical component of the offset.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Clamps each component independently to `{-1, 0, 1}`.
    #[must_use]
    pub const fn normalized(self) -> CellOffset {
        CellOffset::new(self.dx.signum(), self.dy.signum())
    }

    /// Reports whether both components are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Unique identifier assigned to a cell entity by the world.
///
/// Identifiers are allocated in ascending placement order and stay stable for
/// the lifetime of a level; a destroyed entity's identifier is never reused
/// within that level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of the visual tile bound to a board cell.
///
/// The renderer owns the mapping from identifiers to sprites; the simulation
/// only tracks which identifier each cell currently shows. `Ground` and
/// `Boundary` carry a cosmetic variant index drawn during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileId {
    /// Walkable interior floor with a cosmetic variant index.
    Ground(u8),
    /// Indestructible border wall with a cosmetic variant index.
    Boundary(u8),
    /// Breakable wall at the given damage stage; stage 0 is one hit from
    /// crumbling.
    WallStage(u8),
    /// The level exit.
    Exit,
}

/// Abilities granted by gear pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GearKind {
    /// Boots unlock diagonal and two-cell vault moves.
    Boots,
    /// The helmet; carried across levels like the boots.
    Helmet,
}

/// Fire-and-forget presentation cues emitted by the simulation.
///
/// Audio and animation adapters key their clips off [`CueKind::name`]; the
/// core never waits for playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CueKind {
    /// An attack is being delivered.
    Attack,
    /// The player committed a move.
    Move,
    /// The player was struck.
    Hit,
    /// The player reached the exit.
    Exit,
}

impl CueKind {
    /// Stable cue name used by audio and animation adapters.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Move => "move",
            Self::Hit => "hit",
            Self::Exit => "exit",
        }
    }
}

/// Reasons a level generation request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum GenerateError {
    /// The requested dimensions cannot fit the border plus distinct player
    /// start and exit cells.
    #[error("a {columns}x{rows} board cannot fit the border, start, and exit")]
    BoardTooSmall {
        /// Columns requested by the rejected command.
        columns: i32,
        /// Rows requested by the rejected command.
        rows: i32,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Clears the current board and generates a fresh layout for the
    /// current level.
    GenerateLevel {
        /// Number of cell columns, border included.
        columns: i32,
        /// Number of cell rows, border included.
        rows: i32,
    },
    /// Requests the move and attack options for the player's current cell.
    SelectOwnCell,
    /// Confirms a move onto a cell surfaced by the latest option set.
    ConfirmMove {
        /// Destination cell of the requested move.
        cell: CellCoord,
    },
    /// Confirms an attack against a cell surfaced by the latest option set.
    ConfirmAttack {
        /// Cell whose occupant should be damaged.
        cell: CellCoord,
    },
    /// Ends the turn without moving or attacking.
    EndTurn,
    /// Abandons the current run and starts over from the first level.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a fresh level layout was generated.
    LevelGenerated {
        /// Number of cell columns on the new board.
        columns: i32,
        /// Number of cell rows on the new board.
        rows: i32,
        /// Level the board was generated for.
        level: u32,
    },
    /// Reports that a level generation request was rejected.
    GenerateRejected {
        /// Columns requested by the rejected command.
        columns: i32,
        /// Rows requested by the rejected command.
        rows: i32,
        /// Specific reason the generation failed.
        reason: GenerateError,
    },
    /// Publishes the move and attack options computed for the player.
    MoveOptionsComputed {
        /// The options the player may confirm this turn.
        options: MoveOptions,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after the move committed.
        to: CellCoord,
    },
    /// Announces that a cell's visual tile changed.
    TileChanged {
        /// Cell whose tile changed.
        cell: CellCoord,
        /// New tile, or `None` when the cell was cleared.
        tile: Option<TileId>,
    },
    /// Reports that a cell's occupant absorbed one point of damage.
    CellDamaged {
        /// Cell whose occupant was damaged.
        cell: CellCoord,
        /// Hit points remaining after the blow.
        remaining: u32,
    },
    /// Announces that a breakable wall was reduced to rubble.
    WallCrumbled {
        /// Cell the wall used to occupy.
        cell: CellCoord,
    },
    /// Announces that an enemy was defeated.
    EnemyDefeated {
        /// Identifier of the defeated enemy.
        enemy: EntityId,
        /// Cell the enemy used to occupy.
        cell: CellCoord,
    },
    /// Confirms that a destroyed occupant dropped a pickup onto its cell.
    DropSpawned {
        /// Cell the pickup landed on.
        cell: CellCoord,
    },
    /// Confirms that the player consumed a food pickup.
    FoodEaten {
        /// Cell the food occupied.
        cell: CellCoord,
        /// Hunger restored by the pickup.
        nutrition: f32,
    },
    /// Confirms that the player collected a piece of gear.
    GearCollected {
        /// Cell the gear occupied.
        cell: CellCoord,
        /// Ability granted by the pickup.
        gear: GearKind,
    },
    /// Reports the player's hunger after any change.
    HungerChanged {
        /// Hunger remaining.
        hunger: f32,
        /// Current hunger ceiling.
        max_hunger: f32,
    },
    /// Confirms that an enemy stepped between two cells.
    EnemyMoved {
        /// Identifier of the enemy that stepped.
        enemy: EntityId,
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after the step committed.
        to: CellCoord,
    },
    /// Reports that an enemy struck the player.
    EnemyStruck {
        /// Identifier of the attacking enemy.
        enemy: EntityId,
        /// Cell the enemy attacked from.
        cell: CellCoord,
    },
    /// Announces that the player reached the exit.
    LevelCompleted {
        /// Level that was just completed.
        level: u32,
    },
    /// Announces that the run ended.
    GameOver {
        /// Number of levels the player reached before starving.
        levels_survived: u32,
    },
    /// Confirms that a full turn elapsed.
    TurnEnded {
        /// Turn counter value after the tick.
        turn: u64,
    },
    /// Requests a fire-and-forget presentation cue.
    CueRequested {
        /// Cue the presentation layer should play.
        cue: CueKind,
    },
}

/// Passability, breakability, and occupancy of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellState {
    /// Whether the player and enemies may stand on the cell.
    pub passable: bool,
    /// Whether the cell's occupant can be attacked.
    pub breakable: bool,
    /// Entity bound to the cell, if any.
    pub occupant: Option<EntityId>,
}

impl CellState {
    /// State of an empty walkable interior cell.
    #[must_use]
    pub const fn open() -> Self {
        Self {
            passable: true,
            breakable: false,
            occupant: None,
        }
    }

    /// State of an indestructible border cell.
    #[must_use]
    pub const fn solid() -> Self {
        Self {
            passable: false,
            breakable: false,
            occupant: None,
        }
    }
}

/// Read-only view into the dense board cell array.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    cells: &'a [CellState],
    columns: i32,
    rows: i32,
}

impl<'a> BoardView<'a> {
    /// Captures a new board view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellState], columns: i32, rows: i32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Number of cell columns covered by the view.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Number of cell rows covered by the view.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Reports whether the cell lies inside the board.
    #[must_use]
    pub const fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() >= 0
            && cell.column() < self.columns
            && cell.row() >= 0
            && cell.row() < self.rows
    }

    /// Reports whether the cell may be stood on; out-of-bounds cells are not.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.get(cell).is_some_and(|state| state.passable)
    }

    /// Reports whether the cell's occupant can be attacked; out-of-bounds
    /// cells cannot.
    #[must_use]
    pub fn is_breakable(&self, cell: CellCoord) -> bool {
        self.get(cell).is_some_and(|state| state.breakable)
    }

    /// Returns the entity occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<EntityId> {
        self.get(cell).and_then(|state| state.occupant)
    }

    /// Returns the full state of the provided cell when it is in bounds.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

/// Move and attack options surfaced to the player for one turn.
///
/// A single destination may appear in both lists when its cell is flagged
/// passable and breakable at the same time; the world preserves that state
/// rather than enforcing exclusivity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveOptions {
    moves: Vec<CellCoord>,
    attacks: Vec<CellCoord>,
}

impl MoveOptions {
    /// Creates a new option set from explicit move and attack destinations.
    #[must_use]
    pub fn new(moves: Vec<CellCoord>, attacks: Vec<CellCoord>) -> Self {
        Self { moves, attacks }
    }

    /// Destinations the player may move onto.
    #[must_use]
    pub fn moves(&self) -> &[CellCoord] {
        &self.moves
    }

    /// Destinations the player may attack.
    #[must_use]
    pub fn attacks(&self) -> &[CellCoord] {
        &self.attacks
    }

    /// Reports whether the set surfaces a move onto the provided cell.
    #[must_use]
    pub fn allows_move(&self, cell: CellCoord) -> bool {
        self.moves.contains(&cell)
    }

    /// Reports whether the set surfaces an attack against the provided cell.
    #[must_use]
    pub fn allows_attack(&self, cell: CellCoord) -> bool {
        self.attacks.contains(&cell)
    }

    /// Reports whether the set surfaces no options at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.attacks.is_empty()
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub cell: CellCoord,
    /// Whether the boots ability has been collected this run.
    pub has_boots: bool,
    /// Whether the helmet has been collected this run.
    pub has_helmet: bool,
    /// Whether the run has ended.
    pub game_over: bool,
}

/// Immutable representation of a single live enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EntityId,
    /// Cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Hit points remaining.
    pub hit_points: u32,
}

/// Immutable representation of the run-wide counters used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSnapshot {
    /// Hunger remaining; the run ends when it reaches zero.
    pub hunger: f32,
    /// Current hunger ceiling.
    pub max_hunger: f32,
    /// One-based index of the level in play.
    pub level: u32,
    /// Turns elapsed on the current level.
    pub turn: u64,
}
