//! Dense board storage, the spawn pool, and level generation.
//!
//! The board owns one row-major array of cell states, a parallel tile layer
//! for the renderer, and the pool of interior cells still eligible for
//! random placement. All mutation happens through the world's command
//! handlers; everything else reads through [`BoardView`].

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use wastelands_core::{BoardView, CellCoord, CellState, EntityId, TileId};

use crate::entities::{EntityArena, EntityKind, PlacementConfig, SpawnCount};

/// Cosmetic variant count for interior floor tiles.
const GROUND_VARIANTS: u8 = 4;
/// Cosmetic variant count for border wall tiles.
const BOUNDARY_VARIANTS: u8 = 3;

/// Dense cell array, tile layer, and spawn pool of the current level.
#[derive(Debug, Default)]
pub(crate) struct Board {
    columns: i32,
    rows: i32,
    states: Vec<CellState>,
    tiles: Vec<Option<TileId>>,
    spawn_pool: Vec<CellCoord>,
}

impl Board {
    pub(crate) const fn columns(&self) -> i32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> i32 {
        self.rows
    }

    /// Reports whether a layout has ever been generated.
    pub(crate) fn is_generated(&self) -> bool {
        !self.states.is_empty()
    }

    /// Captures a read-only view over the cell array.
    pub(crate) fn view(&self) -> BoardView<'_> {
        BoardView::new(&self.states, self.columns, self.rows)
    }

    /// Destroys every occupant and resets every tile; a no-op on a board
    /// that was never generated.
    pub(crate) fn clear(&mut self, entities: &mut EntityArena) {
        entities.clear();
        for state in &mut self.states {
            *state = CellState::solid();
        }
        for tile in &mut self.tiles {
            *tile = None;
        }
        self.spawn_pool.clear();
    }

    /// Allocates a fresh bordered layout: solid border cells, open interior
    /// cells, randomized cosmetic tiles, and a spawn pool covering the whole
    /// interior.
    pub(crate) fn reset(&mut self, columns: i32, rows: i32, rng: &mut ChaCha8Rng) {
        self.columns = columns;
        self.rows = rows;
        let capacity = (columns as usize) * (rows as usize);
        self.states = Vec::with_capacity(capacity);
        self.tiles = Vec::with_capacity(capacity);
        self.spawn_pool.clear();

        for row in 0..rows {
            for column in 0..columns {
                let border = column == 0 || row == 0 || column == columns - 1 || row == rows - 1;
                if border {
                    self.states.push(CellState::solid());
                    self.tiles
                        .push(Some(TileId::Boundary(rng.gen_range(0..BOUNDARY_VARIANTS))));
                } else {
                    self.states.push(CellState::open());
                    self.tiles
                        .push(Some(TileId::Ground(rng.gen_range(0..GROUND_VARIANTS))));
                    self.spawn_pool.push(CellCoord::new(column, row));
                }
            }
        }
    }

    /// Full state of the provided cell.
    ///
    /// Out-of-bounds access is a programmer error and fails fast; callers
    /// with speculative coordinates must pre-validate through the view.
    pub(crate) fn state(&self, cell: CellCoord) -> CellState {
        let index = self.index(cell);
        self.states[index]
    }

    /// Mutable state of the provided cell; fails fast out of bounds.
    pub(crate) fn state_mut(&mut self, cell: CellCoord) -> &mut CellState {
        let index = self.index(cell);
        &mut self.states[index]
    }

    /// Tile currently bound to the cell; `None` outside the board.
    pub(crate) fn tile(&self, cell: CellCoord) -> Option<TileId> {
        self.checked_index(cell)
            .and_then(|index| self.tiles.get(index))
            .copied()
            .flatten()
    }

    /// Rebinds the cell's tile; fails fast out of bounds.
    pub(crate) fn set_tile(&mut self, cell: CellCoord, tile: Option<TileId>) {
        let index = self.index(cell);
        self.tiles[index] = tile;
    }

    /// Cells still eligible for random placement.
    pub(crate) fn spawn_pool(&self) -> &[CellCoord] {
        &self.spawn_pool
    }

    /// Removes a specific cell from the spawn pool, if present.
    pub(crate) fn remove_from_pool(&mut self, cell: CellCoord) {
        if let Some(index) = self.spawn_pool.iter().position(|pooled| *pooled == cell) {
            let _ = self.spawn_pool.swap_remove(index);
        }
    }

    /// Draws a uniformly random cell out of the pool, without replacement.
    fn draw_pool_cell(&mut self, rng: &mut ChaCha8Rng) -> Option<CellCoord> {
        if self.spawn_pool.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.spawn_pool.len());
        Some(self.spawn_pool.swap_remove(index))
    }

    fn checked_index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < 0 || cell.column() >= self.columns || cell.row() < 0 || cell.row() >= self.rows
        {
            return None;
        }
        Some((cell.row() as usize) * (self.columns as usize) + (cell.column() as usize))
    }

    fn index(&self, cell: CellCoord) -> usize {
        self.checked_index(cell)
            .unwrap_or_else(|| panic!("cell {cell:?} is outside the {}x{} board", self.columns, self.rows))
    }
}

/// Generates a complete level layout onto a cleared board.
///
/// Placement order is fixed: exit, reserved player start, walls, food,
/// enemies. Each placement consumes a random pool cell and a random template
/// from its candidate list; placement stops quietly if the pool runs dry.
pub(crate) fn generate(
    board: &mut Board,
    entities: &mut EntityArena,
    rng: &mut ChaCha8Rng,
    columns: i32,
    rows: i32,
    level: u32,
    config: &PlacementConfig,
) {
    board.reset(columns, rows, rng);

    place_exit(board, entities, CellCoord::new(columns - 2, rows - 2));
    board.remove_from_pool(CellCoord::new(1, 1));

    let wall_count = draw_count(rng, config.wall_count);
    for _ in 0..wall_count {
        let Some(cell) = board.draw_pool_cell(rng) else {
            break;
        };
        let Some(template) = choose(rng, &config.walls) else {
            break;
        };
        let stage = u8::try_from(template.hit_points.saturating_sub(1)).unwrap_or(u8::MAX);
        let original_tile = board.tile(cell);
        let id = entities.spawn(
            cell,
            EntityKind::Wall {
                hit_points: template.hit_points,
                stage,
                original_tile,
                drop: template.drop,
                drop_chance: template.drop_chance,
            },
        );
        occupy(board, cell, id, false, true);
        board.set_tile(cell, Some(TileId::WallStage(stage)));
    }

    let food_count = draw_count(rng, config.food_count);
    for _ in 0..food_count {
        let Some(cell) = board.draw_pool_cell(rng) else {
            break;
        };
        let Some(template) = choose(rng, &config.foods) else {
            break;
        };
        let id = entities.spawn(
            cell,
            EntityKind::Food {
                nutrition: template.nutrition,
            },
        );
        occupy(board, cell, id, true, false);
    }

    let enemy_count = level.min(config.max_enemies);
    for _ in 0..enemy_count {
        let Some(cell) = board.draw_pool_cell(rng) else {
            break;
        };
        let Some(template) = choose(rng, &config.enemies) else {
            break;
        };
        let id = entities.spawn(
            cell,
            EntityKind::Enemy {
                hit_points: template.hit_points,
                drops: template.drops.clone(),
            },
        );
        occupy(board, cell, id, false, true);
    }
}

fn place_exit(board: &mut Board, entities: &mut EntityArena, cell: CellCoord) {
    board.remove_from_pool(cell);
    let id = entities.spawn(cell, EntityKind::Exit);
    occupy(board, cell, id, true, false);
    board.set_tile(cell, Some(TileId::Exit));
}

pub(crate) fn occupy(
    board: &mut Board,
    cell: CellCoord,
    id: EntityId,
    passable: bool,
    breakable: bool,
) {
    board.remove_from_pool(cell);
    let state = board.state_mut(cell);
    state.passable = passable;
    state.breakable = breakable;
    state.occupant = Some(id);
}

fn draw_count(rng: &mut ChaCha8Rng, count: SpawnCount) -> u32 {
    if count.max > count.min {
        rng.gen_range(count.min..count.max)
    } else {
        count.min
    }
}

fn choose<'list, T>(rng: &mut ChaCha8Rng, list: &'list [T]) -> Option<&'list T> {
    if list.is_empty() {
        return None;
    }
    Some(&list[rng.gen_range(0..list.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fresh_board(columns: i32, rows: i32, rng: &mut ChaCha8Rng) -> Board {
        let mut board = Board::default();
        board.reset(columns, rows, rng);
        board
    }

    #[test]
    fn reset_pools_exactly_the_interior() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let board = fresh_board(10, 8, &mut rng);
        assert_eq!(board.spawn_pool().len(), 8 * 6);
        assert!(board
            .spawn_pool()
            .iter()
            .all(|cell| cell.column() > 0
                && cell.column() < 9
                && cell.row() > 0
                && cell.row() < 7));
    }

    #[test]
    fn border_cells_are_solid_and_tiled() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let board = fresh_board(6, 5, &mut rng);
        for column in 0..6 {
            let cell = CellCoord::new(column, 0);
            assert!(!board.view().is_passable(cell));
            assert!(matches!(board.tile(cell), Some(TileId::Boundary(_))));
        }
    }

    #[test]
    fn draw_pool_cell_never_repeats() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut board = fresh_board(6, 6, &mut rng);
        let mut drawn = Vec::new();
        while let Some(cell) = board.draw_pool_cell(&mut rng) {
            assert!(!drawn.contains(&cell), "cell {cell:?} drawn twice");
            drawn.push(cell);
        }
        assert_eq!(drawn.len(), 4 * 4);
    }

    #[test]
    fn clear_is_safe_on_a_board_that_was_never_generated() {
        let mut board = Board::default();
        let mut entities = EntityArena::default();
        board.clear(&mut entities);
        assert!(!board.is_generated());
        assert!(board.spawn_pool().is_empty());
    }

    #[test]
    fn tile_queries_outside_the_board_return_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let board = fresh_board(6, 6, &mut rng);
        assert_eq!(board.tile(CellCoord::new(-1, 0)), None);
        assert_eq!(board.tile(CellCoord::new(6, 2)), None);
    }
}
