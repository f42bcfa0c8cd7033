#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement validation for the player.
//!
//! The validator walks straight-line or exact-diagonal paths one normalized
//! step at a time and surfaces the move and attack options reachable from a
//! cell. It never mutates the world; the authoritative world consults it when
//! computing option sets and re-validating confirmed intents.

use wastelands_core::{BoardView, CellCoord, CellOffset, MoveOptions};

/// The four orthogonal unit steps every player can take.
const ORTHOGONAL_STEPS: [CellOffset; 4] = [
    CellOffset::new(0, 1),
    CellOffset::new(0, -1),
    CellOffset::new(-1, 0),
    CellOffset::new(1, 0),
];

/// Extra steps unlocked by the boots: the four ordinal diagonals and the
/// four two-cell orthogonal vaults.
const BOOT_STEPS: [CellOffset; 8] = [
    CellOffset::new(-1, -1),
    CellOffset::new(-1, 1),
    CellOffset::new(1, -1),
    CellOffset::new(1, 1),
    CellOffset::new(0, 2),
    CellOffset::new(0, -2),
    CellOffset::new(2, 0),
    CellOffset::new(-2, 0),
];

/// Reports whether the straight-line path from `start` to `end` is legal.
///
/// The direction is `end - start` with each axis clamped to `{-1, 0, 1}`;
/// only deltas expressible as whole repeats of that step — straight lines and
/// exact diagonals — are walkable, and anything else is rejected outright.
/// At every impassable cell stepped through, the cell beyond it along the
/// same direction is inspected: when that cell is the destination and is
/// passable but unbreakable there is no way to stand on or break through to
/// it, so the path is blocked. The check inspects a single obstacle only; it
/// is not a path-finder.
#[must_use]
pub fn can_move(board: BoardView<'_>, start: CellCoord, end: CellCoord) -> bool {
    let delta = start.offset_to(end);
    if delta.is_zero() {
        return true;
    }

    let direction = delta.normalized();
    let Some(steps) = whole_steps(delta, direction) else {
        return false;
    };

    let mut current = start;
    for _ in 0..steps {
        current = current.step(direction);
        if !board.is_passable(current) {
            let beyond = current.step(direction);
            if beyond == end && board.is_passable(beyond) && !board.is_breakable(beyond) {
                return false;
            }
        }
    }

    true
}

/// Computes the move and attack options reachable from `position`.
///
/// Base candidates are the orthogonal unit steps; holding the boots adds the
/// diagonals and two-cell vaults. Every candidate destination is filtered by
/// [`can_move`], then surfaces a move option if passable and an attack option
/// if breakable — a cell flagged both ways surfaces both.
#[must_use]
pub fn available_moves(board: BoardView<'_>, position: CellCoord, has_boots: bool) -> MoveOptions {
    let mut moves = Vec::new();
    let mut attacks = Vec::new();

    for offset in candidate_steps(has_boots) {
        let destination = position.step(offset);
        if !can_move(board, position, destination) {
            continue;
        }
        if board.is_passable(destination) {
            moves.push(destination);
        }
        if board.is_breakable(destination) {
            attacks.push(destination);
        }
    }

    MoveOptions::new(moves, attacks)
}

fn candidate_steps(has_boots: bool) -> impl Iterator<Item = CellOffset> {
    let extras: &[CellOffset] = if has_boots { &BOOT_STEPS } else { &[] };
    ORTHOGONAL_STEPS.iter().chain(extras.iter()).copied()
}

/// Number of whole `direction` steps composing `delta`, if any.
fn whole_steps(delta: CellOffset, direction: CellOffset) -> Option<i32> {
    let steps = delta.dx().abs().max(delta.dy().abs());
    if direction.dx() * steps == delta.dx() && direction.dy() * steps == delta.dy() {
        Some(steps)
    } else {
        None
    }
}
