#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure per-enemy turn decision.
//!
//! Each live enemy consults this procedure once per tick. The decision is a
//! value; the authoritative world commits the resulting strike or step so
//! that occupancy changes stay atomic and ordered.

use wastelands_core::{BoardView, CellCoord, CellOffset};

/// Outcome of one enemy's turn deliberation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// The enemy is orthogonally adjacent to the player and strikes.
    Attack,
    /// The enemy steps onto the given cell.
    Step(CellCoord),
    /// No strike is possible and both candidate steps are blocked.
    Hold,
}

/// Decides what the enemy standing on `enemy` does about the player.
///
/// Orthogonal adjacency always resolves to an attack. Otherwise the enemy
/// greedily steps one cell toward the player along the axis with the larger
/// absolute distance, falling back to the other axis when the preferred step
/// is impassable or occupied; equal distances prefer the vertical axis. A
/// step is only taken onto a passable, unoccupied cell.
#[must_use]
pub fn decide(enemy: CellCoord, player: CellCoord, board: BoardView<'_>) -> Decision {
    let delta = enemy.offset_to(player);
    let (dx, dy) = (delta.dx(), delta.dy());

    if (dx == 0 && dy.abs() == 1) || (dy == 0 && dx.abs() == 1) {
        return Decision::Attack;
    }

    let horizontal = CellOffset::new(dx.signum(), 0);
    let vertical = CellOffset::new(0, dy.signum());
    let (primary, secondary) = if dx.abs() > dy.abs() {
        (horizontal, vertical)
    } else {
        (vertical, horizontal)
    };

    for step in [primary, secondary] {
        if step.is_zero() {
            continue;
        }
        let target = enemy.step(step);
        if board.is_passable(target) && board.occupant(target).is_none() {
            return Decision::Step(target);
        }
    }

    Decision::Hold
}
