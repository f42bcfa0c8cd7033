use wastelands_core::{BoardView, CellCoord, CellState, EntityId};
use wastelands_system_movement::{available_moves, can_move};

/// Builds a bordered board and applies the provided cell overrides.
fn board_with(columns: i32, rows: i32, overrides: &[(CellCoord, CellState)]) -> Vec<CellState> {
    let mut cells = vec![CellState::open(); (columns * rows) as usize];
    for row in 0..rows {
        for column in 0..columns {
            if column == 0 || row == 0 || column == columns - 1 || row == rows - 1 {
                cells[(row * columns + column) as usize] = CellState::solid();
            }
        }
    }
    for (cell, state) in overrides {
        cells[(cell.row() * columns + cell.column()) as usize] = *state;
    }
    cells
}

fn wall() -> CellState {
    CellState {
        passable: false,
        breakable: true,
        occupant: Some(EntityId::new(1)),
    }
}

#[test]
fn every_unobstructed_line_round_trips() {
    let cells = board_with(12, 12, &[]);
    let view = BoardView::new(&cells, 12, 12);
    let start = CellCoord::new(5, 5);

    for destination in [
        CellCoord::new(5, 9),
        CellCoord::new(5, 1),
        CellCoord::new(9, 5),
        CellCoord::new(1, 5),
        CellCoord::new(8, 8),
        CellCoord::new(2, 8),
        CellCoord::new(8, 2),
        CellCoord::new(2, 2),
    ] {
        assert!(
            can_move(view, start, destination),
            "open path to {destination:?} rejected"
        );
        assert!(
            can_move(view, destination, start),
            "open path from {destination:?} rejected"
        );
    }
}

#[test]
fn one_sealed_cell_before_the_destination_blocks_the_line() {
    for (obstacle, destination) in [
        (CellCoord::new(5, 7), CellCoord::new(5, 8)),
        (CellCoord::new(7, 5), CellCoord::new(8, 5)),
        (CellCoord::new(7, 7), CellCoord::new(8, 8)),
    ] {
        let cells = board_with(12, 12, &[(obstacle, CellState::solid())]);
        let view = BoardView::new(&cells, 12, 12);
        assert!(
            !can_move(view, CellCoord::new(5, 5), destination),
            "sealed {obstacle:?} failed to block {destination:?}"
        );
    }
}

#[test]
fn obstacles_midway_along_a_longer_line_do_not_block() {
    // The check is deliberately narrow: only the cell immediately before the
    // destination is inspected against it.
    let cells = board_with(12, 12, &[(CellCoord::new(5, 7), CellState::solid())]);
    let view = BoardView::new(&cells, 12, 12);
    assert!(can_move(view, CellCoord::new(5, 5), CellCoord::new(5, 10)));
}

#[test]
fn vaulting_over_a_wall_onto_open_ground_is_rejected() {
    let cells = board_with(12, 12, &[(CellCoord::new(6, 5), wall())]);
    let view = BoardView::new(&cells, 12, 12);
    assert!(!can_move(view, CellCoord::new(5, 5), CellCoord::new(7, 5)));
}

#[test]
fn option_sets_grow_with_the_boots() {
    let cells = board_with(12, 12, &[]);
    let view = BoardView::new(&cells, 12, 12);
    let position = CellCoord::new(5, 5);

    let on_foot = available_moves(view, position, false);
    let with_boots = available_moves(view, position, true);

    assert_eq!(on_foot.moves().len(), 4);
    assert_eq!(with_boots.moves().len(), 12);
    for cell in on_foot.moves() {
        assert!(
            with_boots.allows_move(*cell),
            "boots lost the base move onto {cell:?}"
        );
    }
}

#[test]
fn walls_surface_attacks_while_open_cells_surface_moves() {
    let cells = board_with(
        12,
        12,
        &[
            (CellCoord::new(6, 5), wall()),
            (CellCoord::new(5, 6), wall()),
        ],
    );
    let view = BoardView::new(&cells, 12, 12);
    let options = available_moves(view, CellCoord::new(5, 5), false);

    assert_eq!(options.moves().len(), 2);
    assert_eq!(options.attacks().len(), 2);
    assert!(options.allows_attack(CellCoord::new(6, 5)));
    assert!(options.allows_attack(CellCoord::new(5, 6)));
    assert!(options.allows_move(CellCoord::new(4, 5)));
    assert!(options.allows_move(CellCoord::new(5, 4)));
}
