use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::{
    Rng, SeedableRng,
    rngs::SmallRng,
    seq::{IndexedRandom, SliceRandom},
};
use sweeper_core::{
    Cell, CellCount, CellView, Coord, Game, MoveOutcome, Position, ReferenceGrid, Status, generate,
    mult,
};

fn random_game(seed: u64, rows: Coord, cols: Coord, density: f64) -> Game {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mines = (f64::from(mult(rows, cols)) * density) as CellCount;
    Game::new(generate(rows, cols, mines, &mut rng).unwrap())
}

fn all_positions(size: Position) -> impl Iterator<Item = Position> {
    (0..size.0).flat_map(move |row| (0..size.1).map(move |col| (row, col)))
}

fn neighbors(pos: Position, size: Position) -> Vec<Position> {
    let mut result = Vec::new();
    for d_row in -1i32..=1 {
        for d_col in -1i32..=1 {
            if (d_row, d_col) == (0, 0) {
                continue;
            }
            let row = i32::from(pos.0) + d_row;
            let col = i32::from(pos.1) + d_col;
            if row >= 0 && col >= 0 && row < i32::from(size.0) && col < i32::from(size.1) {
                result.push((row as Coord, col as Coord));
            }
        }
    }
    result
}

/// Zero region connected to `start` plus its bordering cells, computed without the engine.
fn expected_cascade(reference: &ReferenceGrid, start: Position) -> BTreeSet<Position> {
    let size = reference.size();
    let mut zeros = BTreeSet::from([start]);
    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        for next in neighbors(pos, size) {
            if reference[next] == Cell::Count(0) && zeros.insert(next) {
                stack.push(next);
            }
        }
    }

    let mut revealed = zeros.clone();
    for &pos in &zeros {
        revealed.extend(neighbors(pos, size));
    }
    revealed
}

fn revealed_positions(game: &Game) -> BTreeSet<Position> {
    game.player()
        .iter()
        .filter(|(_, cell)| matches!(cell, CellView::Revealed(_)))
        .map(|(pos, _)| pos)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn generated_board_has_requested_mines_and_true_counts(
        seed in any::<u64>(),
        rows in 1u16..20,
        cols in 1u16..20,
        density in 0.0f64..=1.0,
    ) {
        let game = random_game(seed, rows, cols, density);
        let reference = game.reference();
        let expected_mines = (f64::from(mult(rows, cols)) * density) as CellCount;

        prop_assert_eq!(reference.mine_count(), expected_mines);
        prop_assert_eq!(reference.mine_positions().len() as CellCount, expected_mines);

        for pos in all_positions(reference.size()) {
            let actual = neighbors(pos, reference.size())
                .into_iter()
                .filter(|&next| reference[next] == Cell::Mine)
                .count() as u8;
            match reference[pos] {
                Cell::Mine => {}
                Cell::Count(count) => {
                    prop_assert!(count <= 8);
                    prop_assert_eq!(count, actual, "count at {:?}", pos);
                }
            }
        }
    }

    #[test]
    fn cascade_reveals_zero_region_and_its_border(
        seed in any::<u64>(),
        rows in 1u16..24,
        cols in 1u16..24,
        density in 0.0f64..0.3,
    ) {
        let mut game = random_game(seed, rows, cols, density);
        let zeros: Vec<Position> = all_positions(game.size())
            .filter(|&pos| game.reference()[pos] == Cell::Count(0))
            .collect();
        prop_assume!(!zeros.is_empty());

        let mut rng = SmallRng::seed_from_u64(seed);
        let start = *zeros.choose(&mut rng).unwrap();
        let expected = expected_cascade(game.reference(), start);

        let outcome = game.reveal(start).unwrap();

        prop_assert_eq!(revealed_positions(&game), expected.clone());
        match outcome {
            MoveOutcome::Revealed { cells } => {
                prop_assert_eq!(cells as usize, expected.len());
            }
            MoveOutcome::Won => {
                prop_assert_eq!(game.reference().mine_count(), 0);
            }
            other => {
                prop_assert!(false, "unexpected outcome {:?}", other);
            }
        }
    }

    #[test]
    fn revealing_a_mine_only_changes_that_cell(
        seed in any::<u64>(),
        rows in 1u16..12,
        cols in 1u16..12,
        density in 0.05f64..0.6,
        safe_moves in 0usize..5,
    ) {
        let mut game = random_game(seed, rows, cols, density);
        let mines = game.reference().mine_positions();
        prop_assume!(!mines.is_empty());

        let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
        let safe: Vec<Position> = all_positions(game.size())
            .filter(|&pos| !game.reference().is_mine(pos))
            .collect();
        for _ in 0..safe_moves.min(safe.len()) {
            let pos = safe[rng.random_range(0..safe.len())];
            let _ = game.reveal(pos);
        }
        prop_assume!(game.status() == Status::InProgress);

        let target = mines[rng.random_range(0..mines.len())];
        prop_assume!(game.cell_at(target) == Ok(CellView::Hidden));
        let before = game.player().clone();

        prop_assert_eq!(game.reveal(target), Ok(MoveOutcome::HitMine));
        prop_assert_eq!(game.status(), Status::Lost);
        for (pos, cell) in game.player().iter() {
            if pos == target {
                prop_assert_eq!(cell, CellView::Exploded);
            } else {
                prop_assert_eq!(cell, before[pos]);
            }
        }
    }

    #[test]
    fn flag_then_unflag_is_a_no_op(
        seed in any::<u64>(),
        rows in 1u16..10,
        cols in 1u16..10,
        density in 0.1f64..0.9,
        row in 0u16..10,
        col in 0u16..10,
    ) {
        let mut game = random_game(seed, rows, cols, density);
        let pos = (row % rows, col % cols);
        let player_before = game.player().clone();
        let state_before = game.state().clone();

        let first = game.toggle_flag(pos).unwrap();
        prop_assume!(first == MoveOutcome::Flagged);
        prop_assert_eq!(game.toggle_flag(pos), Ok(MoveOutcome::Unflagged));

        prop_assert_eq!(game.player(), &player_before);
        prop_assert_eq!(game.state(), &state_before);
    }

    #[test]
    fn won_exactly_when_flags_equal_mines(
        seed in any::<u64>(),
        rows in 1u16..8,
        cols in 1u16..8,
        density in 0.0f64..0.5,
        extra in 0usize..4,
    ) {
        let mut game = random_game(seed, rows, cols, density);
        let mines = game.reference().mine_positions();

        // flag a shuffled mix of mines and other cells, stopping once the game ends
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut candidates = mines.clone();
        let others: Vec<Position> = all_positions(game.size())
            .filter(|pos| !mines.contains(pos))
            .collect();
        candidates.extend(others.choose_multiple(&mut rng, extra));
        candidates.shuffle(&mut rng);
        prop_assume!(!candidates.is_empty());

        for pos in candidates {
            if game.state().is_finished() {
                break;
            }
            game.toggle_flag(pos).unwrap();
        }

        let flags_equal_mines = game.player().flagged_positions() == mines;
        prop_assert_eq!(game.status() == Status::Won, flags_equal_mines);
    }

    #[test]
    fn flagging_all_but_one_mine_never_wins(
        seed in any::<u64>(),
        rows in 2u16..8,
        cols in 2u16..8,
        density in 0.1f64..0.5,
    ) {
        let mut game = random_game(seed, rows, cols, density);
        let mines = game.reference().mine_positions();
        prop_assume!(mines.len() >= 2);

        for &pos in &mines[1..] {
            game.toggle_flag(pos).unwrap();
        }

        prop_assert_eq!(game.status(), Status::InProgress);
        prop_assert_eq!(game.state().correctly_flagged_count() as usize, mines.len() - 1);
    }
}
