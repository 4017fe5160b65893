#![no_main]

use arbiter::{Game, PieceId, Square};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|moves: Vec<(PieceId, Square)>| {
    let mut game = Game::new();
    let mut snapshots = Vec::new();
    for (id, to) in moves {
        if !game.is_legal(id, to, Default::default()) || id.color != game.turn() {
            continue;
        }
        let before = game.query_board();
        let san = game.to_notation(id, to).to_string();
        if game.submit_move(&san, false).is_applied() {
            snapshots.push(before);
        }
        if game.outcome().is_some() {
            break;
        }
    }
    while let Some(before) = snapshots.pop() {
        game.take_back().expect("move to take back");
        assert_eq!(game.query_board(), before);
    }
    assert!(game.history().is_empty());
});
