#![no_main]

use arbiter::{Game, PieceId, Square};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Step {
    Move(PieceId, Square),
    Place(PieceId, Square),
    Remove(PieceId),
    TakeBack,
}

fuzz_target!(|steps: Vec<Step>| {
    let mut game = Game::new();
    // Board before each half-move, unless setup edited it since.
    let mut snapshots = Vec::new();
    for step in steps {
        match step {
            Step::Move(id, to) => {
                if id.color != game.turn() || !game.is_legal(id, to, Default::default()) {
                    continue;
                }
                let before = game.query_board();
                let san = game.to_notation(id, to).to_string();
                if game.submit_move(&san, false).is_applied() {
                    snapshots.push(Some(before));
                }
            }
            Step::Place(id, sq) => {
                if game.place(id, sq).is_ok() {
                    snapshots.fill(None);
                }
            }
            Step::Remove(id) => {
                if game.remove(id).is_ok() {
                    snapshots.fill(None);
                }
            }
            Step::TakeBack => {
                let board = game.query_board();
                let len = game.history().len();
                match game.take_back() {
                    Ok(_) => {
                        if let Some(before) = snapshots.pop().flatten() {
                            assert_eq!(game.query_board(), before);
                        }
                    }
                    Err(_) => {
                        assert_eq!(game.query_board(), board);
                        assert_eq!(game.history().len(), len);
                    }
                }
            }
        }
        assert!(game.board().is_consistent());
        assert_eq!(game.history().len(), snapshots.len());
    }
});
