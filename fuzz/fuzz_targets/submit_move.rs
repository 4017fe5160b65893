#![no_main]

use arbiter::{Color, Game, MoveOutcome};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|tokens: Vec<String>| {
    let mut game = Game::new();
    for token in tokens {
        let before = game.clone();
        match game.submit_move(&token, false) {
            MoveOutcome::Applied(_) => {
                let mover = before.turn();
                assert!(!game.king_in_check(mover));
                assert_eq!(game.turn(), !mover);
            }
            MoveOutcome::Rejected(_) => {
                assert_eq!(game.query_board(), before.query_board());
                assert_eq!(game.history(), before.history());
            }
            MoveOutcome::Finished(_) => return,
        }
        assert!(game.board().is_consistent());
        assert!(!(game.king_in_check(Color::White) && game.king_in_check(Color::Black)));
    }
});
