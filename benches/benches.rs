use arbiter::{
    legality::{is_attacked, is_legal, Mode},
    san::{decipher, to_notation},
    situation::has_legal_move,
    square, Board, Color, Game, History, Outcome, PieceId, Slot, Square,
};
use iai::black_box;

const STALEMATE: [&str; 19] = [
    "e3", "a5", "Qh5", "Ra6", "Qxa5", "h5", "h4", "Rah6", "Qxc7", "f6", "Qxd7+", "Kf7", "Qxb7",
    "Qd3", "Qxb8", "Qh7", "Qxc8", "Kg6", "Qe6",
];

fn bench_legal_moves() -> usize {
    let board = Board::new();
    let history = History::new();
    let count = board
        .on_board(Color::White)
        .flat_map(|(id, _)| Square::all().map(move |to| (id, to)))
        .filter(|&(id, to)| {
            is_legal(
                black_box(&board),
                black_box(&history),
                id,
                to,
                Mode::empty(),
            )
        })
        .count();
    assert_eq!(count, 20);
    count
}

fn bench_is_attacked() -> bool {
    let board = Board::new();
    let history = History::new();
    is_attacked(
        black_box(&board),
        black_box(&history),
        black_box(square::F3),
        Color::White,
    )
}

fn bench_has_legal_move() -> bool {
    let board = Board::new();
    let history = History::new();
    has_legal_move(black_box(&board), black_box(&history), Color::Black)
}

fn bench_decipher() {
    let board = Board::new();
    let history = History::new();
    let knight = PieceId::new(Color::White, Slot::Knight2);
    assert_eq!(
        decipher(
            black_box(&board),
            black_box(&history),
            Color::White,
            black_box("Nf3")
        ),
        Ok((knight, square::F3))
    );
    assert_eq!(
        to_notation(&board, &history, knight, square::F3).to_string(),
        "Nf3"
    );
}

fn bench_play_stalemate() -> Game {
    let mut game = black_box(Game::new());
    for token in black_box(STALEMATE) {
        assert!(game.submit_move(token, false).is_applied());
    }
    assert_eq!(game.outcome(), Some(Outcome::Draw));
    game
}

iai::main!(
    bench_legal_moves,
    bench_is_attacked,
    bench_has_legal_move,
    bench_decipher,
    bench_play_stalemate,
);
