//! A chess arbiter: move legality, algebraic notation and turn history.
//!
//! Every piece keeps its identity for the whole game (its side and one of
//! the 16 starting slots), and the [`Board`] tracks where each of them is,
//! including the ones that were captured.
//!
//! # Examples
//!
//! Play moves given in Standard Algebraic Notation:
//!
//! ```
//! use arbiter::{Game, MoveOutcome, Rejection};
//!
//! let mut game = Game::new();
//! assert!(game.submit_move("e4", false).is_applied());
//! assert!(game.submit_move("e5", false).is_applied());
//!
//! // Tokens that do not make a legal move change nothing.
//! assert_eq!(
//!     game.submit_move("Ke3", false),
//!     MoveOutcome::Rejected(Rejection::Illegal)
//! );
//!
//! // Notation is recorded as it should have been written.
//! assert_eq!(game.history().to_string(), "1. e4 e5");
//! ```
//!
//! Ask about single moves and the state of the kings:
//!
//! ```
//! use arbiter::{legality::Mode, square, Color, Game, PieceId, Slot};
//!
//! let game = Game::new();
//! let knight = PieceId::new(Color::White, Slot::Knight1);
//! assert!(game.is_legal(knight, square::C3, Mode::empty()));
//! assert!(!game.king_in_check(Color::White));
//! assert!(!game.is_checkmate(Color::Black));
//! ```
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   vocabulary types and board snapshots.
//! * `arbitrary`: Implements [`arbitrary::Arbitrary`](https://docs.rs/arbitrary/1/arbitrary/trait.Arbitrary.html)
//!   for vocabulary types.
//! * `nohash-hasher`: Implements
//!   [`nohash_hasher::IsEnabled`](https://docs.rs/nohash-hasher/0.2/nohash_hasher/trait.IsEnabled.html)
//!   for sensible types.

#![doc(html_root_url = "https://docs.rs/arbiter/0.1.0")]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

mod castling_side;
mod color;
mod config;
mod game;
mod piece;
mod role;
mod util;

pub mod board;
pub mod history;
pub mod legality;
pub mod san;
pub mod situation;
pub mod square;

pub use board::{Board, PieceView, Snapshot, Undo};
pub use castling_side::CastlingSide;
pub use color::{ByColor, Color, ParseColorError};
pub use config::Config;
pub use game::{
    Game, MoveOutcome, Outcome, ParseOutcomeError, Rejection, SetupError, TakeBackError,
};
pub use history::{HalfMove, History, Turn};
pub use piece::{ParsePieceIdError, Piece, PieceId, Slot};
pub use role::Role;
pub use square::{File, Location, ParseSquareError, Rank, Square};
