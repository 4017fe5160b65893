// This file is part of the arbiter library.
// Copyright (C) 2024 The arbiter developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! A game in progress: turn order, move submission and setup.

use std::{error::Error, fmt, str::FromStr};

use tracing::{debug, info};

use crate::{
    board::{Board, Snapshot},
    color::Color,
    config::Config,
    history::{HalfMove, History, Turn},
    legality::{is_legal, Mode},
    piece::{PieceId, Slot},
    role::Role,
    san::{self, DecipherError, ParseSanError, San, SanError, SanPlus, Suffix, Token},
    situation,
    square::{Location, Square},
};

/// Error when parsing an invalid result token.
#[derive(Clone, Debug)]
pub struct ParseOutcomeError;

impl fmt::Display for ParseOutcomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid outcome")
    }
}

impl Error for ParseOutcomeError {}

/// Result of a game: `1-0`, `0-1`, `1/2-1/2`, or `*` if it was stopped
/// without a result.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Decisive { winner: Color },
    Draw,
    Unknown,
}

impl Outcome {
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Decisive { winner } => Some(winner),
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Returns [`ParseOutcomeError`] for anything but the four result
    /// tokens.
    pub fn from_ascii(s: &[u8]) -> Result<Outcome, ParseOutcomeError> {
        Ok(match s {
            b"1-0" => Outcome::Decisive {
                winner: Color::White,
            },
            b"0-1" => Outcome::Decisive {
                winner: Color::Black,
            },
            b"1/2-1/2" => Outcome::Draw,
            b"*" => Outcome::Unknown,
            _ => return Err(ParseOutcomeError),
        })
    }
}

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Outcome, ParseOutcomeError> {
        Outcome::from_ascii(s.as_bytes())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Outcome::Decisive {
                winner: Color::White,
            } => "1-0",
            Outcome::Decisive {
                winner: Color::Black,
            } => "0-1",
            Outcome::Draw => "1/2-1/2",
            Outcome::Unknown => "*",
        })
    }
}

/// Why a submitted token did not change the game.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rejection {
    /// The token is neither a move nor a result.
    Malformed(ParseSanError),
    /// The token names no unique piece of the side to move.
    Unresolved(SanError),
    /// The piece cannot move there.
    Illegal,
    /// The move would leave the mover's own king attacked.
    SelfCheck,
    /// The game has already ended.
    GameOver,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Rejection::Malformed(_) => "invalid move token",
            Rejection::Unresolved(_) => "unresolved move",
            Rejection::Illegal => "illegal move",
            Rejection::SelfCheck => "would leave own king in check",
            Rejection::GameOver => "game is over",
        })
    }
}

impl Error for Rejection {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Rejection::Malformed(err) => Some(err),
            Rejection::Unresolved(err) => Some(err),
            _ => None,
        }
    }
}

/// What [`Game::submit_move()`] did with a token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MoveOutcome {
    /// The move was played and recorded with this notation.
    Applied(SanPlus),
    /// Nothing changed.
    Rejected(Rejection),
    /// A result token was recorded.
    Finished(Outcome),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            MoveOutcome::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveOutcome::Applied(san) => write!(f, "{san}"),
            MoveOutcome::Rejected(rejection) => write!(f, "rejected: {rejection}"),
            MoveOutcome::Finished(outcome) => write!(f, "finished: {outcome}"),
        }
    }
}

/// Reasons a setup change is refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SetupError {
    /// Kings cannot be removed or captured.
    KingRequired,
    /// The side not to move would be in check.
    OppositeCheck,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            SetupError::KingRequired => "kings cannot be removed",
            SetupError::OppositeCheck => "side not to move would be in check",
        })
    }
}

impl Error for SetupError {}

/// Reasons a take-back is refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TakeBackError {
    /// No half-move has been played.
    Empty,
    /// Setup changes since the last half-move moved its pieces or occupied
    /// the squares they return to.
    Obstructed,
    /// Undoing would leave the side not to move in check.
    OppositeCheck,
}

impl fmt::Display for TakeBackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            TakeBackError::Empty => "no move to take back",
            TakeBackError::Obstructed => "board was edited after the last move",
            TakeBackError::OppositeCheck => "side not to move would be in check",
        })
    }
}

impl Error for TakeBackError {}

/// A game from the standard starting position.
///
/// # Examples
///
/// ```
/// use arbiter::{Game, MoveOutcome};
///
/// let mut game = Game::new();
/// for token in ["f3", "e5", "g4"] {
///     assert!(game.submit_move(token, false).is_applied());
/// }
///
/// match game.submit_move("Qh4", false) {
///     MoveOutcome::Applied(san) => assert_eq!(san.to_string(), "Qh4#"),
///     other => panic!("unexpected {other}"),
/// }
/// assert_eq!(game.outcome().map(|o| o.to_string()).as_deref(), Some("0-1"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Game {
    board: Board,
    history: History,
    config: Config,
    outcome: Option<Outcome>,
}

impl Game {
    pub fn new() -> Game {
        Game::default()
    }

    pub fn with_config(config: Config) -> Game {
        Game {
            config,
            ..Game::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Copy of every piece record.
    pub fn query_board(&self) -> Snapshot {
        self.board.snapshot()
    }

    pub fn query_history(&self) -> &[Turn] {
        self.history.turns()
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.history.side_to_move()
    }

    /// How the game ended, if it has.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_legal(&self, id: PieceId, to: Square, mode: Mode) -> bool {
        is_legal(&self.board, &self.history, id, to, mode)
    }

    pub fn king_in_check(&self, color: Color) -> bool {
        situation::king_in_check(&self.board, &self.history, color)
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        situation::is_checkmate(&self.board, &self.history, color)
    }

    pub fn is_stalemate(&self, color: Color) -> bool {
        situation::is_stalemate(&self.board, &self.history, color)
    }

    /// Finds the piece of the side to move named by `token`, and its
    /// destination.
    ///
    /// # Errors
    ///
    /// See [`san::decipher()`].
    pub fn decipher(&self, token: &str) -> Result<(PieceId, Square), DecipherError> {
        san::decipher(&self.board, &self.history, self.turn(), token)
    }

    /// Names a legal move in the current position. See
    /// [`san::to_notation()`].
    pub fn to_notation(&self, id: PieceId, to: Square) -> San {
        san::to_notation(&self.board, &self.history, id, to)
    }

    /// Plays a move token for the side to move, or records a result token.
    ///
    /// A rejected token leaves the game exactly as it was. `broadcast`
    /// logs the outcome at info level instead of debug.
    pub fn submit_move(&mut self, token: &str, broadcast: bool) -> MoveOutcome {
        let outcome = self.submit(token.trim());
        if broadcast {
            info!(token, %outcome, "move submitted");
        } else {
            debug!(token, %outcome, "move submitted");
        }
        outcome
    }

    fn submit(&mut self, token: &str) -> MoveOutcome {
        if self.config.stop_at_game_end && self.outcome.is_some() {
            return MoveOutcome::Rejected(Rejection::GameOver);
        }
        match Token::from_ascii(token.as_bytes()) {
            Err(err) => MoveOutcome::Rejected(Rejection::Malformed(err)),
            Ok(Token::Result(outcome)) => {
                self.outcome = Some(outcome);
                MoveOutcome::Finished(outcome)
            }
            Ok(Token::Move(san)) => match self.play(&san.san) {
                Ok(recorded) => MoveOutcome::Applied(recorded),
                Err(rejection) => MoveOutcome::Rejected(rejection),
            },
        }
    }

    fn play(&mut self, san: &San) -> Result<SanPlus, Rejection> {
        let color = self.turn();
        let (id, to) = san
            .resolve(&self.board, &self.history, color)
            .map_err(Rejection::Unresolved)?;
        if !is_legal(&self.board, &self.history, id, to, Mode::empty()) {
            return Err(Rejection::Illegal);
        }

        let notation = san::to_notation(&self.board, &self.history, id, to);
        let piece = *self.board.piece(id);
        let undo = self.board.make_move(id, to).ok_or(Rejection::Illegal)?;
        if situation::king_in_check(&self.board, &self.history, color) {
            self.board.unmake_move(&undo);
            debug!(%notation, "rolled back, king left in check");
            return Err(Rejection::SelfCheck);
        }

        self.board.set_moved(id, true);
        if let Some((rook, _, _)) = undo.castling {
            self.board.set_moved(rook, true);
        }
        self.history.push(HalfMove {
            san: notation.clone().into(),
            piece: id,
            from: undo.from,
            to,
            undo,
            first_move: !piece.has_moved,
            promoted: false,
        });

        let promotion = (piece.role == Role::Pawn && to.rank() == color.promotion_rank())
            .then(|| self.config.promotion_role(san.promotion()));
        if let Some(role) = promotion {
            self.board.set_role(id, role);
        }

        let suffix = Suffix::from_board(&self.board, &self.history, color);
        self.history.amend_latest(promotion, suffix);

        self.outcome = if suffix == Some(Suffix::Checkmate) {
            Some(Outcome::Decisive { winner: color })
        } else if situation::is_stalemate(&self.board, &self.history, !color) {
            Some(Outcome::Draw)
        } else {
            None
        };
        debug_assert!(self.board.is_consistent());

        Ok(SanPlus {
            san: match promotion {
                Some(role) => notation.with_promotion(role),
                None => notation,
            },
            suffix,
        })
    }

    /// Undoes the last half-move, restoring captured pieces, promotions
    /// and castling rights.
    ///
    /// # Errors
    ///
    /// Returns [`TakeBackError`] and leaves the game unchanged if no move
    /// has been played, or if `place` and `remove` changed the board in a
    /// way the last half-move cannot be undone from.
    pub fn take_back(&mut self) -> Result<HalfMove, TakeBackError> {
        let latest = self.history.latest().ok_or(TakeBackError::Empty)?;
        if !self.board.can_unmake(&latest.undo) {
            debug!(half_move = %latest, "take-back obstructed");
            return Err(TakeBackError::Obstructed);
        }

        let before = self.board.clone();
        let half_move = self.history.rollback().ok_or(TakeBackError::Empty)?;
        self.board.unmake_move(&half_move.undo);
        if half_move.promoted {
            self.board.set_role(half_move.piece, Role::Pawn);
        }
        if half_move.first_move {
            self.board.set_moved(half_move.piece, false);
        }
        if let Some((rook, _, _)) = half_move.undo.castling {
            self.board.set_moved(rook, false);
        }
        // Only reachable when setup gave check after the move.
        if situation::king_in_check(&self.board, &self.history, !half_move.color()) {
            self.board = before;
            self.history.push(half_move);
            return Err(TakeBackError::OppositeCheck);
        }
        debug_assert!(self.board.is_consistent());
        self.outcome = None;
        debug!(%half_move, "taken back");
        Ok(half_move)
    }

    /// Puts a piece on a square, capturing whatever else stands there.
    /// Captured pieces may be put back. Returns the captured piece.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] and leaves the board unchanged if a king
    /// would be captured or the side not to move would be in check.
    pub fn place(&mut self, id: PieceId, sq: Square) -> Result<Option<PieceId>, SetupError> {
        if self
            .board
            .occupant(sq)
            .is_some_and(|other| other != id && other.slot == Slot::King)
        {
            return Err(SetupError::KingRequired);
        }
        let before = self.board.clone();
        let displaced = self.board.place(id, sq);
        self.validate_setup(before)?;
        debug!(piece = %id, %sq, ?displaced, "placed");
        Ok(displaced)
    }

    /// Takes a piece off the board.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] and leaves the board unchanged for kings, or
    /// if the side not to move would be in check.
    pub fn remove(&mut self, id: PieceId) -> Result<(), SetupError> {
        if id.slot == Slot::King {
            return Err(SetupError::KingRequired);
        }
        let before = self.board.clone();
        self.board.relocate(id, Location::Captured);
        self.validate_setup(before)?;
        debug!(piece = %id, "removed");
        Ok(())
    }

    fn validate_setup(&mut self, before: Board) -> Result<(), SetupError> {
        if situation::king_in_check(&self.board, &self.history, !self.turn()) {
            self.board = before;
            return Err(SetupError::OppositeCheck);
        }
        debug_assert!(self.board.is_consistent());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square;

    fn play_all(game: &mut Game, tokens: &[&str]) {
        for token in tokens {
            let outcome = game.submit_move(token, false);
            assert!(outcome.is_applied(), "{token}: {outcome}");
        }
    }

    fn notation(outcome: MoveOutcome) -> String {
        match outcome {
            MoveOutcome::Applied(san) => san.to_string(),
            other => panic!("expected applied move, got {other}"),
        }
    }

    #[test]
    fn test_outcome_tokens() {
        for token in ["1-0", "0-1", "1/2-1/2", "*"] {
            assert_eq!(token.parse::<Outcome>().map(|o| o.to_string()).ok().as_deref(), Some(token));
        }
        assert!("2-0".parse::<Outcome>().is_err());
        assert_eq!(Outcome::Draw.winner(), None);
    }

    #[test]
    fn test_first_move() {
        let mut game = Game::new();
        assert_eq!(notation(game.submit_move("e4", false)), "e4");
        let pawn = *game.query_board().get(PieceId::new(Color::White, Slot::Pawn5));
        assert_eq!(pawn.location, Location::On(square::E4));
        assert!(pawn.has_moved);
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.query_history().len(), 1);
    }

    #[test]
    fn test_rejections_leave_game_unchanged() {
        let mut game = Game::new();
        play_all(&mut game, &["e4", "e5"]);
        let board = game.query_board();
        let history = game.history().clone();

        for (token, rejection) in [
            ("Ke3", Rejection::Illegal),
            ("Ke3", Rejection::Illegal),
            ("e5", Rejection::Illegal),
            ("d4d5", Rejection::Malformed(ParseSanError)),
            ("Bg5", Rejection::Illegal),
            ("Nd4", Rejection::Unresolved(SanError::NoCandidate)),
            ("hello", Rejection::Malformed(ParseSanError)),
        ] {
            assert_eq!(game.submit_move(token, true), MoveOutcome::Rejected(rejection));
            assert_eq!(game.query_board(), board);
            assert_eq!(game.history(), &history);
        }
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn test_promotion() {
        let mut game = Game::new();
        let pawn = PieceId::new(Color::White, Slot::Pawn1);
        assert_eq!(
            game.place(pawn, square::H7),
            Ok(Some(PieceId::new(Color::Black, Slot::Pawn8)))
        );
        let mut promoted = game.clone();

        assert_eq!(notation(game.submit_move("hxg8=B", false)), "hxg8=B");
        assert_eq!(game.board().piece(pawn).role, Role::Bishop);

        assert_eq!(notation(promoted.submit_move("hxg8", false)), "hxg8=Q");
        assert_eq!(promoted.board().piece(pawn).role, Role::Queen);
        assert_eq!(
            promoted.history().latest().map(ToString::to_string).as_deref(),
            Some("hxg8=Q")
        );
    }

    #[test]
    fn test_configured_promotion() {
        let mut game = Game::with_config(Config {
            default_promotion: Role::Knight,
            ..Config::default()
        });
        let pawn = PieceId::new(Color::White, Slot::Pawn1);
        game.place(pawn, square::H7).expect("legal setup");
        assert_eq!(notation(game.submit_move("hxg8", false)), "hxg8=N");
    }

    #[test]
    fn test_setup_errors() {
        let mut game = Game::new();
        let king = PieceId::new(Color::White, Slot::King);
        assert_eq!(game.remove(king), Err(SetupError::KingRequired));
        assert_eq!(
            game.place(PieceId::new(Color::White, Slot::Queen), square::E8),
            Err(SetupError::KingRequired)
        );

        // White to move: checking the black king is refused.
        let board = game.query_board();
        assert_eq!(
            game.place(PieceId::new(Color::White, Slot::Knight1), square::F6),
            Err(SetupError::OppositeCheck)
        );
        assert_eq!(game.query_board(), board);

        // Checking the side to move is fine.
        assert_eq!(
            game.place(PieceId::new(Color::Black, Slot::Knight1), square::D3),
            Ok(None)
        );
        assert!(game.king_in_check(Color::White));
    }

    #[test]
    fn test_take_back() {
        let mut game = Game::new();
        let start = game.query_board();
        play_all(&mut game, &["e4", "d5", "exd5"]);
        assert_eq!(game.history().len(), 3);

        let taken = game.take_back().expect("move to take back");
        assert_eq!(taken.to_string(), "exd5");
        assert_eq!(
            game.board().occupant(square::D5),
            Some(PieceId::new(Color::Black, Slot::Pawn4))
        );
        game.take_back().expect("move to take back");
        game.take_back().expect("move to take back");
        assert_eq!(game.query_board(), start);
        assert_eq!(game.take_back().map(|h| h.to_string()), Err(TakeBackError::Empty));
    }

    #[test]
    fn test_take_back_onto_occupied_origin() {
        let mut game = Game::new();
        let knight = PieceId::new(Color::White, Slot::Knight2);
        play_all(&mut game, &["e4"]);
        game.place(knight, square::E2).expect("legal setup");
        let board = game.query_board();

        assert_eq!(
            game.take_back().map(|h| h.to_string()),
            Err(TakeBackError::Obstructed)
        );
        assert!(game.board().is_consistent());
        assert_eq!(game.query_board(), board);
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.turn(), Color::Black);

        // Clearing the square makes the move undoable again.
        game.place(knight, square::G1).expect("legal setup");
        let taken = game.take_back().expect("move to take back");
        assert_eq!(taken.to_string(), "e4");
        assert_eq!(game.query_board(), Game::new().query_board());
    }

    #[test]
    fn test_take_back_after_moving_the_mover() {
        let mut game = Game::new();
        let pawn = PieceId::new(Color::White, Slot::Pawn5);
        play_all(&mut game, &["e4", "e5", "Nf3"]);
        game.place(pawn, square::E3).expect("legal setup");
        assert_eq!(game.take_back().err(), None);
        // The knight went back, the pawn stays where setup put it.
        assert!(game.board().is_consistent());
        assert_eq!(game.board().occupant(square::E3), Some(pawn));

        game.place(pawn, square::E4).expect("legal setup");
        game.remove(PieceId::new(Color::Black, Slot::Pawn5)).expect("legal setup");
        assert_eq!(game.take_back().err(), Some(TakeBackError::Obstructed));
        assert!(game.board().is_consistent());
    }

    #[test]
    fn test_take_back_into_opposite_check() {
        let mut game = Game::new();
        play_all(&mut game, &["e4"]);
        // Black to move, so checking black is a legal setup.
        game.place(PieceId::new(Color::White, Slot::Knight2), square::F6)
            .expect("legal setup");
        let board = game.query_board();

        assert_eq!(game.take_back().err(), Some(TakeBackError::OppositeCheck));
        assert_eq!(game.query_board(), board);
        assert_eq!(game.history().len(), 1);
        assert!(game.board().is_consistent());
    }

    #[test]
    fn test_game_over() {
        let mut game = Game::new();
        assert_eq!(
            game.submit_move("1/2-1/2", false),
            MoveOutcome::Finished(Outcome::Draw)
        );
        assert_eq!(game.outcome(), Some(Outcome::Draw));
        assert_eq!(
            game.submit_move("e4", false),
            MoveOutcome::Rejected(Rejection::GameOver)
        );

        let mut game = Game::with_config(Config {
            stop_at_game_end: false,
            ..Config::default()
        });
        game.submit_move("*", false);
        assert!(game.submit_move("e4", false).is_applied());
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::Illegal.to_string(), "illegal move");
        assert_eq!(Rejection::SelfCheck.to_string(), "would leave own king in check");
        assert_eq!(
            Rejection::Unresolved(SanError::Ambiguous).to_string(),
            "unresolved move"
        );
        assert!(Rejection::Unresolved(SanError::Ambiguous).source().is_some());
    }
}
