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

//! Read and write Standard Algebraic Notation.
//!
//! # Examples
//!
//! Parse and write SANs:
//!
//! ```
//! use arbiter::san::San;
//!
//! let san: San = "Nf3".parse()?;
//! assert_eq!(san.to_string(), "Nf3");
//! # Ok::<_, arbiter::san::ParseSanError>(())
//! ```
//!
//! Resolving against a board, and back:
//!
//! ```
//! use arbiter::{san::San, square, Board, Color, History, PieceId, Slot};
//!
//! let board = Board::new();
//! let history = History::new();
//!
//! let san: San = "Nf3".parse()?;
//! let (knight, to) = san.resolve(&board, &history, Color::White)?;
//! assert_eq!(knight, PieceId::new(Color::White, Slot::Knight2));
//! assert_eq!(to, square::F3);
//!
//! assert_eq!(San::from_move(&board, &history, knight, to).to_string(), "Nf3");
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use tracing::trace;

use crate::{
    board::Board,
    castling_side::CastlingSide,
    color::Color,
    game::Outcome,
    history::History,
    legality::{is_legal, Mode},
    piece::{PieceId, Slot},
    role::Role,
    situation::{checked_side, is_checkmate},
    square::{File, Rank, Square},
};

/// Error when parsing a syntactially invalid SAN.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseSanError;

impl fmt::Display for ParseSanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid san")
    }
}

impl std::error::Error for ParseSanError {}

/// `NoCandidate` or `Ambiguous`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SanError {
    /// No piece of the side to move fits the notation.
    NoCandidate,
    /// Several pieces fit the notation and could legally make the move.
    Ambiguous,
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            SanError::NoCandidate => "no piece matches san",
            SanError::Ambiguous => "ambiguous san",
        })
    }
}

impl std::error::Error for SanError {}

/// A move in Standard Algebraic Notation.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum San {
    Normal {
        role: Role,
        file: Option<File>,
        rank: Option<Rank>,
        capture: bool,
        to: Square,
        promotion: Option<Role>,
    },
    Castle(CastlingSide),
}

impl San {
    /// Parses a SAN. Ignores a possible check or checkmate suffix.
    ///
    /// Pawn moves may only be disambiguated by file, and promotions are
    /// only to knight, bishop, rook or queen.
    ///
    /// # Errors
    ///
    /// Returns [`ParseSanError`] if `san` is not syntactically valid.
    pub fn from_ascii(mut san: &[u8]) -> Result<San, ParseSanError> {
        if san.ends_with(b"#") || san.ends_with(b"+") {
            san = &san[0..(san.len() - 1)];
        }

        if san == b"O-O" {
            return Ok(San::Castle(CastlingSide::KingSide));
        } else if san == b"O-O-O" {
            return Ok(San::Castle(CastlingSide::QueenSide));
        }

        let mut chars = san.iter().copied();

        let ch = chars.next().ok_or(ParseSanError)?;
        let (role, next) = if ch.is_ascii_uppercase() {
            (
                Role::from_char(char::from(ch)).ok_or(ParseSanError)?,
                chars.next().ok_or(ParseSanError)?,
            )
        } else {
            (Role::Pawn, ch)
        };

        let (file, next) = if let Some(file) = File::from_char(char::from(next)) {
            (Some(file), chars.next().ok_or(ParseSanError)?)
        } else {
            (None, next)
        };

        let (rank, next) = if let Some(rank) = Rank::from_char(char::from(next)) {
            (Some(rank), chars.next())
        } else {
            (None, Some(next))
        };

        let (capture, file, rank, to, next) = match next {
            Some(b'x') => {
                let to_file = chars
                    .next()
                    .and_then(|ch| File::from_char(char::from(ch)))
                    .ok_or(ParseSanError)?;
                let to_rank = chars
                    .next()
                    .and_then(|ch| Rank::from_char(char::from(ch)))
                    .ok_or(ParseSanError)?;
                (true, file, rank, Square::from_coords(to_file, to_rank), chars.next())
            }
            Some(b'=') => {
                let to = Square::from_coords(file.ok_or(ParseSanError)?, rank.ok_or(ParseSanError)?);
                (false, None, None, to, Some(b'='))
            }
            Some(next) => {
                let to_file = File::from_char(char::from(next)).ok_or(ParseSanError)?;
                let to_rank = chars
                    .next()
                    .and_then(|ch| Rank::from_char(char::from(ch)))
                    .ok_or(ParseSanError)?;
                (false, file, rank, Square::from_coords(to_file, to_rank), chars.next())
            }
            None => {
                let to = Square::from_coords(file.ok_or(ParseSanError)?, rank.ok_or(ParseSanError)?);
                (false, None, None, to, None)
            }
        };

        let promotion = match next {
            Some(b'=') => Some(
                chars
                    .next()
                    .and_then(|r| Role::from_char(char::from(r)))
                    .filter(|r| r.is_promotion())
                    .ok_or(ParseSanError)?,
            ),
            Some(_) => return Err(ParseSanError),
            None => None,
        };

        if chars.next().is_some()
            || (role == Role::Pawn && rank.is_some())
            || (role != Role::Pawn && promotion.is_some())
        {
            return Err(ParseSanError);
        }

        Ok(San::Normal {
            role,
            file,
            rank,
            capture,
            to,
            promotion,
        })
    }

    /// Names the move of `id` to `to`, disambiguating by file, then by
    /// rank, then by both, against other pieces of the same role that
    /// could legally reach `to`.
    ///
    /// The move must be legal. The notation carries no promotion or
    /// check suffix; those are added once the move has been played.
    ///
    /// # Panics
    ///
    /// Panics if the piece is not on the board.
    pub fn from_move(board: &Board, history: &History, id: PieceId, to: Square) -> San {
        let piece = board.piece(id);
        let Some(from) = piece.square() else {
            panic!("cannot name a move of captured piece {id}");
        };

        match piece.role {
            Role::King if !piece.has_moved => match CastlingSide::from_king_move(from, to) {
                Some(side) => San::Castle(side),
                None => San::normal(Role::King, to, board, None, None),
            },
            Role::Pawn => {
                let capture = from.file() != to.file();
                San::Normal {
                    role: Role::Pawn,
                    file: capture.then_some(from.file()),
                    rank: None,
                    capture,
                    to,
                    promotion: None,
                }
            }
            role => {
                let (rank, file) = board
                    .on_board(id.color)
                    .filter(|&(other, _)| {
                        other != id
                            && board.piece(other).role == role
                            && is_legal(board, history, other, to, Mode::empty())
                    })
                    .fold((false, false), |(rank, file), (_, candidate)| {
                        if from.rank() == candidate.rank() || from.file() != candidate.file() {
                            (rank, true)
                        } else {
                            (true, file)
                        }
                    });
                San::normal(
                    role,
                    to,
                    board,
                    file.then_some(from.file()),
                    rank.then_some(from.rank()),
                )
            }
        }
    }

    fn normal(
        role: Role,
        to: Square,
        board: &Board,
        file: Option<File>,
        rank: Option<Rank>,
    ) -> San {
        San::Normal {
            role,
            file,
            rank,
            capture: !board.is_empty(to),
            to,
            promotion: None,
        }
    }

    /// Finds the piece of `color` this notation refers to, and its
    /// destination.
    ///
    /// Pieces other than pawns are chosen among the pieces of the named
    /// role that match the disambiguation (and, for bishops, the colour of
    /// the destination square). A single match is returned as is; among
    /// several, exactly one must be able to make the move legally. Pawns
    /// are found by position: one square behind the destination, then two,
    /// or diagonally behind for captures. Castling names the king and the
    /// square two files to the side.
    ///
    /// The result is not checked for legality beyond that.
    ///
    /// # Errors
    ///
    /// Returns [`SanError`] if no unique piece fits.
    pub fn resolve(
        &self,
        board: &Board,
        history: &History,
        color: Color,
    ) -> Result<(PieceId, Square), SanError> {
        let result = match *self {
            San::Castle(side) => {
                let king = PieceId::new(color, Slot::King);
                board
                    .piece(king)
                    .square()
                    .and_then(|from| from.offset(side.king_delta(), 0))
                    .map(|to| (king, to))
                    .ok_or(SanError::NoCandidate)
            }
            San::Normal {
                role: Role::Pawn,
                file,
                capture,
                to,
                ..
            } => {
                let own_pawn = |sq: Option<Square>| {
                    sq.and_then(|sq| board.occupant(sq)).filter(|&id| {
                        id.color == color && board.piece(id).role == Role::Pawn
                    })
                };
                let back = -color.forward();
                let pawn = match file {
                    None if capture => None,
                    None => own_pawn(to.offset(0, back)).or_else(|| own_pawn(to.offset(0, 2 * back))),
                    Some(file) if file.distance(to.file()) == 1 => own_pawn(
                        to.rank()
                            .offset(back)
                            .map(|rank| Square::from_coords(file, rank)),
                    ),
                    Some(_) => None,
                };
                pawn.map(|id| (id, to)).ok_or(SanError::NoCandidate)
            }
            San::Normal {
                role,
                file,
                rank,
                to,
                ..
            } => {
                let mut candidates: ArrayVec<PieceId, 16> = board
                    .on_board(color)
                    .filter(|&(id, sq)| {
                        board.piece(id).role == role
                            && file.is_none_or(|f| f == sq.file())
                            && rank.is_none_or(|r| r == sq.rank())
                            && (role != Role::Bishop || sq.is_light() == to.is_light())
                    })
                    .map(|(id, _)| id)
                    .collect();
                if candidates.len() > 1 {
                    candidates.retain(|id| is_legal(board, history, *id, to, Mode::empty()));
                }
                match *candidates.as_slice() {
                    [id] => Ok((id, to)),
                    [] => Err(SanError::NoCandidate),
                    _ => Err(SanError::Ambiguous),
                }
            }
        };
        trace!(san = %self, %color, ?result, "resolved");
        result
    }

    /// The same move, promoting to `role`. Castling is returned unchanged.
    #[must_use]
    pub fn with_promotion(self, role: Role) -> San {
        match self {
            San::Normal {
                role: moved,
                file,
                rank,
                capture,
                to,
                ..
            } => San::Normal {
                role: moved,
                file,
                rank,
                capture,
                to,
                promotion: Some(role),
            },
            castle => castle,
        }
    }

    pub fn promotion(&self) -> Option<Role> {
        match *self {
            San::Normal { promotion, .. } => promotion,
            San::Castle(_) => None,
        }
    }
}

/// Names a legal move and makes sure the name reads back to the same move.
///
/// # Panics
///
/// Panics if the notation would not resolve to `id` and `to` on the same
/// board.
pub fn to_notation(board: &Board, history: &History, id: PieceId, to: Square) -> San {
    let san = San::from_move(board, history, id, to);
    assert_eq!(
        san.resolve(board, history, id.color),
        Ok((id, to)),
        "{san} does not name the move of {id} to {to}"
    );
    san
}

/// Parses a move token and finds the piece it moves and where to.
///
/// # Errors
///
/// Returns [`DecipherError`] if the token is malformed or does not single
/// out one piece.
pub fn decipher(
    board: &Board,
    history: &History,
    color: Color,
    token: &str,
) -> Result<(PieceId, Square), DecipherError> {
    let san = San::from_ascii(token.trim().as_bytes()).map_err(DecipherError::Malformed)?;
    san.resolve(board, history, color)
        .map_err(DecipherError::Unresolved)
}

/// Failure to turn a token into a move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecipherError {
    Malformed(ParseSanError),
    Unresolved(SanError),
}

impl fmt::Display for DecipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecipherError::Malformed(err) => fmt::Display::fmt(err, f),
            DecipherError::Unresolved(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for DecipherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecipherError::Malformed(err) => Some(err),
            DecipherError::Unresolved(err) => Some(err),
        }
    }
}

impl FromStr for San {
    type Err = ParseSanError;

    fn from_str(san: &str) -> Result<San, ParseSanError> {
        San::from_ascii(san.as_bytes())
    }
}

impl fmt::Display for San {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            San::Normal {
                role,
                file,
                rank,
                capture,
                to,
                promotion,
            } => {
                if role != Role::Pawn {
                    write!(f, "{}", role.upper_char())?;
                }
                if let Some(file) = file {
                    write!(f, "{}", file.char())?;
                }
                if let Some(rank) = rank {
                    write!(f, "{}", rank.char())?;
                }
                if capture {
                    write!(f, "x")?;
                }
                write!(f, "{to}")?;
                if let Some(promotion) = promotion {
                    write!(f, "={}", promotion.upper_char())?;
                }
                Ok(())
            }
            San::Castle(CastlingSide::KingSide) => write!(f, "O-O"),
            San::Castle(CastlingSide::QueenSide) => write!(f, "O-O-O"),
        }
    }
}

/// Check (`+`) or checkmate (`#`) suffix.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Suffix {
    Check,
    Checkmate,
}

impl Suffix {
    pub const fn char(self) -> char {
        match self {
            Suffix::Check => '+',
            Suffix::Checkmate => '#',
        }
    }

    pub const fn from_char(ch: char) -> Option<Suffix> {
        match ch {
            '+' => Some(Suffix::Check),
            '#' => Some(Suffix::Checkmate),
            _ => None,
        }
    }

    /// The suffix earned by a move of `mover` that has just been played.
    ///
    /// # Panics
    ///
    /// Panics if the mover's own king is attacked.
    pub fn from_board(board: &Board, history: &History, mover: Color) -> Option<Suffix> {
        let checked = checked_side(board, history)?;
        assert_ne!(checked, mover, "{mover} moved into check");
        Some(if is_checkmate(board, history, checked) {
            Suffix::Checkmate
        } else {
            Suffix::Check
        })
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// A [`San`] and possible check and checkmate suffixes.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct SanPlus {
    pub san: San,
    pub suffix: Option<Suffix>,
}

impl SanPlus {
    /// Parses a SAN and possible check and checkmate suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ParseSanError`] if `san` is not syntactically valid.
    pub fn from_ascii(san: &[u8]) -> Result<SanPlus, ParseSanError> {
        San::from_ascii(san).map(|result| SanPlus {
            san: result,
            suffix: san
                .last()
                .copied()
                .and_then(|ch| Suffix::from_char(char::from(ch))),
        })
    }
}

impl From<San> for SanPlus {
    fn from(san: San) -> SanPlus {
        SanPlus { san, suffix: None }
    }
}

impl FromStr for SanPlus {
    type Err = ParseSanError;

    fn from_str(san: &str) -> Result<SanPlus, ParseSanError> {
        SanPlus::from_ascii(san.as_bytes())
    }
}

impl fmt::Display for SanPlus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.san)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

/// One token of a move stream: a move, or a declared game result.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Token {
    Move(SanPlus),
    Result(Outcome),
}

impl Token {
    /// # Errors
    ///
    /// Returns [`ParseSanError`] if `token` is neither a result nor a
    /// syntactically valid move.
    pub fn from_ascii(token: &[u8]) -> Result<Token, ParseSanError> {
        match Outcome::from_ascii(token) {
            Ok(outcome) => Ok(Token::Result(outcome)),
            Err(_) => SanPlus::from_ascii(token).map(Token::Move),
        }
    }
}

impl FromStr for Token {
    type Err = ParseSanError;

    fn from_str(token: &str) -> Result<Token, ParseSanError> {
        Token::from_ascii(token.as_bytes())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Move(san) => fmt::Display::fmt(san, f),
            Token::Result(outcome) => fmt::Display::fmt(outcome, f),
        }
    }
}
