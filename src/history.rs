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

//! Turn-by-turn record of a game.

use std::fmt;

use crate::{
    board::Undo,
    color::Color,
    piece::PieceId,
    role::Role,
    san::{San, SanPlus, Suffix},
    square::Square,
};

/// One recorded move of one side.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct HalfMove {
    /// Notation as recorded, with promotion and check suffixes.
    pub san: SanPlus,
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    pub(crate) undo: Undo,
    pub(crate) first_move: bool,
    pub(crate) promoted: bool,
}

impl HalfMove {
    #[inline]
    pub fn color(&self) -> Color {
        self.piece.color
    }

    /// Whether this was a pawn advance without capture, written as a bare
    /// destination like `d5`.
    pub fn is_bare_pawn_push(&self) -> bool {
        matches!(
            self.san.san,
            San::Normal {
                role: Role::Pawn,
                file: None,
                capture: false,
                ..
            }
        )
    }
}

impl fmt::Display for HalfMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.san, f)
    }
}

/// A numbered pair of half-moves. Black's half is absent until played.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Turn {
    pub number: u32,
    pub white: HalfMove,
    pub black: Option<HalfMove>,
}

impl Turn {
    pub fn half_moves(&self) -> impl DoubleEndedIterator<Item = &HalfMove> {
        Some(&self.white).into_iter().chain(self.black.as_ref())
    }
}

/// Ordered list of turns, numbered from 1.
///
/// White moves first, and every turn except possibly the last has both
/// halves.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new() -> History {
        History::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of recorded half-moves.
    pub fn len(&self) -> usize {
        self.half_moves().count()
    }

    pub fn side_to_move(&self) -> Color {
        match self.turns.last() {
            Some(Turn { black: None, .. }) => Color::Black,
            _ => Color::White,
        }
    }

    /// Number of the turn the side to move is playing in.
    pub fn fullmoves(&self) -> u32 {
        match self.turns.last() {
            Some(turn) if turn.black.is_none() => turn.number,
            Some(turn) => turn.number + 1,
            None => 1,
        }
    }

    pub fn latest(&self) -> Option<&HalfMove> {
        self.turns
            .last()
            .map(|turn| turn.black.as_ref().unwrap_or(&turn.white))
    }

    fn latest_mut(&mut self) -> Option<&mut HalfMove> {
        self.turns
            .last_mut()
            .map(|turn| turn.black.as_mut().unwrap_or(&mut turn.white))
    }

    pub fn half_moves(&self) -> impl DoubleEndedIterator<Item = &HalfMove> {
        self.turns.iter().flat_map(Turn::half_moves)
    }

    /// Appends a half-move for the side to move.
    ///
    /// # Panics
    ///
    /// Panics if the half-move belongs to the side that just moved.
    pub fn push(&mut self, half_move: HalfMove) {
        assert_eq!(
            half_move.color(),
            self.side_to_move(),
            "half-move recorded out of turn"
        );
        match self.turns.last_mut() {
            Some(turn) if turn.black.is_none() => turn.black = Some(half_move),
            _ => {
                let number = self.fullmoves();
                self.turns.push(Turn {
                    number,
                    white: half_move,
                    black: None,
                });
            }
        }
    }

    /// Adds a promotion and a check or checkmate suffix to the half-move
    /// just recorded.
    pub fn amend_latest(&mut self, promotion: Option<Role>, suffix: Option<Suffix>) {
        if let Some(latest) = self.latest_mut() {
            if let Some(role) = promotion {
                latest.san.san = latest.san.san.clone().with_promotion(role);
                latest.promoted = true;
            }
            latest.san.suffix = suffix;
        }
    }

    /// Removes the last recorded half-move, if any.
    pub fn rollback(&mut self) -> Option<HalfMove> {
        let turn = self.turns.last_mut()?;
        match turn.black.take() {
            Some(black) => Some(black),
            None => self.turns.pop().map(|turn| turn.white),
        }
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, turn) in self.turns.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}. {}", turn.number, turn.white)?;
            if let Some(ref black) = turn.black {
                write!(f, " {black}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{piece::Slot, square};

    fn half_move(color: Color, slot: Slot, san: &str, from: Square, to: Square) -> HalfMove {
        let piece = PieceId::new(color, slot);
        HalfMove {
            san: san.parse().expect("valid san"),
            piece,
            from,
            to,
            undo: Undo {
                mover: piece,
                from,
                to,
                captured: None,
                castling: None,
            },
            first_move: true,
            promoted: false,
        }
    }

    fn sample() -> History {
        let mut history = History::new();
        history.push(half_move(Color::White, Slot::Pawn5, "e4", square::E2, square::E4));
        history.push(half_move(Color::Black, Slot::Pawn5, "e5", square::E7, square::E5));
        history.push(half_move(Color::White, Slot::Knight2, "Nf3", square::G1, square::F3));
        history
    }

    #[test]
    fn test_turn_structure() {
        let history = sample();
        assert_eq!(history.turns().len(), 2);
        assert_eq!(history.len(), 3);
        assert_eq!(history.turns()[1].number, 2);
        assert!(history.turns()[1].black.is_none());
        assert_eq!(history.side_to_move(), Color::Black);
        assert_eq!(history.fullmoves(), 2);
        assert_eq!(history.latest().map(|h| h.to), Some(square::F3));
        assert_eq!(history.to_string(), "1. e4 e5 2. Nf3");
    }

    #[test]
    #[should_panic(expected = "out of turn")]
    fn test_push_out_of_turn() {
        let mut history = sample();
        history.push(half_move(Color::White, Slot::Pawn4, "d4", square::D2, square::D4));
    }

    #[test]
    fn test_amend_latest() {
        let mut history = sample();
        history.amend_latest(None, Some(Suffix::Check));
        assert_eq!(history.latest().map(ToString::to_string).as_deref(), Some("Nf3+"));

        let mut history = History::new();
        history.push(half_move(Color::White, Slot::Pawn1, "axb8", square::A7, square::B8));
        history.amend_latest(Some(Role::Knight), Some(Suffix::Checkmate));
        let latest = history.latest().expect("recorded");
        assert_eq!(latest.to_string(), "axb8=N#");
        assert!(latest.promoted);
    }

    #[test]
    fn test_rollback() {
        let mut history = sample();
        assert_eq!(history.rollback().map(|h| h.to_string()).as_deref(), Some("Nf3"));
        assert_eq!(history.turns().len(), 1);
        assert_eq!(history.side_to_move(), Color::White);
        assert_eq!(history.rollback().map(|h| h.to_string()).as_deref(), Some("e5"));
        assert_eq!(history.side_to_move(), Color::Black);
        assert_eq!(history.rollback().map(|h| h.to_string()).as_deref(), Some("e4"));
        assert!(history.is_empty());
        assert_eq!(history.rollback(), None);
    }

    #[test]
    fn test_bare_pawn_push() {
        let history = sample();
        let moves: Vec<_> = history.half_moves().map(HalfMove::is_bare_pawn_push).collect();
        assert_eq!(moves, [true, true, false]);
    }
}
