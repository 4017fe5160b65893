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

use std::fmt::{self, Write as _};

use arrayvec::ArrayVec;

use crate::{
    castling_side::CastlingSide,
    color::{ByColor, Color},
    piece::{Piece, PieceId, Slot},
    role::Role,
    square::{File, Location, Rank, Square},
};

/// Piece records of both sides, and a square index kept in sync with them.
///
/// Every piece on the board occupies exactly the index entry of its square,
/// and every non-empty index entry names a piece located there.
#[derive(Clone, Eq, PartialEq)]
pub struct Board {
    pieces: ByColor<[Piece; 16]>,
    index: [Option<PieceId>; 64],
}

/// What a mechanical move changed, so that it can be reverted.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Undo {
    pub mover: PieceId,
    pub from: Square,
    pub to: Square,
    /// The captured piece and the square it was taken on. The square differs
    /// from `to` for en passant.
    pub captured: Option<(PieceId, Square)>,
    /// The rook and its origin and destination, if the move castled.
    pub castling: Option<(PieceId, Square, Square)>,
}

impl Undo {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn is_en_passant(&self) -> bool {
        self.captured.is_some_and(|(_, sq)| sq != self.to)
    }
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Board {
        let pieces = ByColor::new_with(|color| Slot::ALL.map(|slot| Piece::home(color, slot)));
        let mut index = [None; 64];
        for id in PieceId::all() {
            index[id.slot.home_square(id.color).index()] = Some(id);
        }
        Board { pieces, index }
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.color][id.slot as usize]
    }

    #[inline]
    fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.color][id.slot as usize]
    }

    /// All 16 records of a side, including captured pieces.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        Slot::ALL
            .into_iter()
            .zip(self.pieces[color].iter())
            .map(move |(slot, piece)| (PieceId::new(color, slot), piece))
    }

    /// Pieces of a side that are still on the board, with their squares.
    pub fn on_board(&self, color: Color) -> impl Iterator<Item = (PieceId, Square)> + '_ {
        self.pieces(color)
            .filter_map(|(id, piece)| piece.square().map(|sq| (id, sq)))
    }

    #[inline]
    pub fn occupant(&self, sq: Square) -> Option<PieceId> {
        self.index[sq.index()]
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.occupant(sq).map(|id| self.piece(id))
    }

    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        self.occupant(sq).map(|id| id.color)
    }

    #[inline]
    pub fn role_at(&self, sq: Square) -> Option<Role> {
        self.piece_at(sq).map(|piece| piece.role)
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.occupant(sq).is_none()
    }

    /// The king of a side. Kings are never captured.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.piece(PieceId::new(color, Slot::King)).square()
    }

    /// Squares strictly between `a` and `b` along a rank, file or diagonal.
    /// Empty if the squares are adjacent or not aligned.
    pub fn between(a: Square, b: Square) -> ArrayVec<Square, 6> {
        let df = i32::from(b.file()) - i32::from(a.file());
        let dr = i32::from(b.rank()) - i32::from(a.rank());
        let mut squares = ArrayVec::new();
        if (df == 0 && dr == 0) || (df != 0 && dr != 0 && df.abs() != dr.abs()) {
            return squares;
        }
        let (step_f, step_r) = (df.signum(), dr.signum());
        let mut sq = a;
        while let Some(next) = sq.offset(step_f, step_r) {
            if next == b {
                break;
            }
            squares.push(next);
            sq = next;
        }
        squares
    }

    /// Whether no piece stands strictly between `a` and `b`.
    pub fn is_path_clear(&self, a: Square, b: Square) -> bool {
        Board::between(a, b).into_iter().all(|sq| self.is_empty(sq))
    }

    pub(crate) fn relocate(&mut self, id: PieceId, to: Location) {
        if let Location::On(sq) = self.piece(id).location {
            if self.index[sq.index()] == Some(id) {
                self.index[sq.index()] = None;
            }
        }
        self.piece_mut(id).location = to;
        if let Location::On(sq) = to {
            debug_assert!(
                self.index[sq.index()].is_none(),
                "relocating {id:?} onto occupied square {sq}"
            );
            self.index[sq.index()] = Some(id);
        }
    }

    pub(crate) fn set_role(&mut self, id: PieceId, role: Role) {
        self.piece_mut(id).role = role;
    }

    pub(crate) fn set_moved(&mut self, id: PieceId, has_moved: bool) {
        self.piece_mut(id).has_moved = has_moved;
    }

    /// Moves a piece onto `sq`, capturing whatever else stands there.
    /// Returns the captured piece.
    pub(crate) fn place(&mut self, id: PieceId, sq: Square) -> Option<PieceId> {
        let displaced = self.occupant(sq).filter(|&other| other != id);
        if let Some(other) = displaced {
            self.relocate(other, Location::Captured);
        }
        self.relocate(id, Location::On(sq));
        displaced
    }

    /// Carries out a move without judging it: captures an enemy on the
    /// destination (or the pawn passed by an en passant capture) and brings
    /// the rook along when an unmoved king steps two files.
    ///
    /// Returns `None` without touching the board if the piece is off the
    /// board or the destination holds a friendly piece.
    pub(crate) fn make_move(&mut self, id: PieceId, to: Square) -> Option<Undo> {
        let piece = *self.piece(id);
        let from = piece.square()?;
        if from == to {
            return None;
        }

        let captured = match self.occupant(to) {
            Some(victim) if victim.color == id.color => return None,
            Some(victim) => Some((victim, to)),
            None if piece.role == Role::Pawn && from.file() != to.file() => {
                let passed = Square::from_coords(to.file(), from.rank());
                self.occupant(passed)
                    .filter(|victim| {
                        victim.color != id.color && self.piece(*victim).role == Role::Pawn
                    })
                    .map(|victim| (victim, passed))
            }
            None => None,
        };

        let castling = if piece.role == Role::King && !piece.has_moved {
            CastlingSide::from_king_move(from, to).and_then(|side| {
                let rook = PieceId::new(id.color, side.rook_slot());
                let rook_from = self.piece(rook).square()?;
                let rook_to = Square::from_coords(side.rook_to_file(), from.rank());
                self.is_empty(rook_to).then_some((rook, rook_from, rook_to))
            })
        } else {
            None
        };

        if let Some((victim, _)) = captured {
            self.relocate(victim, Location::Captured);
        }
        self.relocate(id, Location::On(to));
        if let Some((rook, _, rook_to)) = castling {
            self.relocate(rook, Location::On(rook_to));
        }

        Some(Undo {
            mover: id,
            from,
            to,
            captured,
            castling,
        })
    }

    /// Whether [`Board::unmake_move()`] can revert `undo` on this board:
    /// the mover and the castled rook still stand where the move left them,
    /// and every square they and the captured piece return to is free.
    ///
    /// Setup edits made after the move can break this.
    pub fn can_unmake(&self, undo: &Undo) -> bool {
        self.piece(undo.mover).location == Location::On(undo.to)
            && self.is_empty(undo.from)
            && undo.castling.is_none_or(|(rook, rook_from, rook_to)| {
                self.piece(rook).location == Location::On(rook_to) && self.is_empty(rook_from)
            })
            && undo.captured.is_none_or(|(victim, sq)| {
                // The mover vacates the destination of an ordinary capture.
                self.piece(victim).location.is_captured() && (sq == undo.to || self.is_empty(sq))
            })
    }

    /// Reverts [`Board::make_move()`]. Roles and moved flags are not
    /// touched.
    pub(crate) fn unmake_move(&mut self, undo: &Undo) {
        debug_assert!(self.can_unmake(undo), "cannot unmake {undo:?}");
        self.relocate(undo.mover, Location::On(undo.from));
        if let Some((rook, rook_from, _)) = undo.castling {
            self.relocate(rook, Location::On(rook_from));
        }
        if let Some((victim, sq)) = undo.captured {
            self.relocate(victim, Location::On(sq));
        }
    }

    /// Checks that piece records and the square index agree.
    pub fn is_consistent(&self) -> bool {
        let records_agree = Color::ALL.into_iter().all(|color| {
            self.on_board(color)
                .all(|(id, sq)| self.index[sq.index()] == Some(id))
        });
        let index_agrees = Square::all().all(|sq| {
            self.occupant(sq)
                .is_none_or(|id| self.piece(id).location == Location::On(sq))
        });
        records_agree && index_agrees
    }

    /// Read-only copy of all 32 piece records.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pieces: Color::ALL
                .into_iter()
                .flat_map(|color| self.pieces(color))
                .map(|(id, piece)| PieceView {
                    id,
                    role: piece.role,
                    has_moved: piece.has_moved,
                    location: piece.location,
                })
                .collect(),
        }
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            for sq in Square::all().filter(|sq| sq.rank() == rank) {
                f.write_char(self.piece_at(sq).map_or('.', Piece::char))?;
                f.write_char(if sq.file() < File::H { ' ' } else { '\n' })?;
            }
        }
        Ok(())
    }
}

/// One piece as seen from outside.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceView {
    pub id: PieceId,
    pub role: Role,
    pub has_moved: bool,
    pub location: Location,
}

/// Read-only copy of the board, White slots first.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub pieces: Vec<PieceView>,
}

impl Snapshot {
    pub fn get(&self, id: PieceId) -> &PieceView {
        &self.pieces[usize::from(id.index())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square;

    fn id(color: Color, slot: Slot) -> PieceId {
        PieceId::new(color, slot)
    }

    #[test]
    fn test_starting_position() {
        let board = Board::new();
        assert!(board.is_consistent());
        assert_eq!(board.role_at(square::A2), Some(Role::Pawn));
        assert_eq!(board.role_at(square::B1), Some(Role::Knight));
        assert_eq!(board.color_at(square::D8), Some(Color::Black));
        assert_eq!(board.occupant(square::E4), None);
        assert_eq!(board.king_square(Color::White), Some(square::E1));
        assert_eq!(board.on_board(Color::Black).count(), 16);
    }

    #[test]
    fn test_debug_grid() {
        let grid = format!("{:?}", Board::new());
        assert_eq!(grid.lines().next(), Some("r n b q k b n r"));
        assert_eq!(grid.lines().nth(4), Some(". . . . . . . ."));
        assert_eq!(grid.lines().last(), Some("R N B Q K B N R"));
    }

    #[test]
    fn test_between() {
        assert_eq!(
            Board::between(square::A1, square::D4).as_slice(),
            &[square::B2, square::C3]
        );
        assert_eq!(
            Board::between(square::E1, square::H1).as_slice(),
            &[square::F1, square::G1]
        );
        assert!(Board::between(square::E1, square::E2).is_empty());
        assert!(Board::between(square::B1, square::C3).is_empty());

        let board = Board::new();
        assert!(!board.is_path_clear(square::D1, square::D4));
        assert!(board.is_path_clear(square::D2, square::D7));
    }

    #[test]
    fn test_make_unmake_capture() {
        let mut board = Board::new();
        let queen = id(Color::White, Slot::Queen);
        let pawn = id(Color::Black, Slot::Pawn4);
        board.relocate(pawn, Location::On(square::D3));
        board.relocate(id(Color::White, Slot::Pawn4), Location::Captured);
        let before = board.clone();

        let undo = board.make_move(queen, square::D3).expect("queen on board");
        assert_eq!(undo.captured, Some((pawn, square::D3)));
        assert_eq!(board.occupant(square::D3), Some(queen));
        assert!(board.piece(pawn).location.is_captured());
        assert!(board.is_consistent());

        board.unmake_move(&undo);
        assert_eq!(board, before);
    }

    #[test]
    fn test_make_move_refuses_friendly_destination() {
        let mut board = Board::new();
        let before = board.clone();
        assert_eq!(board.make_move(id(Color::White, Slot::Rook1), square::A2), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_castling_brings_rook() {
        let mut board = Board::new();
        board.relocate(id(Color::White, Slot::Bishop2), Location::Captured);
        board.relocate(id(Color::White, Slot::Knight2), Location::Captured);
        let before = board.clone();

        let undo = board
            .make_move(id(Color::White, Slot::King), square::G1)
            .expect("king on board");
        assert!(undo.castling.is_some());
        assert_eq!(board.occupant(square::F1), Some(id(Color::White, Slot::Rook2)));
        assert!(board.is_empty(square::H1));

        board.unmake_move(&undo);
        assert_eq!(board, before);
    }

    #[test]
    fn test_can_unmake_after_edits() {
        let mut board = Board::new();
        let knight = id(Color::White, Slot::Knight2);
        let undo = board.make_move(knight, square::F3).expect("knight on board");
        assert!(board.can_unmake(&undo));

        // Origin square taken.
        let mut edited = board.clone();
        edited.place(id(Color::White, Slot::Queen), square::G1);
        assert!(!edited.can_unmake(&undo));

        // Mover no longer on its destination.
        let mut edited = board.clone();
        edited.relocate(knight, Location::On(square::H3));
        assert!(!edited.can_unmake(&undo));

        let mut board = Board::new();
        let queen = id(Color::White, Slot::Queen);
        let pawn = id(Color::Black, Slot::Pawn4);
        board.relocate(pawn, Location::On(square::D3));
        board.relocate(id(Color::White, Slot::Pawn4), Location::Captured);
        let undo = board.make_move(queen, square::D3).expect("queen on board");
        assert!(board.can_unmake(&undo));

        // Captured piece back on the board.
        let mut edited = board.clone();
        edited.relocate(pawn, Location::On(square::D4));
        assert!(!edited.can_unmake(&undo));
    }

    #[test]
    fn test_en_passant_capture() {
        let mut board = Board::new();
        let white = id(Color::White, Slot::Pawn5);
        let black = id(Color::Black, Slot::Pawn4);
        board.relocate(white, Location::On(square::E5));
        board.relocate(black, Location::On(square::D5));

        let undo = board.make_move(white, square::D6).expect("pawn on board");
        assert!(undo.is_en_passant());
        assert!(board.piece(black).location.is_captured());
        assert!(board.is_empty(square::D5));
        board.unmake_move(&undo);
        assert_eq!(board.occupant(square::D5), Some(black));
        assert!(board.is_consistent());
    }

    #[test]
    fn test_place_captures_occupant() {
        let mut board = Board::new();
        let pawn = id(Color::White, Slot::Pawn1);
        let displaced = board.place(pawn, square::H7);
        assert_eq!(displaced, Some(id(Color::Black, Slot::Pawn8)));
        assert!(board.is_empty(square::A2));
        assert!(board.is_consistent());

        let snapshot = board.snapshot();
        assert_eq!(snapshot.pieces.len(), 32);
        assert_eq!(snapshot.get(pawn).location, Location::On(square::H7));
        assert!(snapshot.get(id(Color::Black, Slot::Pawn8)).location.is_captured());
    }
}
