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

//! Per-piece movement rules.
//!
//! [`is_legal()`] judges a single relocation against the movement rules of
//! the piece, board occupancy, and the history (for en passant). It does
//! not test whether the mover's own king is left in check, except that a
//! king may never step onto an attacked square. That final test is done by
//! simulating the move, see [`crate::situation`].

use bitflags::bitflags;
use tracing::trace;

use crate::{
    board::Board,
    castling_side::CastlingSide,
    color::Color,
    history::History,
    piece::{PieceId, Slot},
    role::Role,
    square::{Location, Square},
};

bitflags! {
    /// Relaxations of [`is_legal()`], used by the internal probes.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Mode: u8 {
        /// Asks whether the piece attacks the square: own pieces on the
        /// destination count as defended, kings do not test for safety,
        /// and pawns always attack diagonally.
        const IGNORE_COLOR = 1;
        /// Pawns only move diagonally.
        const PAWN_ATTACK_ONLY = 2;
        /// Treats every destination as adjacent to the king.
        const KING_NO_DISTANCE_LIMIT = 4;
        /// Asks whether the king could stand on the square. Allows the
        /// king's own square and friendly occupants.
        const SELF_CHECK_ONLY = 8;
    }
}

/// Whether `id` may move to `to`.
///
/// Captured pieces never move. Moving onto a friendly piece is illegal
/// unless `mode` asks for an attack or safety probe.
///
/// # Examples
///
/// ```
/// use arbiter::{legality::{is_legal, Mode}, square, Board, Color, History, PieceId, Slot};
///
/// let board = Board::new();
/// let history = History::new();
/// let knight = PieceId::new(Color::White, Slot::Knight2);
///
/// assert!(is_legal(&board, &history, knight, square::F3, Mode::empty()));
/// assert!(!is_legal(&board, &history, knight, square::E2, Mode::empty()));
/// ```
pub fn is_legal(board: &Board, history: &History, id: PieceId, to: Square, mode: Mode) -> bool {
    let piece = board.piece(id);
    let Some(from) = piece.square() else {
        return false;
    };
    if from == to && !mode.contains(Mode::SELF_CHECK_ONLY) {
        return false;
    }
    if !mode.intersects(Mode::IGNORE_COLOR | Mode::SELF_CHECK_ONLY)
        && board.color_at(to) == Some(id.color)
    {
        return false;
    }

    let df = i32::from(to.file()) - i32::from(from.file());
    let dr = i32::from(to.rank()) - i32::from(from.rank());

    match piece.role {
        Role::Pawn => is_legal_pawn(board, history, id, from, to, mode),
        Role::Knight => matches!((df.abs(), dr.abs()), (1, 2) | (2, 1)),
        Role::Bishop => is_diagonal(df, dr) && board.is_path_clear(from, to),
        Role::Rook => is_straight(df, dr) && board.is_path_clear(from, to),
        Role::Queen => {
            (is_diagonal(df, dr) || is_straight(df, dr)) && board.is_path_clear(from, to)
        }
        Role::King => {
            if mode.contains(Mode::KING_NO_DISTANCE_LIMIT) || (df.abs() <= 1 && dr.abs() <= 1) {
                mode.contains(Mode::IGNORE_COLOR)
                    || is_safe_for_king(board, history, id, from, to)
            } else if mode.intersects(Mode::IGNORE_COLOR | Mode::PAWN_ATTACK_ONLY) {
                // Castling never attacks.
                false
            } else {
                is_legal_castling(board, history, id, from, to)
            }
        }
    }
}

/// Whether the king could stand on `to`. The king is lifted off `from`
/// first, so a slider checking along the king's line still reaches the
/// squares behind it.
fn is_safe_for_king(
    board: &Board,
    history: &History,
    id: PieceId,
    from: Square,
    to: Square,
) -> bool {
    if from == to {
        return !is_attacked(board, history, to, !id.color);
    }
    let mut lifted = board.clone();
    lifted.relocate(id, Location::Captured);
    !is_attacked(&lifted, history, to, !id.color)
}

fn is_diagonal(df: i32, dr: i32) -> bool {
    df.abs() == dr.abs()
}

fn is_straight(df: i32, dr: i32) -> bool {
    df == 0 || dr == 0
}

/// Whether any piece of `by` attacks `sq`. A piece standing on `sq` itself
/// is not counted, since it would be captured.
pub fn is_attacked(board: &Board, history: &History, sq: Square, by: Color) -> bool {
    board
        .on_board(by)
        .filter(|&(_, from)| from != sq)
        .any(|(attacker, _)| {
            is_legal(
                board,
                history,
                attacker,
                sq,
                Mode::IGNORE_COLOR | Mode::PAWN_ATTACK_ONLY,
            )
        })
}

fn is_legal_pawn(
    board: &Board,
    history: &History,
    id: PieceId,
    from: Square,
    to: Square,
    mode: Mode,
) -> bool {
    let forward = id.color.forward();
    let df = i32::from(to.file()) - i32::from(from.file());
    let dr = i32::from(to.rank()) - i32::from(from.rank());

    if dr == forward && df == 0 {
        !mode.contains(Mode::PAWN_ATTACK_ONLY) && board.is_empty(to)
    } else if dr == forward && df.abs() == 1 {
        mode.intersects(Mode::IGNORE_COLOR | Mode::PAWN_ATTACK_ONLY)
            || board.color_at(to) == Some(!id.color)
            || (board.is_empty(to) && is_en_passant(board, history, id, from, to))
    } else if dr == 2 * forward && df == 0 {
        !mode.contains(Mode::PAWN_ATTACK_ONLY)
            && !board.piece(id).has_moved
            && board.is_path_clear(from, to)
            && board.is_empty(to)
    } else {
        false
    }
}

/// A pawn on its fifth rank may capture diagonally onto an empty square if
/// the opponent's latest half-move was a two-square advance of the pawn it
/// passes, and no earlier opponent pawn ever advanced onto that empty
/// square.
fn is_en_passant(board: &Board, history: &History, id: PieceId, from: Square, to: Square) -> bool {
    if from.rank() != id.color.en_passant_rank() {
        return false;
    }
    let passed = Square::from_coords(to.file(), from.rank());
    let Some(latest) = history.latest() else {
        return false;
    };

    let pushed_past = latest.color() != id.color
        && latest.is_bare_pawn_push()
        && latest.to == passed
        && latest.from.rank().distance(latest.to.rank()) == 2
        && board
            .occupant(passed)
            .is_some_and(|victim| victim.color != id.color && board.piece(victim).role == Role::Pawn);

    let result = pushed_past
        && !history
            .half_moves()
            .any(|h| h.color() != id.color && h.is_bare_pawn_push() && h.to == to);

    trace!(pawn = %id, %to, result, "en passant");
    result
}

/// The king has not moved and steps two files towards an unmoved rook of
/// the same side on its rank, with nothing in between, and neither starts
/// on, passes through, nor lands on an attacked square.
fn is_legal_castling(
    board: &Board,
    history: &History,
    id: PieceId,
    from: Square,
    to: Square,
) -> bool {
    let Some(side) = CastlingSide::from_king_move(from, to) else {
        return false;
    };
    if board.piece(id).has_moved || to.file() != side.king_to_file() {
        return false;
    }

    let rook = board.piece(PieceId::new(id.color, side.rook_slot()));
    let Some(rook_from) = rook.square() else {
        return false;
    };
    if rook.has_moved || rook.role != Role::Rook || rook_from.rank() != from.rank() {
        return false;
    }
    if !board.is_path_clear(from, rook_from) {
        return false;
    }

    let king = PieceId::new(id.color, Slot::King);
    let mut path = Board::between(from, to);
    path.push(from);
    path.push(to);
    path.into_iter().all(|sq| {
        is_legal(
            board,
            history,
            king,
            sq,
            Mode::KING_NO_DISTANCE_LIMIT | Mode::SELF_CHECK_ONLY,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square;

    fn white(slot: Slot) -> PieceId {
        PieceId::new(Color::White, slot)
    }

    fn black(slot: Slot) -> PieceId {
        PieceId::new(Color::Black, slot)
    }

    #[test]
    fn test_opening_moves() {
        let board = Board::new();
        let history = History::new();
        let legal = |id, to| is_legal(&board, &history, id, to, Mode::empty());

        assert!(legal(white(Slot::Pawn5), square::E3));
        assert!(legal(white(Slot::Pawn5), square::E4));
        assert!(!legal(white(Slot::Pawn5), square::E5));
        assert!(!legal(white(Slot::Pawn5), square::D3));
        assert!(legal(black(Slot::Knight1), square::C6));
        assert!(!legal(white(Slot::Bishop2), square::C4));
        assert!(!legal(white(Slot::Rook1), square::A3));
        assert!(!legal(white(Slot::Queen), square::D1));
        assert!(!legal(white(Slot::King), square::G1));
    }

    #[test]
    fn test_sliders() {
        let mut board = Board::new();
        let history = History::new();
        board.relocate(white(Slot::Pawn5), Location::On(square::E4));
        board.relocate(white(Slot::Pawn4), Location::Captured);

        let legal = |board: &Board, id, to| is_legal(board, &history, id, to, Mode::empty());
        assert!(legal(&board, white(Slot::Bishop2), square::A6));
        assert!(legal(&board, white(Slot::Queen), square::H5));
        assert!(legal(&board, white(Slot::Queen), square::D7));
        assert!(!legal(&board, white(Slot::Queen), square::D8));
        assert!(!legal(&board, white(Slot::Queen), square::E3));
        assert!(!legal(&board, white(Slot::Bishop1), square::C3));
        assert!(legal(&board, white(Slot::Bishop1), square::H6));
    }

    #[test]
    fn test_attack_probe() {
        let mut board = Board::new();
        let history = History::new();
        assert!(is_attacked(&board, &history, square::F3, Color::White));
        assert!(is_attacked(&board, &history, square::D2, Color::White));
        assert!(!is_attacked(&board, &history, square::E4, Color::White));
        assert!(!is_attacked(&board, &history, square::E5, Color::White));

        board.relocate(black(Slot::Queen), Location::On(square::H4));
        board.relocate(white(Slot::Pawn6), Location::Captured);
        assert!(is_attacked(&board, &history, square::E1, Color::Black));
        assert!(!is_legal(
            &board,
            &history,
            white(Slot::King),
            square::E1,
            Mode::SELF_CHECK_ONLY
        ));
        assert!(!is_legal(&board, &history, white(Slot::King), square::F2, Mode::empty()));
    }

    #[test]
    fn test_king_may_capture_undefended() {
        let mut board = Board::new();
        let history = History::new();
        board.relocate(white(Slot::Pawn5), Location::Captured);
        board.relocate(black(Slot::Knight1), Location::On(square::E2));
        assert!(is_legal(&board, &history, white(Slot::King), square::E2, Mode::empty()));

        board.relocate(black(Slot::Bishop2), Location::On(square::B5));
        board.relocate(white(Slot::Pawn4), Location::Captured);
        assert!(is_attacked(&board, &history, square::E2, Color::Black));
        assert!(!is_legal(&board, &history, white(Slot::King), square::E2, Mode::empty()));
    }

    #[test]
    fn test_king_cannot_retreat_along_checking_line() {
        let mut board = Board::new();
        let history = History::new();
        for id in PieceId::all().filter(|id| id.slot != Slot::King) {
            board.relocate(id, Location::Captured);
        }
        let king = white(Slot::King);
        board.relocate(king, Location::On(square::E2));
        board.relocate(black(Slot::Queen), Location::On(square::F2));

        let legal = |to| is_legal(&board, &history, king, to, Mode::empty());
        assert!(!legal(square::D2));
        assert!(!legal(square::E1));
        assert!(!legal(square::E3));
        assert!(legal(square::D3));
        assert!(legal(square::F2));
    }

    #[test]
    fn test_double_step_needs_empty_destination() {
        let mut board = Board::new();
        let history = History::new();
        board.relocate(black(Slot::Pawn5), Location::On(square::E4));
        assert!(!is_legal(&board, &history, white(Slot::Pawn5), square::E4, Mode::empty()));
        assert!(is_legal(&board, &history, white(Slot::Pawn5), square::E3, Mode::empty()));
        assert!(!is_legal(&board, &history, white(Slot::Pawn4), square::E3, Mode::empty()));
        assert!(is_legal(&board, &history, white(Slot::Pawn4), square::D4, Mode::empty()));
    }

    #[test]
    fn test_castling_gates() {
        let mut board = Board::new();
        let history = History::new();
        let king = white(Slot::King);
        assert!(!is_legal(&board, &history, king, square::G1, Mode::empty()));

        board.relocate(white(Slot::Bishop2), Location::Captured);
        board.relocate(white(Slot::Knight2), Location::Captured);
        assert!(is_legal(&board, &history, king, square::G1, Mode::empty()));
        assert!(!is_legal(&board, &history, king, square::C1, Mode::empty()));

        board.relocate(white(Slot::Knight1), Location::Captured);
        board.relocate(white(Slot::Bishop1), Location::Captured);
        assert!(!is_legal(&board, &history, king, square::C1, Mode::empty()));
        board.relocate(white(Slot::Queen), Location::Captured);
        assert!(is_legal(&board, &history, king, square::C1, Mode::empty()));

        board.relocate(black(Slot::Knight2), Location::On(square::A5));
        assert!(is_legal(&board, &history, king, square::G1, Mode::empty()));
        assert!(is_legal(&board, &history, king, square::C1, Mode::empty()));
        // Destination attacked.
        board.relocate(black(Slot::Knight2), Location::On(square::H3));
        assert!(!is_legal(&board, &history, king, square::G1, Mode::empty()));
        assert!(is_legal(&board, &history, king, square::C1, Mode::empty()));
        // Passed square attacked.
        board.relocate(black(Slot::Knight2), Location::On(square::E3));
        assert!(!is_legal(&board, &history, king, square::G1, Mode::empty()));
        assert!(!is_legal(&board, &history, king, square::C1, Mode::empty()));
        // In check.
        board.relocate(black(Slot::Knight2), Location::On(square::D3));
        assert!(!is_legal(&board, &history, king, square::G1, Mode::empty()));
        assert!(!is_legal(&board, &history, king, square::C1, Mode::empty()));

        board.relocate(black(Slot::Knight2), Location::Captured);
        board.set_moved(white(Slot::Rook2), true);
        assert!(!is_legal(&board, &history, king, square::G1, Mode::empty()));
        assert!(is_legal(&board, &history, king, square::C1, Mode::empty()));
        board.set_moved(king, true);
        assert!(!is_legal(&board, &history, king, square::C1, Mode::empty()));
    }

    #[test]
    fn test_captured_piece_never_moves() {
        let mut board = Board::new();
        let history = History::new();
        board.relocate(white(Slot::Knight1), Location::Captured);
        assert!(!is_legal(&board, &history, white(Slot::Knight1), square::C3, Mode::empty()));
    }
}
