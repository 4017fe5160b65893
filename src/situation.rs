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

//! Check, checkmate and stalemate.

use tracing::trace;

use crate::{
    board::Board,
    color::Color,
    history::History,
    legality::{is_legal, Mode},
    piece::{PieceId, Slot},
    square::Square,
};

/// Whether the king of `color` is attacked.
///
/// A king standing still is legal exactly when no enemy piece attacks its
/// square.
pub fn king_in_check(board: &Board, history: &History, color: Color) -> bool {
    let king = PieceId::new(color, Slot::King);
    board
        .piece(king)
        .square()
        .is_some_and(|sq| !is_legal(board, history, king, sq, Mode::SELF_CHECK_ONLY))
}

/// The side whose king is attacked, if any.
///
/// # Panics
///
/// Panics if both kings are attacked. No sequence of legal moves leads
/// there.
pub fn checked_side(board: &Board, history: &History) -> Option<Color> {
    match (
        king_in_check(board, history, Color::White),
        king_in_check(board, history, Color::Black),
    ) {
        (true, true) => panic!("both kings are in check"),
        (true, false) => Some(Color::White),
        (false, true) => Some(Color::Black),
        (false, false) => None,
    }
}

/// Whether `color` has at least one move that passes [`is_legal()`] and
/// does not leave its own king attacked.
///
/// Every candidate is played on a scratch copy of the board and taken back
/// before the next one is tried.
pub fn has_legal_move(board: &Board, history: &History, color: Color) -> bool {
    let mut scratch = board.clone();
    for (id, _) in board.on_board(color) {
        for to in Square::all() {
            if !is_legal(board, history, id, to, Mode::empty()) {
                continue;
            }
            let Some(undo) = scratch.make_move(id, to) else {
                continue;
            };
            let safe = !king_in_check(&scratch, history, color);
            scratch.unmake_move(&undo);
            if safe {
                trace!(piece = %id, %to, "legal move found");
                return true;
            }
        }
    }
    false
}

pub fn is_checkmate(board: &Board, history: &History, color: Color) -> bool {
    king_in_check(board, history, color) && !has_legal_move(board, history, color)
}

pub fn is_stalemate(board: &Board, history: &History, color: Color) -> bool {
    !king_in_check(board, history, color) && !has_legal_move(board, history, color)
}
