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

use crate::{
    color::Color,
    piece::Slot,
    square::{File, Square},
};

/// `KingSide` (O-O) or `QueenSide` (O-O-O).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    #[inline]
    pub const fn from_king_side(king_side: bool) -> CastlingSide {
        if king_side {
            CastlingSide::KingSide
        } else {
            CastlingSide::QueenSide
        }
    }

    /// The side a two-file king move from `from` to `to` castles towards,
    /// or `None` if the move is not shaped like castling.
    pub fn from_king_move(from: Square, to: Square) -> Option<CastlingSide> {
        if from.rank() != to.rank() || from.file().distance(to.file()) != 2 {
            return None;
        }
        Some(CastlingSide::from_king_side(to.file() > from.file()))
    }

    pub const fn king_to_file(self) -> File {
        match self {
            CastlingSide::KingSide => File::G,
            CastlingSide::QueenSide => File::C,
        }
    }

    pub const fn rook_to_file(self) -> File {
        match self {
            CastlingSide::KingSide => File::F,
            CastlingSide::QueenSide => File::D,
        }
    }

    /// File delta of the king when castling to this side.
    pub const fn king_delta(self) -> i32 {
        match self {
            CastlingSide::KingSide => 2,
            CastlingSide::QueenSide => -2,
        }
    }

    pub fn king_to(self, color: Color) -> Square {
        Square::from_coords(self.king_to_file(), color.backrank())
    }

    pub fn rook_to(self, color: Color) -> Square {
        Square::from_coords(self.rook_to_file(), color.backrank())
    }

    /// The rook that castles with the king on this side.
    pub const fn rook_slot(self) -> Slot {
        match self {
            CastlingSide::KingSide => Slot::Rook2,
            CastlingSide::QueenSide => Slot::Rook1,
        }
    }
}
