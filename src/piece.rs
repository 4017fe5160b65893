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

//! Piece identities and per-piece records.

use std::{error::Error, fmt, str::FromStr};

use crate::{
    color::Color,
    role::Role,
    square::{File, Location, Square},
};

/// One of the 16 starting-position identities of a side.
///
/// The slot never changes during a game, even when the piece in it is
/// promoted or captured.
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum Slot {
    Pawn1 = 0,
    Pawn2,
    Pawn3,
    Pawn4,
    Pawn5,
    Pawn6,
    Pawn7,
    Pawn8,
    Rook1,
    Knight1,
    Bishop1,
    Queen,
    King,
    Bishop2,
    Knight2,
    Rook2,
}

impl Slot {
    /// The role the piece in this slot starts the game with.
    pub const fn home_role(self) -> Role {
        match self {
            Slot::Rook1 | Slot::Rook2 => Role::Rook,
            Slot::Knight1 | Slot::Knight2 => Role::Knight,
            Slot::Bishop1 | Slot::Bishop2 => Role::Bishop,
            Slot::Queen => Role::Queen,
            Slot::King => Role::King,
            _ => Role::Pawn,
        }
    }

    pub const fn home_file(self) -> File {
        File::ALL[self as usize % 8]
    }

    /// # Examples
    ///
    /// ```
    /// use arbiter::{square, Color, Slot};
    ///
    /// assert_eq!(Slot::Pawn5.home_square(Color::White), square::E2);
    /// assert_eq!(Slot::Knight1.home_square(Color::Black), square::B8);
    /// ```
    pub fn home_square(self, color: Color) -> Square {
        let rank = if (self as u8) < 8 {
            color.pawn_rank()
        } else {
            color.backrank()
        };
        Square::from_coords(self.home_file(), rank)
    }

    pub const ALL: [Slot; 16] = [
        Slot::Pawn1,
        Slot::Pawn2,
        Slot::Pawn3,
        Slot::Pawn4,
        Slot::Pawn5,
        Slot::Pawn6,
        Slot::Pawn7,
        Slot::Pawn8,
        Slot::Rook1,
        Slot::Knight1,
        Slot::Bishop1,
        Slot::Queen,
        Slot::King,
        Slot::Bishop2,
        Slot::Knight2,
        Slot::Rook2,
    ];
}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Slot {}

/// Error when parsing an invalid piece index.
#[derive(Clone, Debug)]
pub struct ParsePieceIdError;

impl fmt::Display for ParsePieceIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid piece index (expected 0 to 31)")
    }
}

impl Error for ParsePieceIdError {}

/// Stable identity of a piece: its side and its starting slot.
///
/// Numbered 0 to 15 for White and 16 to 31 for Black, in slot order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct PieceId {
    pub color: Color,
    pub slot: Slot,
}

impl PieceId {
    #[inline]
    pub const fn new(color: Color, slot: Slot) -> PieceId {
        PieceId { color, slot }
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.color as u8 * 16 + self.slot as u8
    }

    pub const fn from_index(index: u8) -> Option<PieceId> {
        if index >= 32 {
            return None;
        }
        let color = if index < 16 { Color::White } else { Color::Black };
        Some(PieceId::new(color, Slot::ALL[(index % 16) as usize]))
    }

    /// Parses a decimal piece index.
    ///
    /// # Errors
    ///
    /// Returns [`ParsePieceIdError`] if the input is not a number from 0
    /// to 31.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbiter::{Color, PieceId, Slot};
    ///
    /// let id = PieceId::from_ascii(b"28")?;
    /// assert_eq!(id, PieceId::new(Color::Black, Slot::King));
    /// # Ok::<_, arbiter::ParsePieceIdError>(())
    /// ```
    pub fn from_ascii(s: &[u8]) -> Result<PieceId, ParsePieceIdError> {
        btoi::btou::<u8>(s)
            .ok()
            .and_then(PieceId::from_index)
            .ok_or(ParsePieceIdError)
    }

    /// All 32 identities, White first.
    pub fn all() -> impl Iterator<Item = PieceId> {
        Color::ALL
            .into_iter()
            .flat_map(|color| Slot::ALL.into_iter().map(move |slot| PieceId::new(color, slot)))
    }
}

impl FromStr for PieceId {
    type Err = ParsePieceIdError;

    fn from_str(s: &str) -> Result<PieceId, ParsePieceIdError> {
        PieceId::from_ascii(s.as_bytes())
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// The mutable record of a piece.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    pub color: Color,
    pub role: Role,
    pub has_moved: bool,
    pub location: Location,
}

impl Piece {
    /// The piece standing in `slot` before the first move.
    pub fn home(color: Color, slot: Slot) -> Piece {
        Piece {
            color,
            role: slot.home_role(),
            has_moved: false,
            location: Location::On(slot.home_square(color)),
        }
    }

    #[inline]
    pub fn square(&self) -> Option<Square> {
        self.location.square()
    }

    /// Uppercase letter for White, lowercase for Black.
    pub fn char(&self) -> char {
        self.color.fold(self.role.upper_char(), self.role.char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square;

    #[test]
    fn test_home_layout() {
        assert_eq!(Slot::Rook1.home_square(Color::White), square::A1);
        assert_eq!(Slot::Queen.home_square(Color::White), square::D1);
        assert_eq!(Slot::King.home_square(Color::Black), square::E8);
        assert_eq!(Slot::Rook2.home_square(Color::Black), square::H8);
        assert_eq!(Slot::Pawn8.home_square(Color::Black), square::H7);
        assert_eq!(Slot::Bishop2.home_role(), Role::Bishop);
        assert_eq!(Slot::Pawn3.home_role(), Role::Pawn);
    }

    #[test]
    fn test_index() {
        for (i, id) in PieceId::all().enumerate() {
            assert_eq!(usize::from(id.index()), i);
            assert_eq!(PieceId::from_index(id.index()), Some(id));
        }
        assert_eq!(PieceId::from_index(32), None);
    }

    #[test]
    fn test_from_ascii() {
        assert_eq!(
            "0".parse::<PieceId>().ok(),
            Some(PieceId::new(Color::White, Slot::Pawn1))
        );
        assert_eq!(
            "31".parse::<PieceId>().ok(),
            Some(PieceId::new(Color::Black, Slot::Rook2))
        );
        assert!("32".parse::<PieceId>().is_err());
        assert!("-1".parse::<PieceId>().is_err());
        assert!("".parse::<PieceId>().is_err());
        assert!("k".parse::<PieceId>().is_err());
    }

    #[test]
    fn test_piece_char() {
        let knight = Piece::home(Color::Black, Slot::Knight2);
        assert_eq!(knight.char(), 'n');
        assert_eq!(knight.square(), Some(square::G8));
        assert_eq!(Piece::home(Color::White, Slot::Queen).char(), 'Q');
    }
}
