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

use std::{error::Error, fmt, num, str::FromStr};

use crate::util::overflow_error;

/// A file of the chessboard, `A` to `H`.
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum File {
    A = 0,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl File {
    pub const fn from_char(ch: char) -> Option<File> {
        match ch {
            'a' => Some(File::A),
            'b' => Some(File::B),
            'c' => Some(File::C),
            'd' => Some(File::D),
            'e' => Some(File::E),
            'f' => Some(File::F),
            'g' => Some(File::G),
            'h' => Some(File::H),
            _ => None,
        }
    }

    #[inline]
    pub const fn char(self) -> char {
        (b'a' + self as u8) as char
    }

    /// The file `delta` files to the right, if it is on the board.
    #[inline]
    pub fn offset(self, delta: i32) -> Option<File> {
        File::try_from(i32::from(self) + delta).ok()
    }

    #[inline]
    pub fn distance(self, other: File) -> u32 {
        i32::from(self).abs_diff(i32::from(other))
    }

    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];
}

/// A rank of the chessboard, `First` to `Eighth`.
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum Rank {
    First = 0,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
}

impl Rank {
    pub const fn from_char(ch: char) -> Option<Rank> {
        match ch {
            '1' => Some(Rank::First),
            '2' => Some(Rank::Second),
            '3' => Some(Rank::Third),
            '4' => Some(Rank::Fourth),
            '5' => Some(Rank::Fifth),
            '6' => Some(Rank::Sixth),
            '7' => Some(Rank::Seventh),
            '8' => Some(Rank::Eighth),
            _ => None,
        }
    }

    #[inline]
    pub const fn char(self) -> char {
        (b'1' + self as u8) as char
    }

    /// The rank `delta` ranks up (towards Black), if it is on the board.
    #[inline]
    pub fn offset(self, delta: i32) -> Option<Rank> {
        Rank::try_from(i32::from(self) + delta).ok()
    }

    #[inline]
    pub fn distance(self, other: Rank) -> u32 {
        i32::from(self).abs_diff(i32::from(other))
    }

    pub const ALL: [Rank; 8] = [
        Rank::First,
        Rank::Second,
        Rank::Third,
        Rank::Fourth,
        Rank::Fifth,
        Rank::Sixth,
        Rank::Seventh,
        Rank::Eighth,
    ];
}

macro_rules! coord_int_impls {
    ($coord:ident, $($t:ty)+) => {
        $(impl From<$coord> for $t {
            #[inline]
            fn from(coord: $coord) -> $t {
                coord as $t
            }
        }

        impl TryFrom<$t> for $coord {
            type Error = num::TryFromIntError;

            #[inline]
            fn try_from(value: $t) -> Result<$coord, Self::Error> {
                if (0..8).contains(&value) {
                    Ok($coord::ALL[value as usize])
                } else {
                    Err(overflow_error())
                }
            }
        })+
    }
}

coord_int_impls! { File, u8 i8 u16 i16 u32 i32 u64 i64 usize isize }
coord_int_impls! { Rank, u8 i8 u16 i16 u32 i32 u64 i64 usize isize }

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for File {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Rank {}

/// Error when parsing an invalid square name.
#[derive(Clone, Debug)]
pub struct ParseSquareError;

impl fmt::Display for ParseSquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid square name")
    }
}

impl Error for ParseSquareError {}

/// A square of the chessboard, packed as `file + 8 * rank`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Square(u8);

impl Square {
    #[inline]
    pub const fn from_coords(file: File, rank: Rank) -> Square {
        Square(file as u8 | ((rank as u8) << 3))
    }

    /// Parses a square name like `e4`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseSquareError`] if the input is not exactly a file
    /// letter followed by a rank digit.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbiter::{File, Rank, Square};
    ///
    /// let sq = Square::from_ascii(b"e4")?;
    /// assert_eq!(sq, Square::from_coords(File::E, Rank::Fourth));
    /// # Ok::<_, arbiter::ParseSquareError>(())
    /// ```
    pub fn from_ascii(s: &[u8]) -> Result<Square, ParseSquareError> {
        match *s {
            [file, rank] => Ok(Square::from_coords(
                File::from_char(char::from(file)).ok_or(ParseSquareError)?,
                Rank::from_char(char::from(rank)).ok_or(ParseSquareError)?,
            )),
            _ => Err(ParseSquareError),
        }
    }

    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 & 7) as usize]
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 >> 3) as usize]
    }

    /// Index from 0 (`a1`) to 63 (`h8`).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The square `df` files to the right and `dr` ranks up, if it is
    /// still on the board.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbiter::square;
    ///
    /// assert_eq!(square::E2.offset(0, 2), Some(square::E4));
    /// assert_eq!(square::H1.offset(1, 0), None);
    /// ```
    #[inline]
    pub fn offset(self, df: i32, dr: i32) -> Option<Square> {
        Some(Square::from_coords(
            self.file().offset(df)?,
            self.rank().offset(dr)?,
        ))
    }

    /// Light squares are those where file and rank indices have different
    /// parity. `a1` is dark.
    #[inline]
    pub fn is_light(self) -> bool {
        (u32::from(self.file()) + u32::from(self.rank())) % 2 == 1
    }

    /// Chebyshev distance, the number of king steps between two squares.
    pub fn distance(self, other: Square) -> u32 {
        self.file()
            .distance(other.file())
            .max(self.rank().distance(other.rank()))
    }

    /// All 64 squares from `a1` to `h8`, rank by rank.
    pub fn all() -> impl DoubleEndedIterator<Item = Square> + ExactSizeIterator {
        (0..64).map(Square)
    }
}

macro_rules! try_square_from_int_impl {
    ($($t:ty)+) => {
        $(impl TryFrom<$t> for Square {
            type Error = num::TryFromIntError;

            #[inline]
            fn try_from(value: $t) -> Result<Square, Self::Error> {
                if (0..64).contains(&value) {
                    Ok(Square(value as u8))
                } else {
                    Err(overflow_error())
                }
            }
        })+
    }
}

try_square_from_int_impl! { u8 i8 u16 i16 u32 i32 u64 i64 usize isize }

impl From<Square> for usize {
    #[inline]
    fn from(sq: Square) -> usize {
        sq.index()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> String {
        sq.to_string()
    }
}

impl TryFrom<String> for Square {
    type Error = ParseSquareError;

    fn try_from(s: String) -> Result<Square, ParseSquareError> {
        Square::from_ascii(s.as_bytes())
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Square, ParseSquareError> {
        Square::from_ascii(s.as_bytes())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file().char(), self.rank().char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.file().char().to_ascii_uppercase(),
            self.rank().char()
        )
    }
}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Square {}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Square {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Square> {
        Ok(Square(u.int_in_range(0..=63)?))
    }

    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        (1, Some(1))
    }
}

/// Where a piece is: on a square, or off the board after being captured.
///
/// Captured pieces keep their identity and record, so that a capture can be
/// taken back.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    On(Square),
    Captured,
}

impl Location {
    #[inline]
    pub fn square(self) -> Option<Square> {
        match self {
            Location::On(sq) => Some(sq),
            Location::Captured => None,
        }
    }

    #[inline]
    pub fn is_captured(self) -> bool {
        self == Location::Captured
    }
}

impl From<Square> for Location {
    fn from(sq: Square) -> Location {
        Location::On(sq)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Location::On(sq) => fmt::Display::fmt(&sq, f),
            Location::Captured => f.write_str("-"),
        }
    }
}

macro_rules! square_consts {
    ($($name:ident = $index:expr,)+) => {
        $(pub const $name: Square = Square($index);)+
    }
}

square_consts! {
    A1 = 0, B1 = 1, C1 = 2, D1 = 3, E1 = 4, F1 = 5, G1 = 6, H1 = 7,
    A2 = 8, B2 = 9, C2 = 10, D2 = 11, E2 = 12, F2 = 13, G2 = 14, H2 = 15,
    A3 = 16, B3 = 17, C3 = 18, D3 = 19, E3 = 20, F3 = 21, G3 = 22, H3 = 23,
    A4 = 24, B4 = 25, C4 = 26, D4 = 27, E4 = 28, F4 = 29, G4 = 30, H4 = 31,
    A5 = 32, B5 = 33, C5 = 34, D5 = 35, E5 = 36, F5 = 37, G5 = 38, H5 = 39,
    A6 = 40, B6 = 41, C6 = 42, D6 = 43, E6 = 44, F6 = 45, G6 = 46, H6 = 47,
    A7 = 48, B7 = 49, C7 = 50, D7 = 51, E7 = 52, F7 = 53, G7 = 54, H7 = 55,
    A8 = 56, B8 = 57, C8 = 58, D8 = 59, E8 = 60, F8 = 61, G8 = 62, H8 = 63,
}
