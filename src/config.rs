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

use crate::role::Role;

/// Settings of a [`Game`](crate::Game).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Role a pawn becomes on the last rank when the move does not name
    /// one. Roles a pawn cannot promote to fall back to a queen.
    ///
    /// Defaults to [`Role::Queen`].
    pub default_promotion: Role,
    /// Whether move tokens are rejected once the game has ended by
    /// checkmate, stalemate or a result token.
    ///
    /// Defaults to `true`.
    pub stop_at_game_end: bool,
}

impl Config {
    pub(crate) fn promotion_role(&self, requested: Option<Role>) -> Role {
        requested
            .into_iter()
            .chain([self.default_promotion])
            .find(|role| role.is_promotion())
            .unwrap_or(Role::Queen)
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            default_promotion: Role::Queen,
            stop_at_game_end: true,
        }
    }
}
