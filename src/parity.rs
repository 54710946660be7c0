// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::slice::Strip;

/// Odd or even 1-based strip ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParityGroup {
    Odd,
    Even,
}

impl ParityGroup {
    pub fn of(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }

    pub fn contains(self, index: usize) -> bool {
        Self::of(index) == self
    }
}

/// Separates strips into `(odd, even)` groups by index, keeping each group in
/// its original relative order.
pub fn split(strips: Vec<Strip>) -> (Vec<Strip>, Vec<Strip>) {
    strips
        .into_iter()
        .partition(|s| s.parity() == ParityGroup::Odd)
}
