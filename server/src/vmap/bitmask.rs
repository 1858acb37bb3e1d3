/*
 * Created on Wed Feb 05 2025
 *
 * This file is a part of LexiDB
 * LexiDB is a free and open-source in-memory key/value database that
 * aims to deliver predictable performance through a compact typed object
 * model and a vectorized keyspace engine
 *
 * Copyright (c) 2025, the LexiDB authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

use super::imp::{BitmaskWord, BITMASK_STRIDE};

/// The result of matching a [`Group`](super::imp::Group) of control bytes
/// against a predicate. Each matching byte contributes one set bit (SSE2) or
/// one set *byte* (the SWAR fallback, hence the stride)
#[derive(Clone, Copy)]
pub struct Bitmask(pub BitmaskWord);

impl Bitmask {
    /// Checks if any bit has been set in the bitmask
    pub fn any_bit_set(self) -> bool {
        self.0 != 0
    }

    /// Returns the position of the lowest set bit, if one exists
    pub fn lowest_set_bit(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.trailing_zeros())
        }
    }

    /// Returns the bitmask with the lowest set bit removed: `0b011010`
    /// yields `0b011000`
    pub fn remove_lowest_bit(self) -> Self {
        Bitmask(self.0 & (self.0 - 1))
    }

    /// The number of unset byte positions below the lowest match
    pub fn trailing_zeros(self) -> usize {
        self.0.trailing_zeros() as usize / BITMASK_STRIDE
    }

    /// The number of unset byte positions above the highest match
    pub fn leading_zeros(self) -> usize {
        self.0.leading_zeros() as usize / BITMASK_STRIDE
    }
}

/// An iterator over the byte positions set in a bitmask, lowest first
pub struct BitmaskIterator(Bitmask);

impl Iterator for BitmaskIterator {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        let bit = self.0.lowest_set_bit()?;
        self.0 = self.0.remove_lowest_bit();
        Some(bit)
    }
}

impl IntoIterator for Bitmask {
    type IntoIter = BitmaskIterator;
    type Item = usize;
    fn into_iter(self) -> Self::IntoIter {
        BitmaskIterator(self)
    }
}
