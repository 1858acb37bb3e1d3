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

//! SWAR ("SIMD within a register") group lookups for architectures without
//! SSE2. A group is 8 control bytes packed little-endian into one u64, and
//! all the matchers below operate on every byte in parallel with plain
//! 64-bit arithmetic

use super::bitmask::Bitmask;
use super::control_bytes;
use core::mem;
use core::ptr;

pub type BitmaskWord = u64;
pub const BITMASK_STRIDE: usize = 8;

/// Every byte's most significant bit
const MSBS: u64 = 0x8080_8080_8080_8080;
/// Every byte's least significant bit
const LSBS: u64 = 0x0101_0101_0101_0101;

fn repeat(byte: u8) -> u64 {
    LSBS * byte as u64
}

/// A group of control bytes scanned as one machine word
#[derive(Clone, Copy)]
pub struct Group(u64);

impl Group {
    /// The number of control bytes scanned per probe step (8 without SSE2)
    pub const WIDTH: usize = mem::size_of::<Self>();

    /// A static group for the zero-capacity table. The leading sentinel
    /// terminates both probes and iteration immediately
    pub const fn static_empty() -> &'static [u8; Group::WIDTH] {
        #[repr(C)]
        struct AlignedBytes {
            // zero-sized member forcing alignment to the group width
            _align: [Group; 0],
            bytes: [u8; Group::WIDTH],
        }
        const ALIGNED_BYTES: AlignedBytes = AlignedBytes {
            _align: [],
            bytes: [
                control_bytes::SENTINEL,
                control_bytes::EMPTY,
                control_bytes::EMPTY,
                control_bytes::EMPTY,
                control_bytes::EMPTY,
                control_bytes::EMPTY,
                control_bytes::EMPTY,
                control_bytes::EMPTY,
            ],
        };
        &ALIGNED_BYTES.bytes
    }

    /// Load a group of bytes starting at the given address (unaligned read).
    /// The bytes are packed little-endian so that byte `i` of the group maps
    /// to bits `8i..8i+8` regardless of the host's endianness
    pub unsafe fn load_unaligned(ptr: *const u8) -> Self {
        Group(u64::from_le_bytes(ptr::read_unaligned(
            ptr as *const [u8; 8],
        )))
    }

    /// Returns a bitmask of the bytes in the group that *may* equal `byte`:
    /// the classic haszero trick `(x - lsbs) & ~x & msbs` over the xor of
    /// the group with the repeated needle. A borrow from an adjacent lane
    /// can produce a false positive, which is harmless since every H2 match
    /// is confirmed with a full key comparison
    pub fn match_byte(self, byte: u8) -> Bitmask {
        let cmp = self.0 ^ repeat(byte);
        Bitmask(cmp.wrapping_sub(LSBS) & !cmp & MSBS)
    }

    /// Returns a bitmask of the bytes that are EMPTY: the top bit is set
    /// and bit 1 is clear, which holds for 0x80 but not 0xFE or 0xFF
    pub fn match_empty(self) -> Bitmask {
        Bitmask(self.0 & (!self.0 << 6) & MSBS)
    }

    /// Returns a bitmask of the bytes that are EMPTY or DELETED: the top
    /// bit is set and bit 0 is clear, which excludes only the sentinel
    pub fn match_empty_or_deleted(self) -> Bitmask {
        Bitmask(self.0 & (!self.0 << 7) & MSBS)
    }

    /// Returns a bitmask of the bytes that carry an H2 tag
    pub fn match_full(self) -> Bitmask {
        Bitmask(!self.0 & MSBS)
    }

    /// The count of consecutive EMPTY/DELETED bytes at the start of the
    /// group, used by the iterator to leap over dead regions
    pub fn count_leading_empty_or_deleted(self) -> usize {
        const GAPS: u64 = 0x00FE_FEFE_FEFE_FEFE;
        ((((!self.0 & (self.0 >> 7)) | GAPS).wrapping_add(1)).trailing_zeros() as usize + 7) >> 3
    }

    /// Rewrite the group at `dst`: EMPTY/DELETED/SENTINEL become EMPTY and
    /// full bytes become DELETED. This is the first half of an in-place
    /// rehash
    pub unsafe fn convert_special_to_empty_and_full_to_deleted(self, dst: *mut u8) {
        let x = self.0 & MSBS;
        let res = (!x).wrapping_add(x >> 7) & !LSBS;
        ptr::write_unaligned(dst as *mut [u8; 8], res.to_le_bytes())
    }
}
