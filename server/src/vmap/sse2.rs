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

//! SSE2 vectorized group lookups for hosts that support them

use super::bitmask::Bitmask;
use super::control_bytes;

#[cfg(target_arch = "x86")]
use core::arch::x86;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64 as x86;
use core::mem;

pub type BitmaskWord = u16;
pub const BITMASK_STRIDE: usize = 1;

/// A group of control bytes held in one 128-bit SIMD register
#[derive(Clone, Copy)]
pub struct Group(x86::__m128i);

impl Group {
    /// The number of control bytes scanned per probe step (16 on SSE2)
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
                control_bytes::EMPTY,
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

    /// Load a group of bytes starting at the given address (unaligned read)
    pub unsafe fn load_unaligned(ptr: *const u8) -> Self {
        Group(x86::_mm_loadu_si128(ptr.cast()))
    }

    /// Returns a bitmask of the bytes in the group equal to `byte`.
    /// `pcmpeqb` fills matching lanes with 0xff and `pmovmskb` collects the
    /// sign bit of every lane into the low 16 bits of the result
    pub fn match_byte(self, byte: u8) -> Bitmask {
        unsafe {
            let cmp = x86::_mm_cmpeq_epi8(self.0, x86::_mm_set1_epi8(byte as i8));
            Bitmask(x86::_mm_movemask_epi8(cmp) as u16)
        }
    }

    /// Returns a bitmask of the bytes in the group that are EMPTY
    pub fn match_empty(self) -> Bitmask {
        self.match_byte(control_bytes::EMPTY)
    }

    /// Returns a bitmask of the bytes that are EMPTY or DELETED. A signed
    /// greater-than against the sentinel catches exactly those two: both
    /// sort below -1 as signed bytes, full bytes are non-negative
    pub fn match_empty_or_deleted(self) -> Bitmask {
        unsafe {
            let special = x86::_mm_set1_epi8(control_bytes::SENTINEL as i8);
            Bitmask(x86::_mm_movemask_epi8(x86::_mm_cmpgt_epi8(special, self.0)) as u16)
        }
    }

    /// Returns a bitmask of the bytes that carry an H2 tag
    pub fn match_full(self) -> Bitmask {
        unsafe { Bitmask(!(x86::_mm_movemask_epi8(self.0) as u16)) }
    }

    /// The count of consecutive EMPTY/DELETED bytes at the start of the
    /// group, used by the iterator to leap over dead regions
    pub fn count_leading_empty_or_deleted(self) -> usize {
        unsafe {
            let special = x86::_mm_set1_epi8(control_bytes::SENTINEL as i8);
            let mask =
                x86::_mm_movemask_epi8(x86::_mm_cmpgt_epi8(special, self.0)) as u32;
            (mask + 1).trailing_zeros() as usize
        }
    }

    /// Rewrite the group at `dst`: EMPTY/DELETED/SENTINEL become EMPTY and
    /// full bytes become DELETED. This is the first half of an in-place
    /// rehash
    pub unsafe fn convert_special_to_empty_and_full_to_deleted(self, dst: *mut u8) {
        let msbs = x86::_mm_set1_epi8(0x80u8 as i8);
        let x126 = x86::_mm_set1_epi8(126);
        let zero = x86::_mm_setzero_si128();
        // special lanes are negative as signed bytes
        let special = x86::_mm_cmpgt_epi8(zero, self.0);
        let res = x86::_mm_or_si128(msbs, x86::_mm_andnot_si128(special, x126));
        x86::_mm_storeu_si128(dst.cast(), res)
    }
}
