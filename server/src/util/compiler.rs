/*
 * Created on Mon Feb 03 2025
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

//! Branch-weight hints for stable Rust. `core::intrinsics::likely` is
//! nightly-only, but placing a call to a `#[cold]` function on one side of
//! a branch tells LLVM which side is the freeway and which is the exit
//! ramp, which is all the intrinsic would have said anyway

#[cold]
#[inline(never)]
fn off_the_fast_path() {}

/// Hint that `cond` is almost always true
#[inline(always)]
pub fn likely(cond: bool) -> bool {
    if !cond {
        off_the_fast_path();
    }
    cond
}

/// Hint that `cond` is almost always false
#[inline(always)]
pub fn unlikely(cond: bool) -> bool {
    if cond {
        off_the_fast_path();
    }
    cond
}
