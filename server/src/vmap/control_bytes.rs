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

//! The per-slot metadata byte. A control byte either has its top bit unset,
//! in which case the low 7 bits carry the slot's H2 tag, or it is one of the
//! three special values below

/// The slot is empty
pub const EMPTY: u8 = 0x80;
/// The slot held an entry that has since been erased (a tombstone)
pub const DELETED: u8 = 0xFE;
/// The end-of-table marker placed at index `capacity`
pub const SENTINEL: u8 = 0xFF;

/// The top bit is unset: the byte carries an H2 tag
pub const fn is_full(ctrl: u8) -> bool {
    ctrl & 0x80 == 0
}

pub const fn is_empty(ctrl: u8) -> bool {
    ctrl == EMPTY
}

pub const fn is_deleted(ctrl: u8) -> bool {
    ctrl == DELETED
}

/// Empty or deleted, but **not** the sentinel. Read the bytes as signed:
/// EMPTY (-128) and DELETED (-2) sort below SENTINEL (-1) while every full
/// byte is non-negative
pub const fn is_empty_or_deleted(ctrl: u8) -> bool {
    (ctrl as i8) < (SENTINEL as i8)
}
