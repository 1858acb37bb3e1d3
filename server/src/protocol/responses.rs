/*
 * Created on Mon Feb 17 2025
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

//! Responses that never change, pre-framed so the dispatch layer can
//! append them to a write buffer without running the encoder

pub const OKAY: &[u8] = b"+OK\r\n";
pub const PONG: &[u8] = b"+PONG\r\n";
pub const NIL: &[u8] = b"_\r\n";
pub const ZERO: &[u8] = b":0\r\n";
pub const ONE: &[u8] = b":1\r\n";

/// AUTH required before this command (protected mode)
pub const E_UNAUTHED: &[u8] = b"!9\r\nEUNAUTHED\r\n";
/// Unknown command or wrong arity
pub const E_INVCMD: &[u8] = b"!7\r\nEINVCMD\r\n";
/// Bad credentials (or a denied user)
pub const E_BADAUTH: &[u8] = b"!8\r\nEBADAUTH\r\n";
/// A key of the wrong type
pub const E_INVKEY: &[u8] = b"!7\r\nEINVKEY\r\n";
/// Allocation failure while executing the command
pub const E_OOM: &[u8] = b"!4\r\nEOOM\r\n";
/// SELECT index outside the configured database range
pub const E_DBRANGE: &[u8] = b"!8\r\nEDBRANGE\r\n";
