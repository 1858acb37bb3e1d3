/*
 * Created on Tue Jan 14 2025
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

//! The shared library for LexiDB
//!
//! This crate carries the bits that are common to the `lexid` server and any
//! tooling built around it: version metadata and terminal I/O helpers

pub mod util;

use std::error::Error;

/// The current version of the suite
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// The project homepage
pub const URL: &str = "https://github.com/lexidb/lexidb";
/// A generic result
pub type TResult<T> = Result<T, Box<dyn Error>>;
/// The size of a connection's read buffer in bytes
pub const BUF_CAP: usize = 8 * 1024; // 8 KB per-connection
