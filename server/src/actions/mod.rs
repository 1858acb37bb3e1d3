/*
 * Created on Mon Mar 10 2025
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

//! # Actions
//!
//! Actions are like shell commands: arguments in, one framed response out.
//! Every action is handed the execution context, the client's state, the
//! connection's write buffer and the already-split argument list. Arity
//! and key-shape violations answer with the appropriate canned error; only
//! the keyspace itself can fail beyond that, and only on allocation

pub mod auth;
pub mod del;
pub mod exists;
pub mod get;
pub mod info;
pub mod keys;
pub mod ping;
pub mod select;
pub mod set;
