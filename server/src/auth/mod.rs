/*
 * Created on Mon Feb 24 2025
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

//! # Authn/authz
//!
//! Access control is deliberately coarse: a flat list of user records from
//! the config file, each carrying its command/category grants and candidate
//! passwords. When the server runs in protected mode, a connection must
//! AUTH against one of these records before touching data commands

mod keys;
mod provider;

pub use provider::{AuthProvider, AuthResult, Category, User};

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user, wrong password or a disabled record. Deliberately one
    /// variant for all three: the client learns nothing about which it was
    BadCredentials,
    /// The authenticated user's grants do not cover this command
    PermissionDenied,
}
