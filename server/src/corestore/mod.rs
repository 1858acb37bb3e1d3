/*
 * Created on Mon Feb 10 2025
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

//! The in-memory store: a fixed array of numbered databases, each one a
//! keyspace mapping byte-string keys to typed objects. The array is created
//! once at startup and owned by the server for its whole life

pub mod object;

use self::object::Object;
use crate::vmap::{TryReserveError, Vmap};

/// A single numbered keyspace
pub struct Db {
    id: usize,
    keys: Vmap<Vec<u8>, Object>,
}

impl Db {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            keys: Vmap::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn tombstones(&self) -> usize {
        self.keys.tombstones()
    }

    /// Insert or replace; the old value (if any) is dropped
    pub fn set(&mut self, key: Vec<u8>, value: Object) -> Result<(), TryReserveError> {
        self.keys.insert(key, value).map(|_| ())
    }

    pub fn get(&self, key: &[u8]) -> Option<&Object> {
        self.keys.get(key)
    }

    /// Returns true if the key existed
    pub fn del(&mut self, key: &[u8]) -> bool {
        self.keys.remove(key).is_some()
    }

    pub fn exists(&self, key: &[u8]) -> bool {
        self.keys.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Vec<u8>> {
        self.keys.iter().map(|(key, _)| key)
    }
}

/// The array of databases. Database ids are their indices; every entry
/// lives in exactly one database at a time
pub struct Corestore {
    databases: Vec<Db>,
}

impl Corestore {
    pub fn new(count: usize) -> Self {
        Self {
            databases: (0..count).map(Db::new).collect(),
        }
    }

    pub fn db_count(&self) -> usize {
        self.databases.len()
    }

    pub fn db(&self, index: usize) -> Option<&Db> {
        self.databases.get(index)
    }

    pub fn db_mut(&mut self, index: usize) -> Option<&mut Db> {
        self.databases.get_mut(index)
    }

    /// Aggregate live key count across every database (INFO)
    pub fn total_keys(&self) -> usize {
        self.databases.iter().map(Db::len).sum()
    }

    pub fn databases(&self) -> impl Iterator<Item = &Db> {
        self.databases.iter()
    }
}
