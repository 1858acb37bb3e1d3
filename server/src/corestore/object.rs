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

//! The typed value model. Everything a client can store or receive is one
//! of these variants; arrays own their elements and destruction recurses
//! through them (the compiler writes that part for us)

use core::cmp::Ordering;
use core::fmt;

#[derive(Debug, Clone)]
pub enum Object {
    Null,
    Int(i64),
    Double(f64),
    Boolean(bool),
    /// An owned byte sequence; not necessarily UTF-8
    String(Vec<u8>),
    /// Same payload as `String`, but framed as an error on the wire
    Error(Vec<u8>),
    Array(Vec<Object>),
}

impl Object {
    /// The fixed tag ordering used to break ties when comparing across
    /// variants
    pub const fn variant_rank(&self) -> u8 {
        match self {
            Object::Null => 0,
            Object::Int(_) => 1,
            Object::Double(_) => 2,
            Object::Boolean(_) => 3,
            Object::String(_) => 4,
            Object::Error(_) => 5,
            Object::Array(_) => 6,
        }
    }

    /// Total ordering: payload order within a variant, variant rank across
    /// variants. Doubles use IEEE-754 total ordering so that this never
    /// returns an unordered answer
    pub fn compare(&self, other: &Object) -> Ordering {
        match (self, other) {
            (Object::Null, Object::Null) => Ordering::Equal,
            (Object::Int(a), Object::Int(b)) => a.cmp(b),
            (Object::Double(a), Object::Double(b)) => a.total_cmp(b),
            (Object::Boolean(a), Object::Boolean(b)) => a.cmp(b),
            (Object::String(a), Object::String(b)) => a.cmp(b),
            (Object::Error(a), Object::Error(b)) => a.cmp(b),
            (Object::Array(a), Object::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y) {
                        Ordering::Equal => (),
                        unequal => return unequal,
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }

    /// Borrow the byte payload of a `String`, if that is what this is
    pub fn as_str_bytes(&self) -> Option<&[u8]> {
        match self {
            Object::String(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Null, Object::Null) => true,
            (Object::Int(a), Object::Int(b)) => a == b,
            (Object::Double(a), Object::Double(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Error(a), Object::Error(b)) => a == b,
            (Object::Array(a), Object::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Object {
    fn from(num: i64) -> Self {
        Object::Int(num)
    }
}

impl From<f64> for Object {
    fn from(dbl: f64) -> Self {
        Object::Double(dbl)
    }
}

impl From<bool> for Object {
    fn from(boolean: bool) -> Self {
        Object::Boolean(boolean)
    }
}

impl From<Vec<u8>> for Object {
    fn from(bytes: Vec<u8>) -> Self {
        Object::String(bytes)
    }
}

impl From<Vec<Object>> for Object {
    fn from(elements: Vec<Object>) -> Self {
        Object::Array(elements)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Null => write!(f, "null"),
            Object::Int(num) => write!(f, "{}", num),
            // Rust's f64 formatter emits the shortest representation that
            // round-trips
            Object::Double(dbl) => write!(f, "{}", dbl),
            Object::Boolean(true) => write!(f, "#t"),
            Object::Boolean(false) => write!(f, "#f"),
            Object::String(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
            Object::Error(bytes) => write!(f, "error: {}", String::from_utf8_lossy(bytes)),
            Object::Array(elements) => {
                write!(f, "[")?;
                let mut first = true;
                for element in elements {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
        }
    }
}
