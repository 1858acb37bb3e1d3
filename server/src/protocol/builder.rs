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

//! The response builder: an append-only frame encoder. A whole response is
//! composed here first and only then appended to a connection's write
//! buffer, so a partial frame never reaches the wire

use crate::corestore::object::Object;
use bytes::BytesMut;

const CRLF: &[u8] = b"\r\n";

pub struct Builder {
    buf: BytesMut,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// `+<bytes>\r\n`. The payload must not contain CR or LF, that is the
    /// caller's contract
    pub fn simple_string(&mut self, payload: &[u8]) {
        debug_assert!(!payload.iter().any(|b| *b == b'\r' || *b == b'\n'));
        self.buf.extend_from_slice(b"+");
        self.buf.extend_from_slice(payload);
        self.buf.extend_from_slice(CRLF);
    }

    /// `-<bytes>\r\n`
    pub fn simple_error(&mut self, payload: &[u8]) {
        debug_assert!(!payload.iter().any(|b| *b == b'\r' || *b == b'\n'));
        self.buf.extend_from_slice(b"-");
        self.buf.extend_from_slice(payload);
        self.buf.extend_from_slice(CRLF);
    }

    /// `:<digits>\r\n`
    pub fn integer(&mut self, num: i64) {
        self.buf.extend_from_slice(b":");
        self.buf.extend_from_slice(num.to_string().as_bytes());
        self.buf.extend_from_slice(CRLF);
    }

    /// `,<decimal-or-exp>\r\n` in the shortest form that round-trips
    pub fn double(&mut self, dbl: f64) {
        debug_assert!(dbl.is_finite());
        self.buf.extend_from_slice(b",");
        self.buf.extend_from_slice(dbl.to_string().as_bytes());
        self.buf.extend_from_slice(CRLF);
    }

    /// `#t\r\n` or `#f\r\n`
    pub fn boolean(&mut self, boolean: bool) {
        self.buf
            .extend_from_slice(if boolean { b"#t\r\n" } else { b"#f\r\n" });
    }

    /// `_\r\n`
    pub fn null(&mut self) {
        self.buf.extend_from_slice(b"_\r\n");
    }

    /// `$<len>\r\n<payload>\r\n`
    pub fn bulk_string(&mut self, payload: &[u8]) {
        self.buf.extend_from_slice(b"$");
        self.buf
            .extend_from_slice(payload.len().to_string().as_bytes());
        self.buf.extend_from_slice(CRLF);
        self.buf.extend_from_slice(payload);
        self.buf.extend_from_slice(CRLF);
    }

    /// `!<len>\r\n<payload>\r\n`
    pub fn bulk_error(&mut self, payload: &[u8]) {
        self.buf.extend_from_slice(b"!");
        self.buf
            .extend_from_slice(payload.len().to_string().as_bytes());
        self.buf.extend_from_slice(CRLF);
        self.buf.extend_from_slice(payload);
        self.buf.extend_from_slice(CRLF);
    }

    /// `*<count>\r\n`, to be followed by exactly `count` more writes
    pub fn array_header(&mut self, count: usize) {
        self.buf.extend_from_slice(b"*");
        self.buf.extend_from_slice(count.to_string().as_bytes());
        self.buf.extend_from_slice(CRLF);
    }

    /// Encode a whole object, recursing through arrays. Strings and errors
    /// take their bulk forms since payloads are arbitrary bytes
    pub fn object(&mut self, object: &Object) {
        match object {
            Object::Null => self.null(),
            Object::Int(num) => self.integer(*num),
            Object::Double(dbl) => self.double(*dbl),
            Object::Boolean(boolean) => self.boolean(*boolean),
            Object::String(bytes) => self.bulk_string(bytes),
            Object::Error(bytes) => self.bulk_error(bytes),
            Object::Array(elements) => {
                self.array_header(elements.len());
                for element in elements {
                    self.object(element);
                }
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
