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

//! # The wire protocol (version 1)
//!
//! A RESP-flavoured framing: every message is a type byte followed by a
//! CRLF-terminated body. Fixed-size types are one line; bulk types declare
//! a byte length and carry exactly that many payload bytes; arrays declare
//! an element count and recurse.
//!
//! The [`Decoder`] here is *streaming*: it parses out of an append-only
//! buffer and distinguishes "this frame is incomplete, read more"
//! ([`ParseError::NotEnough`]) from "this frame can never be valid"
//! ([`ParseError::Protocol`]). It never reads past a declared length, and
//! it never consumes bytes unless a whole frame parsed

pub mod builder;
pub mod responses;
#[cfg(test)]
mod tests;

use crate::corestore::object::Object;
use core::fmt;

/// The bound on array recursion. Inputs nested deeper than this are
/// rejected as malformed rather than parsed
pub const MAX_NESTING_DEPTH: usize = 32;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The buffer ends before the frame does: read more bytes and retry
    NotEnough,
    /// The frame is malformed and the connection should be dropped
    Protocol(ProtocolError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolError {
    pub kind: ProtocolErrorKind,
    /// Byte offset into the buffer where the violation was noticed
    pub at: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolErrorKind {
    UnknownTypeByte,
    ExpectedCr,
    ExpectedLf,
    BadLength,
    /// The payload did not end where its declared length said it would
    LengthMismatch,
    BadInteger,
    BadDouble,
    BadBoolean,
    NestingTooDeep,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ProtocolErrorKind::UnknownTypeByte => "unknown type byte",
            ProtocolErrorKind::ExpectedCr => "expected \\r",
            ProtocolErrorKind::ExpectedLf => "expected \\n",
            ProtocolErrorKind::BadLength => "bad length",
            ProtocolErrorKind::LengthMismatch => "payload length mismatch",
            ProtocolErrorKind::BadInteger => "bad integer literal",
            ProtocolErrorKind::BadDouble => "bad double literal",
            ProtocolErrorKind::BadBoolean => "bad boolean",
            ProtocolErrorKind::NestingTooDeep => "arrays nested too deep",
        };
        write!(f, "{} at byte {}", what, self.at)
    }
}

/// The streaming frame parser. Construct-and-parse through
/// [`Decoder::parse`]; on success you get the decoded [`Object`] and the
/// number of bytes consumed, which the caller then advances its buffer by
pub struct Decoder<'a> {
    buf: &'a [u8],
    cursor: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    /// Try to parse one complete frame from the front of `buf`
    pub fn parse(buf: &'a [u8]) -> ParseResult<(Object, usize)> {
        Self::parse_with_max_depth(buf, MAX_NESTING_DEPTH)
    }

    pub fn parse_with_max_depth(buf: &'a [u8], max_depth: usize) -> ParseResult<(Object, usize)> {
        let mut slf = Decoder {
            buf,
            cursor: 0,
            max_depth,
        };
        let object = slf.next_object(0)?;
        Ok((object, slf.cursor))
    }

    fn error_at<T>(&self, kind: ProtocolErrorKind, at: usize) -> ParseResult<T> {
        Err(ParseError::Protocol(ProtocolError { kind, at }))
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.cursor
    }

    fn not_exhausted(&self) -> bool {
        self.cursor < self.buf.len()
    }

    fn next_byte(&mut self) -> ParseResult<u8> {
        if self.not_exhausted() {
            let byte = self.buf[self.cursor];
            self.cursor += 1;
            Ok(byte)
        } else {
            Err(ParseError::NotEnough)
        }
    }

    fn expect_crlf(&mut self) -> ParseResult<()> {
        let at = self.cursor;
        if self.next_byte()? != b'\r' {
            return self.error_at(ProtocolErrorKind::ExpectedCr, at);
        }
        if self.next_byte()? != b'\n' {
            return self.error_at(ProtocolErrorKind::ExpectedLf, at + 1);
        }
        Ok(())
    }

    /// The body of a line type: everything up to the CRLF. A stray LF in
    /// the body is a violation, a missing terminator just means the frame
    /// hasn't fully arrived yet
    fn read_simple_line(&mut self) -> ParseResult<&'a [u8]> {
        let start = self.cursor;
        while self.not_exhausted() {
            match self.buf[self.cursor] {
                b'\r' => {
                    let line = &self.buf[start..self.cursor];
                    self.cursor += 1;
                    let at = self.cursor;
                    if self.next_byte()? != b'\n' {
                        return self.error_at(ProtocolErrorKind::ExpectedLf, at);
                    }
                    return Ok(line);
                }
                b'\n' => return self.error_at(ProtocolErrorKind::ExpectedCr, self.cursor),
                _ => self.cursor += 1,
            }
        }
        Err(ParseError::NotEnough)
    }

    /// A `<digits>\r\n` length header
    fn read_length(&mut self) -> ParseResult<usize> {
        let start = self.cursor;
        let digits = self.read_simple_line()?;
        if digits.is_empty() {
            return self.error_at(ProtocolErrorKind::BadLength, start);
        }
        let mut len = 0usize;
        for &byte in digits {
            if !byte.is_ascii_digit() {
                return self.error_at(ProtocolErrorKind::BadLength, start);
            }
            len = match len
                .checked_mul(10)
                .and_then(|l| l.checked_add((byte & 0x0f) as usize))
            {
                Some(l) => l,
                None => return self.error_at(ProtocolErrorKind::BadLength, start),
            };
        }
        Ok(len)
    }

    /// A length-prefixed payload: exactly `len` bytes then CRLF
    fn next_bulk(&mut self) -> ParseResult<Vec<u8>> {
        let len = self.read_length()?;
        if self.remaining() < len {
            return Err(ParseError::NotEnough);
        }
        let payload = &self.buf[self.cursor..self.cursor + len];
        self.cursor += len;
        let at = self.cursor;
        if self.next_byte()? != b'\r' {
            return self.error_at(ProtocolErrorKind::LengthMismatch, at);
        }
        if self.next_byte()? != b'\n' {
            return self.error_at(ProtocolErrorKind::ExpectedLf, at + 1);
        }
        Ok(payload.to_vec())
    }

    fn next_integer(&mut self) -> ParseResult<i64> {
        let start = self.cursor;
        let line = self.read_simple_line()?;
        // accepts an optional leading '+' or '-'; rejects everything else
        match core::str::from_utf8(line).ok().and_then(|s| s.parse::<i64>().ok()) {
            Some(num) => Ok(num),
            None => self.error_at(ProtocolErrorKind::BadInteger, start),
        }
    }

    fn next_double(&mut self) -> ParseResult<f64> {
        let start = self.cursor;
        let line = self.read_simple_line()?;
        let val = match core::str::from_utf8(line).ok().and_then(|s| s.parse::<f64>().ok()) {
            Some(val) => val,
            None => return self.error_at(ProtocolErrorKind::BadDouble, start),
        };
        // "inf"/"nan" parse fine but have no place on this wire
        if !val.is_finite() {
            return self.error_at(ProtocolErrorKind::BadDouble, start);
        }
        Ok(val)
    }

    fn next_boolean(&mut self) -> ParseResult<bool> {
        let at = self.cursor;
        let val = match self.next_byte()? {
            b't' => true,
            b'f' => false,
            _ => return self.error_at(ProtocolErrorKind::BadBoolean, at),
        };
        self.expect_crlf()?;
        Ok(val)
    }

    fn next_object(&mut self, depth: usize) -> ParseResult<Object> {
        if depth > self.max_depth {
            return self.error_at(ProtocolErrorKind::NestingTooDeep, self.cursor);
        }
        let at = self.cursor;
        match self.next_byte()? {
            b'+' => Ok(Object::String(self.read_simple_line()?.to_vec())),
            b'-' => Ok(Object::Error(self.read_simple_line()?.to_vec())),
            b':' => Ok(Object::Int(self.next_integer()?)),
            b',' => Ok(Object::Double(self.next_double()?)),
            b'#' => Ok(Object::Boolean(self.next_boolean()?)),
            b'_' => {
                self.expect_crlf()?;
                Ok(Object::Null)
            }
            b'$' => Ok(Object::String(self.next_bulk()?)),
            b'!' => Ok(Object::Error(self.next_bulk()?)),
            b'*' => {
                let count = self.read_length()?;
                let mut elements = Vec::new();
                for _ in 0..count {
                    elements.push(self.next_object(depth + 1)?);
                }
                Ok(Object::Array(elements))
            }
            _ => self.error_at(ProtocolErrorKind::UnknownTypeByte, at),
        }
    }
}
