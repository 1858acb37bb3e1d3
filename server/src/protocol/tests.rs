/*
 * Created on Tue Feb 18 2025
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

use super::builder::Builder;
use super::{Decoder, ParseError, ProtocolErrorKind, MAX_NESTING_DEPTH};
use crate::corestore::object::Object;

fn parse_ok(input: &[u8]) -> (Object, usize) {
    Decoder::parse(input).expect("frame should have parsed")
}

fn parse_kind(input: &[u8]) -> ProtocolErrorKind {
    match Decoder::parse(input) {
        Err(ParseError::Protocol(perr)) => perr.kind,
        other => panic!("expected a protocol error, got {:?}", other),
    }
}

#[test]
fn decode_simple_string() {
    let (obj, consumed) = parse_ok(b"+OK\r\n");
    assert_eq!(obj, Object::String(b"OK".to_vec()));
    assert_eq!(consumed, 5);
}

#[test]
fn decode_simple_error() {
    let (obj, _) = parse_ok(b"-went wrong\r\n");
    assert_eq!(obj, Object::Error(b"went wrong".to_vec()));
}

#[test]
fn decode_integers() {
    assert_eq!(parse_ok(b":42\r\n").0, Object::Int(42));
    assert_eq!(parse_ok(b":+42\r\n").0, Object::Int(42));
    assert_eq!(parse_ok(b":-42\r\n").0, Object::Int(-42));
    assert_eq!(parse_ok(b":0\r\n").0, Object::Int(0));
    assert_eq!(
        parse_ok(b":9223372036854775807\r\n").0,
        Object::Int(i64::MAX)
    );
    assert_eq!(
        parse_ok(b":-9223372036854775808\r\n").0,
        Object::Int(i64::MIN)
    );
    assert_eq!(
        parse_kind(b":99999999999999999999\r\n"),
        ProtocolErrorKind::BadInteger
    );
    assert_eq!(parse_kind(b":\r\n"), ProtocolErrorKind::BadInteger);
    assert_eq!(parse_kind(b":4a\r\n"), ProtocolErrorKind::BadInteger);
}

#[test]
fn decode_doubles() {
    assert_eq!(parse_ok(b",3.25\r\n").0, Object::Double(3.25));
    assert_eq!(parse_ok(b",-0.5\r\n").0, Object::Double(-0.5));
    assert_eq!(parse_ok(b",1e3\r\n").0, Object::Double(1000.0));
    assert_eq!(parse_ok(b",2.5e-3\r\n").0, Object::Double(0.0025));
    assert_eq!(parse_ok(b",+1E2\r\n").0, Object::Double(100.0));
    // non-finite results are a wire violation
    assert_eq!(parse_kind(b",inf\r\n"), ProtocolErrorKind::BadDouble);
    assert_eq!(parse_kind(b",nan\r\n"), ProtocolErrorKind::BadDouble);
    assert_eq!(parse_kind(b",1e999\r\n"), ProtocolErrorKind::BadDouble);
    assert_eq!(parse_kind(b",abc\r\n"), ProtocolErrorKind::BadDouble);
}

#[test]
fn decode_booleans() {
    assert_eq!(parse_ok(b"#t\r\n").0, Object::Boolean(true));
    assert_eq!(parse_ok(b"#f\r\n").0, Object::Boolean(false));
    assert_eq!(parse_kind(b"#x\r\n"), ProtocolErrorKind::BadBoolean);
}

#[test]
fn decode_null() {
    let (obj, consumed) = parse_ok(b"_\r\n");
    assert_eq!(obj, Object::Null);
    assert_eq!(consumed, 3);
}

#[test]
fn decode_bulk_string() {
    let (obj, consumed) = parse_ok(b"$3\r\nfoo\r\n");
    assert_eq!(obj, Object::String(b"foo".to_vec()));
    assert_eq!(consumed, 9);
    // arbitrary bytes, CRLF included, ride inside the declared length
    let (obj, _) = parse_ok(b"$4\r\na\r\nb\r\n");
    assert_eq!(obj, Object::String(b"a\r\nb".to_vec()));
}

#[test]
fn zero_length_bulk_is_the_empty_string() {
    let (obj, consumed) = parse_ok(b"$0\r\n\r\n");
    assert_eq!(obj, Object::String(Vec::new()));
    assert_eq!(consumed, 6);
}

#[test]
fn bulk_length_must_match_exactly() {
    assert_eq!(parse_kind(b"$3\r\nfooo\r\n"), ProtocolErrorKind::LengthMismatch);
    assert_eq!(parse_kind(b"$3\r\nfo\r\ne"), ProtocolErrorKind::LengthMismatch);
}

#[test]
fn decode_bulk_error() {
    let (obj, _) = parse_ok(b"!8\r\nEDBRANGE\r\n");
    assert_eq!(obj, Object::Error(b"EDBRANGE".to_vec()));
}

#[test]
fn decode_array() {
    let (obj, consumed) = parse_ok(b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n:42\r\n");
    assert_eq!(
        obj,
        Object::Array(vec![
            Object::String(b"SET".to_vec()),
            Object::String(b"foo".to_vec()),
            Object::Int(42),
        ])
    );
    assert_eq!(consumed, 27);
}

#[test]
fn decode_nested_array() {
    let (obj, _) = parse_ok(b"*2\r\n*2\r\n:1\r\n:2\r\n#t\r\n");
    assert_eq!(
        obj,
        Object::Array(vec![
            Object::Array(vec![Object::Int(1), Object::Int(2)]),
            Object::Boolean(true),
        ])
    );
}

#[test]
fn empty_array() {
    let (obj, consumed) = parse_ok(b"*0\r\n");
    assert_eq!(obj, Object::Array(Vec::new()));
    assert_eq!(consumed, 4);
}

#[test]
fn every_strict_prefix_reports_need_more() {
    let frames: &[&[u8]] = &[
        b"+PONG\r\n",
        b"-oops\r\n",
        b":-123\r\n",
        b",2.5e-3\r\n",
        b"#t\r\n",
        b"_\r\n",
        b"$3\r\nfoo\r\n",
        b"!4\r\nEOOM\r\n",
        b"*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n",
    ];
    for frame in frames {
        for cut in 0..frame.len() {
            assert_eq!(
                Decoder::parse(&frame[..cut]),
                Err(ParseError::NotEnough),
                "prefix {:?} of {:?} should want more bytes",
                cut,
                frame
            );
        }
        assert!(Decoder::parse(frame).is_ok());
    }
}

#[test]
fn unknown_type_byte() {
    assert_eq!(parse_kind(b"%5\r\n"), ProtocolErrorKind::UnknownTypeByte);
}

#[test]
fn stray_lf_in_simple_string() {
    assert_eq!(parse_kind(b"+ab\ncd\r\n"), ProtocolErrorKind::ExpectedCr);
}

#[test]
fn crlf_discipline() {
    assert_eq!(parse_kind(b"_\rX"), ProtocolErrorKind::ExpectedLf);
    assert_eq!(parse_kind(b"#t\rX"), ProtocolErrorKind::ExpectedLf);
}

#[test]
fn bad_lengths() {
    assert_eq!(parse_kind(b"$-1\r\n"), ProtocolErrorKind::BadLength);
    assert_eq!(parse_kind(b"$3a\r\n"), ProtocolErrorKind::BadLength);
    assert_eq!(parse_kind(b"$\r\n"), ProtocolErrorKind::BadLength);
    assert_eq!(
        parse_kind(b"$99999999999999999999\r\n"),
        ProtocolErrorKind::BadLength
    );
}

#[test]
fn nesting_depth_is_bounded() {
    let mut at_limit = Vec::new();
    for _ in 0..MAX_NESTING_DEPTH {
        at_limit.extend_from_slice(b"*1\r\n");
    }
    at_limit.extend_from_slice(b"_\r\n");
    assert!(Decoder::parse(&at_limit).is_ok());

    let mut too_deep = Vec::new();
    for _ in 0..MAX_NESTING_DEPTH + 1 {
        too_deep.extend_from_slice(b"*1\r\n");
    }
    too_deep.extend_from_slice(b"_\r\n");
    assert_eq!(parse_kind(&too_deep), ProtocolErrorKind::NestingTooDeep);
}

#[test]
fn consumed_stops_at_the_frame_boundary() {
    let wire = b"+first\r\n+second\r\n";
    let (obj, consumed) = parse_ok(wire);
    assert_eq!(obj, Object::String(b"first".to_vec()));
    let (obj, _) = parse_ok(&wire[consumed..]);
    assert_eq!(obj, Object::String(b"second".to_vec()));
}

#[test]
fn builder_emits_exact_frames() {
    let mut b = Builder::new();
    b.simple_string(b"OK");
    assert_eq!(b.as_bytes(), b"+OK\r\n");

    let mut b = Builder::new();
    b.simple_error(b"nope");
    assert_eq!(b.as_bytes(), b"-nope\r\n");

    let mut b = Builder::new();
    b.integer(-42);
    assert_eq!(b.as_bytes(), b":-42\r\n");

    let mut b = Builder::new();
    b.double(3.5);
    assert_eq!(b.as_bytes(), b",3.5\r\n");

    let mut b = Builder::new();
    b.boolean(true);
    b.boolean(false);
    assert_eq!(b.as_bytes(), b"#t\r\n#f\r\n");

    let mut b = Builder::new();
    b.null();
    assert_eq!(b.as_bytes(), b"_\r\n");

    let mut b = Builder::new();
    b.bulk_string(b"foo");
    assert_eq!(b.as_bytes(), b"$3\r\nfoo\r\n");

    let mut b = Builder::new();
    b.bulk_error(b"EUNAUTHED");
    assert_eq!(b.as_bytes(), b"!9\r\nEUNAUTHED\r\n");

    let mut b = Builder::new();
    b.array_header(2);
    b.bulk_string(b"a");
    b.integer(1);
    assert_eq!(b.as_bytes(), b"*2\r\n$1\r\na\r\n:1\r\n");
}

#[test]
fn roundtrip_every_variant() {
    let objects = vec![
        Object::Null,
        Object::Int(i64::MIN),
        Object::Int(0),
        Object::Int(i64::MAX),
        Object::Double(0.0),
        Object::Double(-2.5),
        Object::Double(1.0e300),
        Object::Boolean(true),
        Object::Boolean(false),
        Object::String(Vec::new()),
        Object::String(b"hello world".to_vec()),
        Object::String(vec![0, 255, 13, 10, 7]),
        Object::Error(b"EOOM".to_vec()),
        Object::Array(Vec::new()),
        Object::Array(vec![
            Object::Int(1),
            Object::Array(vec![Object::Null, Object::String(b"x".to_vec())]),
            Object::Double(0.125),
        ]),
    ];
    for object in objects {
        let mut encoded = Builder::new();
        encoded.object(&object);
        let (decoded, consumed) = parse_ok(encoded.as_bytes());
        assert_eq!(decoded, object);
        assert_eq!(consumed, encoded.as_bytes().len());
    }
}
