/*
 * Created on Mon Mar 31 2025
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

//! End-to-end request scenarios, run through the same decode/dispatch
//! pipeline a live connection uses -- just without the sockets

use crate::auth::{AuthProvider, Category, User};
use crate::corestore::object::Object;
use crate::corestore::Corestore;
use crate::protocol::Decoder;
use crate::queryengine::{self, ClientState, ExecCtx};
use bytes::{Buf, BytesMut};

struct Harness {
    store: Corestore,
    auth: AuthProvider,
    client: ClientState,
}

impl Harness {
    fn new(databases: usize) -> Self {
        Self::with_auth(databases, false, Vec::new())
    }

    fn with_auth(databases: usize, protected: bool, users: Vec<User>) -> Self {
        Self {
            store: Corestore::new(databases),
            auth: AuthProvider::new(protected, users),
            client: ClientState::new(),
        }
    }

    /// Feed raw wire bytes in; collect the raw response bytes out. The
    /// input may carry several pipelined frames
    fn request(&mut self, wire: &[u8]) -> Vec<u8> {
        let mut read_buf = BytesMut::from(wire);
        let mut out = BytesMut::new();
        while !read_buf.is_empty() {
            let (query, consumed) =
                Decoder::parse(&read_buf).expect("tests only send complete frames");
            read_buf.advance(consumed);
            let mut ctx = ExecCtx {
                store: &mut self.store,
                auth: &self.auth,
                clients: 1,
            };
            queryengine::execute(&mut ctx, &mut self.client, &mut out, query);
        }
        out.to_vec()
    }
}

#[test]
fn scenario_ping() {
    let mut h = Harness::new(1);
    assert_eq!(h.request(b"*1\r\n$4\r\nPING\r\n"), b"+PONG\r\n");
}

#[test]
fn ping_with_a_message_echoes() {
    let mut h = Harness::new(1);
    assert_eq!(
        h.request(b"*2\r\n$4\r\nPING\r\n$5\r\nhello\r\n"),
        b"$5\r\nhello\r\n"
    );
}

#[test]
fn scenario_set_then_get() {
    let mut h = Harness::new(1);
    assert_eq!(
        h.request(b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n"),
        b"+OK\r\n"
    );
    assert_eq!(h.request(b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n"), b"$3\r\nbar\r\n");
}

#[test]
fn scenario_get_absent_is_null() {
    let mut h = Harness::new(1);
    assert_eq!(h.request(b"*2\r\n$3\r\nGET\r\n$6\r\nabsent\r\n"), b"_\r\n");
}

#[test]
fn scenario_del_counts() {
    let mut h = Harness::new(1);
    h.request(b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n");
    assert_eq!(h.request(b"*2\r\n$3\r\nDEL\r\n$3\r\nfoo\r\n"), b":1\r\n");
    assert_eq!(h.request(b"*2\r\n$3\r\nDEL\r\n$3\r\nfoo\r\n"), b":0\r\n");
}

#[test]
fn scenario_select_out_of_range() {
    let mut h = Harness::new(2);
    assert_eq!(
        h.request(b"*2\r\n$6\r\nSELECT\r\n$1\r\n2\r\n"),
        b"!8\r\nEDBRANGE\r\n"
    );
    assert_eq!(h.request(b"*2\r\n$6\r\nSELECT\r\n$1\r\n1\r\n"), b"+OK\r\n");
}

#[test]
fn scenario_protected_mode_requires_auth() {
    let mut user = User::new("admin");
    user.passwords.push(b"sesame".to_vec());
    let mut h = Harness::with_auth(1, true, vec![user]);
    // any data command is refused up front
    assert_eq!(
        h.request(b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n"),
        b"!9\r\nEUNAUTHED\r\n"
    );
    assert_eq!(
        h.request(b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n"),
        b"!9\r\nEUNAUTHED\r\n"
    );
    // connection commands stay reachable
    assert_eq!(h.request(b"*1\r\n$4\r\nPING\r\n"), b"+PONG\r\n");
    // wrong credentials
    assert_eq!(
        h.request(b"*3\r\n$4\r\nAUTH\r\n$5\r\nadmin\r\n$5\r\nwrong\r\n"),
        b"!8\r\nEBADAUTH\r\n"
    );
    // right credentials unlock the data commands
    assert_eq!(
        h.request(b"*3\r\n$4\r\nAUTH\r\n$5\r\nadmin\r\n$6\r\nsesame\r\n"),
        b"+OK\r\n"
    );
    assert_eq!(
        h.request(b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n"),
        b"+OK\r\n"
    );
}

#[test]
fn acl_grants_gate_data_commands() {
    let mut reader = User::new("reader");
    reader.passwords.push(b"pw".to_vec());
    reader.categories.push(Category::Read);
    let mut h = Harness::with_auth(1, true, vec![reader]);
    assert_eq!(
        h.request(b"*3\r\n$4\r\nAUTH\r\n$6\r\nreader\r\n$2\r\npw\r\n"),
        b"+OK\r\n"
    );
    assert_eq!(h.request(b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n"), b"_\r\n");
    assert_eq!(
        h.request(b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n"),
        b"!9\r\nEUNAUTHED\r\n"
    );
}

#[test]
fn databases_are_isolated() {
    let mut h = Harness::new(2);
    h.request(b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n");
    assert_eq!(h.request(b"*2\r\n$6\r\nSELECT\r\n$1\r\n1\r\n"), b"+OK\r\n");
    assert_eq!(h.request(b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n"), b"_\r\n");
    assert_eq!(h.request(b"*2\r\n$6\r\nSELECT\r\n$1\r\n0\r\n"), b"+OK\r\n");
    assert_eq!(h.request(b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n"), b"$3\r\nbar\r\n");
}

#[test]
fn pipelined_requests_answer_in_order() {
    let mut h = Harness::new(1);
    let out = h.request(
        b"*3\r\n$3\r\nSET\r\n$1\r\na\r\n$1\r\n1\r\n*2\r\n$3\r\nGET\r\n$1\r\na\r\n*1\r\n$4\r\nPING\r\n",
    );
    assert_eq!(out, b"+OK\r\n$1\r\n1\r\n+PONG\r\n".to_vec());
}

#[test]
fn unknown_commands_and_bad_arity() {
    let mut h = Harness::new(1);
    assert_eq!(h.request(b"*1\r\n$5\r\nFLURB\r\n"), b"!7\r\nEINVCMD\r\n");
    assert_eq!(h.request(b"*2\r\n$4\r\nPING\r\n:1\r\n"), b"!7\r\nEINVCMD\r\n");
    assert_eq!(h.request(b"*1\r\n$3\r\nGET\r\n"), b"!7\r\nEINVCMD\r\n");
    assert_eq!(
        h.request(b"*4\r\n$3\r\nSET\r\n$1\r\na\r\n$1\r\nb\r\n$1\r\nc\r\n"),
        b"!7\r\nEINVCMD\r\n"
    );
    // a bare (non-array) frame is not a command
    assert_eq!(h.request(b"+PING\r\n"), b"!7\r\nEINVCMD\r\n");
}

#[test]
fn non_string_keys_are_invalid() {
    let mut h = Harness::new(1);
    assert_eq!(
        h.request(b"*3\r\n$3\r\nSET\r\n:42\r\n$1\r\nv\r\n"),
        b"!7\r\nEINVKEY\r\n"
    );
    assert_eq!(h.request(b"*2\r\n$3\r\nGET\r\n:42\r\n"), b"!7\r\nEINVKEY\r\n");
}

#[test]
fn typed_values_roundtrip_through_the_store() {
    let mut h = Harness::new(1);
    assert_eq!(
        h.request(b"*3\r\n$3\r\nSET\r\n$1\r\nn\r\n:42\r\n"),
        b"+OK\r\n"
    );
    assert_eq!(h.request(b"*2\r\n$3\r\nGET\r\n$1\r\nn\r\n"), b":42\r\n");
    assert_eq!(
        h.request(b"*3\r\n$3\r\nSET\r\n$1\r\nd\r\n,2.5\r\n"),
        b"+OK\r\n"
    );
    assert_eq!(h.request(b"*2\r\n$3\r\nGET\r\n$1\r\nd\r\n"), b",2.5\r\n");
    assert_eq!(
        h.request(b"*3\r\n$3\r\nSET\r\n$1\r\nl\r\n*2\r\n:1\r\n#t\r\n"),
        b"+OK\r\n"
    );
    assert_eq!(
        h.request(b"*2\r\n$3\r\nGET\r\n$1\r\nl\r\n"),
        b"*2\r\n:1\r\n#t\r\n"
    );
}

#[test]
fn exists_reports_presence() {
    let mut h = Harness::new(1);
    assert_eq!(h.request(b"*2\r\n$6\r\nEXISTS\r\n$1\r\nk\r\n"), b":0\r\n");
    h.request(b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n");
    assert_eq!(h.request(b"*2\r\n$6\r\nEXISTS\r\n$1\r\nk\r\n"), b":1\r\n");
}

#[test]
fn keys_lists_every_key() {
    let mut h = Harness::new(1);
    for key in [&b"one"[..], b"two", b"three"] {
        let mut frame = Vec::new();
        frame.extend_from_slice(b"*3\r\n$3\r\nSET\r\n");
        frame.extend_from_slice(format!("${}\r\n", key.len()).as_bytes());
        frame.extend_from_slice(key);
        frame.extend_from_slice(b"\r\n$1\r\nv\r\n");
        assert_eq!(h.request(&frame), b"+OK\r\n");
    }
    let out = h.request(b"*1\r\n$4\r\nKEYS\r\n");
    let (obj, consumed) = Decoder::parse(&out).unwrap();
    assert_eq!(consumed, out.len());
    let mut listed: Vec<Vec<u8>> = match obj {
        Object::Array(elements) => elements
            .into_iter()
            .map(|element| match element {
                Object::String(bytes) => bytes,
                other => panic!("KEYS returned a non-string: {:?}", other),
            })
            .collect(),
        other => panic!("KEYS did not return an array: {:?}", other),
    };
    listed.sort();
    assert_eq!(listed, vec![b"one".to_vec(), b"three".to_vec(), b"two".to_vec()]);
}

#[test]
fn info_answers_with_a_bulk_string() {
    let mut h = Harness::new(3);
    h.request(b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n");
    let out = h.request(b"*1\r\n$4\r\nINFO\r\n");
    let (obj, _) = Decoder::parse(&out).unwrap();
    let body = match obj {
        Object::String(bytes) => String::from_utf8(bytes).unwrap(),
        other => panic!("INFO did not return a bulk string: {:?}", other),
    };
    assert!(body.contains("databases:3"));
    assert!(body.contains("keys:1"));
    assert!(body.contains("db0:keys=1"));
}

#[test]
fn command_names_match_case_insensitively() {
    let mut h = Harness::new(1);
    assert_eq!(h.request(b"*1\r\n$4\r\nping\r\n"), b"+PONG\r\n");
    assert_eq!(
        h.request(b"*3\r\n$3\r\nset\r\n$1\r\nk\r\n$1\r\nv\r\n"),
        b"+OK\r\n"
    );
    assert_eq!(h.request(b"*2\r\n$3\r\nGeT\r\n$1\r\nk\r\n"), b"$1\r\nv\r\n");
}
