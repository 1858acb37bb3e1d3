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

//! # `SET` queries

use crate::corestore::object::Object;
use crate::protocol::responses;
use crate::queryengine::{ClientState, ExecCtx};
use bytes::BytesMut;

/// Run a `SET` query: insert or replace `key -> value` in the selected
/// database. The key must be a byte string; the value may be any object
/// and is moved in, never copied
pub fn run(ctx: &mut ExecCtx<'_>, client: &mut ClientState, out: &mut BytesMut, args: Vec<Object>) {
    if args.len() != 2 {
        out.extend_from_slice(responses::E_INVCMD);
        return;
    }
    let mut args = args;
    // popping back-to-front moves both payloads without a copy
    let (key, value) = match (args.pop(), args.pop()) {
        (Some(value), Some(Object::String(key))) => (key, value),
        _ => {
            out.extend_from_slice(responses::E_INVKEY);
            return;
        }
    };
    let db = match ctx.store.db_mut(client.db_index) {
        Some(db) => db,
        None => {
            out.extend_from_slice(responses::E_DBRANGE);
            return;
        }
    };
    match db.set(key, value) {
        Ok(()) => out.extend_from_slice(responses::OKAY),
        // the insert rolled itself back; the keyspace is untouched
        Err(_) => out.extend_from_slice(responses::E_OOM),
    }
}
