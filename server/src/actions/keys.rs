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

//! # `KEYS` queries

use crate::corestore::object::Object;
use crate::protocol::builder::Builder;
use crate::protocol::responses;
use crate::queryengine::{ClientState, ExecCtx};
use bytes::BytesMut;

/// Run a `KEYS` query: every key of the selected database as an array of
/// bulk strings, in whatever order the keyspace walks them
pub fn run(ctx: &mut ExecCtx<'_>, client: &mut ClientState, out: &mut BytesMut, args: Vec<Object>) {
    if !args.is_empty() {
        out.extend_from_slice(responses::E_INVCMD);
        return;
    }
    let db = match ctx.store.db(client.db_index) {
        Some(db) => db,
        None => {
            out.extend_from_slice(responses::E_DBRANGE);
            return;
        }
    };
    let mut response = Builder::new();
    response.array_header(db.len());
    for key in db.keys() {
        response.bulk_string(key);
    }
    out.extend_from_slice(response.as_bytes());
}
